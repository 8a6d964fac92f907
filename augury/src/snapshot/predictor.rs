use std::io::{Read, Write};

use super::{Snapshot, SnapshotError};
use crate::model::ModelKind;
use crate::predictor::{Auger, PredictorConfig};
use crate::speller::SpellerKind;

/// The tagged lookup followed by the tagged model. Query settings are not
/// stored.
impl Snapshot for Auger {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        self.speller.write_snapshot(writer)?;
        self.model.write_snapshot(writer)
    }

    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError> {
        let speller = SpellerKind::read_snapshot(reader)?;
        let model = ModelKind::read_snapshot(reader)?;
        Ok(Auger {
            speller,
            model,
            config: PredictorConfig::default(),
        })
    }
}
