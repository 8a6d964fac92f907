use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};
use itertools::Itertools;
use smol_str::SmolStr;

use super::{
    read_chunk_items, read_chunk_with, read_indices, read_string, write_chunk, write_indices,
    write_str, ReadContext, Snapshot, SnapshotError,
};
use crate::constants::{LOOKUP_TAG_DAWG, LOOKUP_TAG_SYMMETRIC};
use crate::speller::symmetric::SymmetricEntry;
use crate::speller::{SpellCheck, SpellerKind, SymmetricPredictor};

impl Snapshot for SymmetricPredictor {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        write_chunk(writer, |buf| {
            for word in self.words.iter() {
                write_str(buf, word)?;
            }
            Ok(())
        })?;

        write_chunk(writer, |buf| {
            for (key, entry) in self.dictionary.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
                write_chunk(buf, |buf| {
                    write_str(buf, key)?;
                    buf.write_u8(entry.is_real_word as u8)?;
                    write_indices(buf, &entry.indices)
                })?;
            }
            Ok(())
        })
    }

    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError> {
        let words = read_chunk_items(reader, "symmetric words", |rest| {
            read_string(rest, "symmetric word").map(SmolStr::from)
        })?;

        let entries = read_chunk_items(reader, "symmetric entries", |rest| {
            read_chunk_with(rest, "symmetric entry", |rest| {
                let key = read_string(rest, "symmetric key")?;
                let is_real_word = match rest.read_u8().member("symmetric entry flag")? {
                    0 => false,
                    1 => true,
                    value => {
                        return Err(SnapshotError::malformed(
                            "symmetric entry flag",
                            format!("{} is not a boolean", value),
                        ))
                    }
                };
                let indices = read_indices(rest, "symmetric indices")?;
                Ok((SmolStr::from(key), SymmetricEntry { is_real_word, indices }))
            })
        })?;

        if entries
            .iter()
            .flat_map(|(_, entry)| entry.indices.iter())
            .any(|&index| index as usize >= words.len())
        {
            return Err(SnapshotError::malformed(
                "symmetric indices",
                "word index out of range",
            ));
        }

        Ok(SymmetricPredictor {
            dictionary: entries.into_iter().collect(),
            words,
        })
    }
}

impl Snapshot for SpellerKind {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        match self {
            SpellerKind::Dawg(speller) => {
                writer.write_u8(LOOKUP_TAG_DAWG)?;
                speller.write_snapshot(writer)
            }
            SpellerKind::Symmetric(speller) => {
                writer.write_u8(LOOKUP_TAG_SYMMETRIC)?;
                speller.write_snapshot(writer)
            }
        }
    }

    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError> {
        match reader.read_u8().member("lookup tag")? {
            LOOKUP_TAG_DAWG => Ok(SpellerKind::Dawg(SpellCheck::read_snapshot(reader)?)),
            LOOKUP_TAG_SYMMETRIC => Ok(SpellerKind::Symmetric(SymmetricPredictor::read_snapshot(reader)?)),
            value => Err(SnapshotError::UnknownDiscriminant {
                member: "lookup",
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speller::PrefixLookup;

    fn symmetric() -> SymmetricPredictor {
        let mut predictor = SymmetricPredictor::new(&["love", "loved", "live", "lovely", "čáhci"]);
        predictor.add_words_no_spelling(&["lo"]);
        predictor
    }

    #[test]
    fn symmetric_round_trip() {
        let predictor = symmetric();
        let bytes = predictor.to_snapshot_bytes().unwrap();
        let restored = SymmetricPredictor::from_snapshot_bytes(&bytes).unwrap();

        assert_eq!(restored, predictor);
        assert_eq!(restored.to_snapshot_bytes().unwrap(), bytes);
        assert_eq!(
            restored.prefix_lookup("lvoe", 10),
            predictor.prefix_lookup("lvoe", 10)
        );
    }

    #[test]
    fn kinds_are_tagged() {
        let dawg = SpellerKind::from(SpellCheck::from_sorted_words(&["live", "love", "loved"]).unwrap());
        let bytes = dawg.to_snapshot_bytes().unwrap();
        assert_eq!(bytes[0], LOOKUP_TAG_DAWG);
        assert_eq!(SpellerKind::from_snapshot_bytes(&bytes).unwrap(), dawg);

        let symmetric = SpellerKind::from(symmetric());
        let bytes = symmetric.to_snapshot_bytes().unwrap();
        assert_eq!(bytes[0], LOOKUP_TAG_SYMMETRIC);
        assert_eq!(SpellerKind::from_snapshot_bytes(&bytes).unwrap(), symmetric);

        assert!(matches!(
            SpellerKind::from_snapshot_bytes(&[2]),
            Err(SnapshotError::UnknownDiscriminant { member: "lookup", value: 2 })
        ));
    }

    #[test]
    fn out_of_range_index() {
        let mut predictor = symmetric();
        predictor
            .dictionary
            .entry(SmolStr::new("zz"))
            .or_default()
            .indices
            .push(99);
        let bytes = predictor.to_snapshot_bytes().unwrap();
        assert!(matches!(
            SymmetricPredictor::from_snapshot_bytes(&bytes),
            Err(SnapshotError::Malformed { .. })
        ));
    }
}
