use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{
    read_chunk_items, read_index, read_indices, read_string, write_chunk, write_index,
    write_indices, write_str, ReadContext, Snapshot, SnapshotError,
};
use crate::dawg::Dawg;
use crate::speller::SpellCheck;

impl Snapshot for Dawg {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        write_index(writer, self.terminal_count)?;
        let characters: String = self.characters.iter().collect();
        write_str(writer, &characters)?;
        write_index(writer, self.root)?;
        write_indices(writer, &self.first_child_index)?;
        write_indices(writer, &self.edges)?;
        write_chunk(writer, |buf| {
            for &ch in self.edge_character.iter() {
                buf.write_u16::<LittleEndian>(ch)?;
            }
            Ok(())
        })
    }

    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError> {
        let terminal_count = read_index(reader, "terminal count")?;
        let characters = read_string(reader, "characters")?.chars().collect();
        let root = read_index(reader, "root")?;
        let first_child_index = read_indices(reader, "first child index")?;
        let edges = read_indices(reader, "edges")?;
        let edge_character = read_chunk_items(reader, "edge characters", |rest| {
            rest.read_u16::<LittleEndian>().member("edge characters")
        })?;

        let dawg = Dawg::from_raw_parts(
            terminal_count,
            characters,
            root,
            first_child_index,
            edges,
            edge_character,
        )?;
        Ok(dawg)
    }
}

impl Snapshot for SpellCheck {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        self.dawg().write_snapshot(writer)
    }

    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError> {
        Ok(SpellCheck::new(Dawg::read_snapshot(reader)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dawg::{sort_words, DawgError};

    fn dawg() -> Dawg {
        let mut words = vec!["pity", "cities", "Čáhci", "city", "pities", "pitiful", "pretty"];
        sort_words(&mut words);
        Dawg::from_sorted_words(words).unwrap()
    }

    #[test]
    fn round_trip() {
        let dawg = dawg();
        let bytes = dawg.to_snapshot_bytes().unwrap();
        let restored = Dawg::from_snapshot_bytes(&bytes).unwrap();
        assert_eq!(restored, dawg);
        assert_eq!(restored.all_words(), dawg.all_words());
        assert_eq!(restored.to_snapshot_bytes().unwrap(), bytes);
    }

    #[test]
    fn layout() {
        let dawg = Dawg::from_sorted_words(&["ab"]).unwrap();
        let bytes = dawg.to_snapshot_bytes().unwrap();
        // terminal count, then the alphabet as a length-prefixed string
        assert_eq!(&bytes[..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[4..10], &[2, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn truncated() {
        let bytes = dawg().to_snapshot_bytes().unwrap();
        for len in [0, 3, 9, bytes.len() / 2, bytes.len() - 1] {
            assert!(
                matches!(
                    Dawg::from_snapshot_bytes(&bytes[..len]),
                    Err(SnapshotError::Truncated { .. })
                ),
                "length {}",
                len
            );
        }
    }

    #[test]
    fn corrupt_edges_are_rejected() {
        let dawg = Dawg::from_sorted_words(&["ab"]).unwrap();
        let mut bytes = dawg.to_snapshot_bytes().unwrap();
        // last edge character points past the alphabet
        let end = bytes.len();
        bytes[end - 2] = 9;
        assert!(matches!(
            Dawg::from_snapshot_bytes(&bytes),
            Err(SnapshotError::Dawg(_))
        ));
    }

    #[test]
    fn cyclic_graph_is_rejected() {
        let cyclic = Dawg {
            terminal_count: 1,
            characters: vec!['a'],
            root: 1,
            first_child_index: vec![0, 1],
            edges: vec![0, 0],
            edge_character: vec![0, 0],
        };
        let bytes = cyclic.to_snapshot_bytes().unwrap();
        assert!(matches!(
            Dawg::from_snapshot_bytes(&bytes),
            Err(SnapshotError::Dawg(DawgError::InvalidStructure(_)))
        ));
    }
}
