//! Binary snapshots of built structures.
//!
//! Every field is little endian. Variable-length data is written as a
//! chunk: an `i32` byte length followed by that many bytes. Nested records
//! are chunks inside chunks, so a reader can check each record is consumed
//! exactly. Hash maps are written in key order, so equal structures encode
//! to equal bytes.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

mod dawg;
mod error;
mod model;
mod predictor;
mod speller;

pub use self::error::SnapshotError;

/// A structure that can be written to and restored from bytes.
pub trait Snapshot: Sized {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError>;
    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError>;

    fn to_snapshot_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        let mut buf = vec![];
        self.write_snapshot(&mut buf)?;
        Ok(buf)
    }

    /// Restores from `bytes`, which must hold exactly one snapshot.
    fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut reader = bytes;
        let value = Self::read_snapshot(&mut reader)?;
        expect_end(reader, "snapshot")?;
        Ok(value)
    }
}

/// Attaches the member being read to an I/O failure.
pub(crate) trait ReadContext<T> {
    fn member(self, member: &'static str) -> Result<T, SnapshotError>;
}

impl<T> ReadContext<T> for io::Result<T> {
    fn member(self, member: &'static str) -> Result<T, SnapshotError> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => SnapshotError::Truncated { member },
            _ => SnapshotError::Io(e),
        })
    }
}

pub(crate) fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<(), SnapshotError> {
    let len = i32::try_from(len)
        .map_err(|_| SnapshotError::malformed("length", format!("{} does not fit in i32", len)))?;
    writer.write_i32::<LittleEndian>(len)?;
    Ok(())
}

pub(crate) fn read_len<R: Read>(reader: &mut R, member: &'static str) -> Result<usize, SnapshotError> {
    let len = reader.read_i32::<LittleEndian>().member(member)?;
    usize::try_from(len).map_err(|_| SnapshotError::malformed(member, format!("negative length {}", len)))
}

/// Writes whatever `body` produces as one length-prefixed chunk.
pub(crate) fn write_chunk<W, F>(writer: &mut W, body: F) -> Result<(), SnapshotError>
where
    W: Write,
    F: FnOnce(&mut Vec<u8>) -> Result<(), SnapshotError>,
{
    let mut buf = vec![];
    body(&mut buf)?;
    write_len(writer, buf.len())?;
    writer.write_all(&buf)?;
    Ok(())
}

/// Reads one length-prefixed chunk. The buffer grows with the data actually
/// present, so a corrupt length cannot force a huge allocation.
pub(crate) fn read_chunk<R: Read>(reader: &mut R, member: &'static str) -> Result<Vec<u8>, SnapshotError> {
    let len = read_len(reader, member)?;
    let mut buf = vec![];
    reader.take(len as u64).read_to_end(&mut buf).member(member)?;
    if buf.len() < len {
        return Err(SnapshotError::Truncated { member });
    }
    Ok(buf)
}

pub(crate) fn expect_end(rest: &[u8], member: &'static str) -> Result<(), SnapshotError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(SnapshotError::malformed(
            member,
            format!("{} unread trailing bytes", rest.len()),
        ))
    }
}

/// Reads a chunk and parses all of it with `body`.
pub(crate) fn read_chunk_with<R, T, F>(reader: &mut R, member: &'static str, body: F) -> Result<T, SnapshotError>
where
    R: Read,
    F: FnOnce(&mut &[u8]) -> Result<T, SnapshotError>,
{
    let buf = read_chunk(reader, member)?;
    let mut rest = &buf[..];
    let value = body(&mut rest)?;
    expect_end(rest, member)?;
    Ok(value)
}

/// Reads a chunk holding a sequence of records, calling `item` until the
/// chunk is used up.
pub(crate) fn read_chunk_items<R, T, F>(reader: &mut R, member: &'static str, mut item: F) -> Result<Vec<T>, SnapshotError>
where
    R: Read,
    F: FnMut(&mut &[u8]) -> Result<T, SnapshotError>,
{
    read_chunk_with(reader, member, |rest| {
        let mut items = vec![];
        while !rest.is_empty() {
            items.push(item(rest)?);
        }
        Ok(items)
    })
}

pub(crate) fn write_str<W: Write>(writer: &mut W, value: &str) -> Result<(), SnapshotError> {
    write_len(writer, value.len())?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

pub(crate) fn read_string<R: Read>(reader: &mut R, member: &'static str) -> Result<String, SnapshotError> {
    let buf = read_chunk(reader, member)?;
    String::from_utf8(buf).map_err(|e| SnapshotError::malformed(member, e.to_string()))
}

/// Writes an unsigned index in its `i32` wire form.
pub(crate) fn write_index<W: Write>(writer: &mut W, value: u32) -> Result<(), SnapshotError> {
    let value = i32::try_from(value)
        .map_err(|_| SnapshotError::malformed("index", format!("{} does not fit in i32", value)))?;
    writer.write_i32::<LittleEndian>(value)?;
    Ok(())
}

pub(crate) fn read_index<R: Read>(reader: &mut R, member: &'static str) -> Result<u32, SnapshotError> {
    let value = reader.read_i32::<LittleEndian>().member(member)?;
    u32::try_from(value).map_err(|_| SnapshotError::malformed(member, format!("negative index {}", value)))
}

pub(crate) fn write_indices<W: Write>(writer: &mut W, values: &[u32]) -> Result<(), SnapshotError> {
    write_chunk(writer, |buf| {
        for &value in values {
            write_index(buf, value)?;
        }
        Ok(())
    })
}

pub(crate) fn read_indices<R: Read>(reader: &mut R, member: &'static str) -> Result<Vec<u32>, SnapshotError> {
    read_chunk_items(reader, member, |rest| read_index(rest, member))
}
