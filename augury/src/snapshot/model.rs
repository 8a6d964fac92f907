use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use itertools::Itertools;

use super::{
    read_chunk_items, read_chunk_with, read_index, read_indices, read_string, write_chunk,
    write_index, write_indices, write_str, ReadContext, Snapshot, SnapshotError,
};
use crate::constants::MODEL_TAG_KNESER_NEY;
use crate::model::{
    BigramInfo, ContinuationBuckets, CountHistogram, ModelKind, ModifiedKneserNey, UnigramInfo,
    Vocabulary,
};
use crate::types::WordId;

const TRAILER_LEN: usize = 40;

fn write_buckets<W: Write>(writer: &mut W, buckets: &ContinuationBuckets) -> Result<(), SnapshotError> {
    writer.write_u32::<LittleEndian>(buckets.one)?;
    writer.write_u32::<LittleEndian>(buckets.two)?;
    writer.write_u32::<LittleEndian>(buckets.three_plus)?;
    Ok(())
}

fn read_buckets<R: Read>(reader: &mut R) -> Result<ContinuationBuckets, SnapshotError> {
    Ok(ContinuationBuckets {
        one: reader.read_u32::<LittleEndian>().member("buckets")?,
        two: reader.read_u32::<LittleEndian>().member("buckets")?,
        three_plus: reader.read_u32::<LittleEndian>().member("buckets")?,
    })
}

fn write_bigram<W: Write>(writer: &mut W, bigram: &BigramInfo) -> Result<(), SnapshotError> {
    writer.write_u32::<LittleEndian>(bigram.count)?;
    writer.write_u32::<LittleEndian>(bigram.left_continuations)?;
    write_buckets(writer, &bigram.buckets)?;
    write_indices(writer, &bigram.most_likely)?;
    write_chunk(writer, |buf| {
        for (&next, &count) in bigram.trigrams.iter().sorted_by_key(|(next, _)| **next) {
            write_index(buf, next)?;
            buf.write_u32::<LittleEndian>(count)?;
        }
        Ok(())
    })
}

fn read_bigram<R: Read>(reader: &mut R) -> Result<BigramInfo, SnapshotError> {
    let count = reader.read_u32::<LittleEndian>().member("bigram count")?;
    let left_continuations = reader.read_u32::<LittleEndian>().member("bigram continuations")?;
    let buckets = read_buckets(reader)?;
    let most_likely = read_indices(reader, "bigram most likely")?;
    let trigrams = read_chunk_items(reader, "trigrams", |rest| {
        let next = read_index(rest, "trigram key")?;
        let count = rest.read_u32::<LittleEndian>().member("trigram count")?;
        Ok((next, count))
    })?;

    Ok(BigramInfo {
        count,
        left_continuations,
        buckets,
        most_likely,
        trigrams: trigrams.into_iter().collect(),
    })
}

fn write_unigram<W: Write>(writer: &mut W, unigram: &UnigramInfo) -> Result<(), SnapshotError> {
    writer.write_u32::<LittleEndian>(unigram.count)?;
    writer.write_u32::<LittleEndian>(unigram.middle_continuations)?;
    writer.write_u32::<LittleEndian>(unigram.left_continuations)?;
    write_buckets(writer, &unigram.buckets)?;
    write_indices(writer, &unigram.most_likely)?;
    write_chunk(writer, |buf| {
        for (&next, bigram) in unigram.bigrams.iter().sorted_by_key(|(next, _)| **next) {
            write_chunk(buf, |buf| {
                write_index(buf, next)?;
                write_bigram(buf, bigram)
            })?;
        }
        Ok(())
    })
}

fn read_unigram<R: Read>(reader: &mut R) -> Result<UnigramInfo, SnapshotError> {
    let count = reader.read_u32::<LittleEndian>().member("unigram count")?;
    let middle_continuations = reader.read_u32::<LittleEndian>().member("unigram continuations")?;
    let left_continuations = reader.read_u32::<LittleEndian>().member("unigram continuations")?;
    let buckets = read_buckets(reader)?;
    let most_likely = read_indices(reader, "unigram most likely")?;
    let bigrams = read_chunk_items(reader, "bigrams", |rest| {
        read_chunk_with(rest, "bigram", |rest| {
            let next = read_index(rest, "bigram key")?;
            Ok((next, read_bigram(rest)?))
        })
    })?;

    Ok(UnigramInfo {
        count,
        middle_continuations,
        left_continuations,
        buckets,
        most_likely,
        bigrams: bigrams.into_iter().collect(),
    })
}

fn write_histogram<W: Write>(writer: &mut W, histogram: &CountHistogram) -> Result<(), SnapshotError> {
    for &value in histogram.0.iter() {
        writer.write_u32::<LittleEndian>(value)?;
    }
    Ok(())
}

fn read_histogram<R: Read>(reader: &mut R) -> Result<CountHistogram, SnapshotError> {
    let mut histogram = CountHistogram::default();
    for value in histogram.0.iter_mut() {
        *value = reader.read_u32::<LittleEndian>().member("histogram")?;
    }
    Ok(histogram)
}

fn read_vocabulary<R: Read>(reader: &mut R) -> Result<Vocabulary, SnapshotError> {
    let entries = read_chunk_items(reader, "vocabulary", |rest| {
        let word = read_string(rest, "vocabulary word")?;
        let id = read_index(rest, "vocabulary id")?;
        Ok((word, id))
    })?;

    let mut vocabulary = Vocabulary::new();
    for (position, (word, id)) in entries.into_iter().enumerate() {
        if id as usize != position || vocabulary.add(&word) != id {
            return Err(SnapshotError::malformed(
                "vocabulary",
                format!("{:?} stored with id {} at position {}", word, id, position),
            ));
        }
    }
    Ok(vocabulary)
}

/// Checks every stored word id names a vocabulary entry.
fn check_ids(unigrams: &[UnigramInfo], words: usize) -> Result<(), SnapshotError> {
    if unigrams.len() != words {
        return Err(SnapshotError::malformed(
            "unigrams",
            format!("{} records for {} words", unigrams.len(), words),
        ));
    }

    let in_range = |id: &WordId| (*id as usize) < words;
    let valid = unigrams.iter().all(|unigram| {
        unigram.most_likely.iter().all(in_range)
            && unigram.bigrams.iter().all(|(next, bigram)| {
                in_range(next)
                    && bigram.most_likely.iter().all(in_range)
                    && bigram.trigrams.keys().all(in_range)
            })
    });

    if valid {
        Ok(())
    } else {
        Err(SnapshotError::malformed("unigrams", "word id out of range"))
    }
}

impl Snapshot for ModifiedKneserNey {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        write_chunk(writer, |buf| {
            for unigram in self.unigrams.iter() {
                write_chunk(buf, |buf| write_unigram(buf, unigram))?;
            }
            Ok(())
        })?;

        write_chunk(writer, |buf| {
            for (id, word) in self.vocabulary.iter().enumerate() {
                write_str(buf, word)?;
                write_index(buf, id as WordId)?;
            }
            Ok(())
        })?;

        write_chunk(writer, |buf| {
            write_histogram(buf, &self.trigram_histogram)?;
            write_histogram(buf, &self.bigram_histogram)?;
            buf.write_f64::<LittleEndian>(self.bigram_total)?;
            Ok(())
        })
    }

    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError> {
        let unigrams = read_chunk_items(reader, "unigrams", |rest| {
            read_chunk_with(rest, "unigram", |rest| read_unigram(rest))
        })?;
        let vocabulary = read_vocabulary(reader)?;

        let (trigram_histogram, bigram_histogram, bigram_total) =
            read_chunk_with(reader, "trailer", |rest| {
                if rest.len() != TRAILER_LEN {
                    return Err(SnapshotError::malformed(
                        "trailer",
                        format!("expected {} bytes, found {}", TRAILER_LEN, rest.len()),
                    ));
                }
                let trigram_histogram = read_histogram(rest)?;
                let bigram_histogram = read_histogram(rest)?;
                let bigram_total = rest.read_f64::<LittleEndian>().member("trailer")?;
                Ok((trigram_histogram, bigram_histogram, bigram_total))
            })?;

        check_ids(&unigrams, vocabulary.len())?;

        Ok(ModifiedKneserNey::from_parts(
            vocabulary,
            unigrams,
            trigram_histogram,
            bigram_histogram,
            bigram_total,
        ))
    }
}

impl Snapshot for ModelKind {
    fn write_snapshot<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        match self {
            ModelKind::KneserNey(model) => {
                writer.write_u8(MODEL_TAG_KNESER_NEY)?;
                model.write_snapshot(writer)
            }
        }
    }

    fn read_snapshot<R: Read>(reader: &mut R) -> Result<Self, SnapshotError> {
        match reader.read_u8().member("model tag")? {
            MODEL_TAG_KNESER_NEY => Ok(ModelKind::KneserNey(ModifiedKneserNey::read_snapshot(reader)?)),
            value => Err(SnapshotError::UnknownDiscriminant {
                member: "model",
                value,
            }),
        }
    }
}
