//! Integer types shared across the graph, the language model and snapshots.

/// Index of a node in a [`Dawg`](crate::dawg::Dawg).
pub type NodeIndex = u32;

/// Index of an edge label in a DAWG's character table.
pub type CharIndex = u16;

/// Dense id of a word in a [`Vocabulary`](crate::model::Vocabulary).
pub type WordId = u32;

/// Raw n-gram frequency.
pub type Count = u32;

/// Similarity score in `[0, 1]`.
pub type Similarity = f64;
