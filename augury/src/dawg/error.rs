//! Errors raised while building or restoring a DAWG.
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DawgError {
    /// The empty string cannot be stored
    #[error("Cannot insert an empty word")]
    EmptyWord,

    /// Words must arrive in strictly increasing case-insensitive order
    #[error("Words out of order: {word:?} inserted after {previous:?}")]
    Unsorted {
        /// the last accepted word
        previous: String,
        /// the rejected word
        word: String,
    },

    /// The word would extend a branch that was already minimized, which
    /// happens when case variants interleave in the input order
    #[error("Word {word:?} re-enters a completed branch")]
    BranchReentered {
        /// the rejected word
        word: String,
    },

    /// Edge labels are stored as 16-bit indices
    #[error("Alphabet of {0} characters exceeds the 16-bit edge label range")]
    AlphabetTooLarge(usize),

    /// Flat arrays that do not describe a valid graph
    #[error("Invalid graph structure: {0}")]
    InvalidStructure(String),
}
