//! String similarity metrics used to rank spelling candidates.
//!
//! [`JaroWinkler`] is the exact metric. [`BoundedJaroWinkler`] returns a
//! cheap lower estimate whenever a precomputed table proves the exact score
//! cannot clear the pruning threshold, which is what the fuzzy search uses
//! for ranking.

mod bounded;
mod jaro_winkler;

pub use self::bounded::{max_length_for_prefix, BoundedJaroWinkler};
pub(crate) use self::bounded::bounded_similarity;
pub use self::jaro_winkler::JaroWinkler;

use crate::types::Similarity;

/// A similarity measure over two words, in `[0, 1]`.
pub trait StringMetric {
    /// Scores `a` against `b`. Characters are compared by code point.
    fn similarity(&self, a: &str, b: &str) -> Similarity;
}
