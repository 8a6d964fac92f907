//! A candidate word with its spelling similarity to the input.
use crate::types::Similarity;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Candidate completion or correction for a typed word
pub struct Suggestion {
    /// the suggested word
    pub value: SmolStr,
    /// similarity to the typed input, higher is closer
    pub similarity: Similarity,
}

impl Suggestion {
    /// creates a suggestion
    pub fn new(value: SmolStr, similarity: Similarity) -> Suggestion {
        Suggestion { value, similarity }
    }

    /// gets the suggested word
    pub fn value(&self) -> &str {
        &self.value
    }

    /// gets the similarity to the typed input
    pub fn similarity(&self) -> Similarity {
        self.similarity
    }
}

/// Ascending by similarity; ties order words in reverse, so sorting with
/// `b.cmp(a)` gives best first and alphabetical among equals.
impl Ord for Suggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        let x = self
            .similarity
            .partial_cmp(&other.similarity)
            .unwrap_or(Equal);

        if let Equal = x {
            return other.value.cmp(&self.value);
        }

        x
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.similarity == other.similarity
    }
}

impl Eq for Suggestion {}

/// Sorts best first; equal scores keep alphabetical order.
pub(crate) fn sort_best_first(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| b.cmp(a));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_first() {
        let mut s = vec![
            Suggestion::new("b".into(), 0.5),
            Suggestion::new("c".into(), 0.9),
            Suggestion::new("a".into(), 0.5),
        ];
        sort_best_first(&mut s);
        let words: Vec<&str> = s.iter().map(|s| s.value()).collect();
        assert_eq!(words, vec!["c", "a", "b"]);
    }
}
