//! Word-history language models.
//!
//! [`ModifiedKneserNey`] is built once from corpus n-gram counts and is
//! immutable afterwards, so any number of threads may query it.

use smol_str::SmolStr;

mod info;
mod kneser_ney;
mod vocabulary;

pub use self::info::{BigramInfo, ContinuationBuckets, CountHistogram, Discounts, UnigramInfo};
pub use self::kneser_ney::{ModelConfig, ModifiedKneserNey};
pub use self::vocabulary::Vocabulary;

/// Scores a word sequence.
pub trait LanguageModel {
    /// Likelihood-like score of the last word given up to two words before
    /// it. Unknown words and contexts fall back to lower orders or to 0.0.
    fn evaluate(&self, history: &[&str]) -> f64;
}

/// Predicts the word following a history.
pub trait NextWordModel {
    /// The most frequent continuations of the last one or two words, best
    /// first. A single empty string when no context is known.
    fn next_word(&self, history: &[&str]) -> Vec<SmolStr>;
}

/// The language models a predictor can be built on.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelKind {
    KneserNey(ModifiedKneserNey),
}

impl ModelKind {
    pub fn vocabulary(&self) -> &Vocabulary {
        match self {
            ModelKind::KneserNey(model) => model.vocabulary(),
        }
    }
}

impl LanguageModel for ModelKind {
    fn evaluate(&self, history: &[&str]) -> f64 {
        match self {
            ModelKind::KneserNey(model) => model.evaluate(history),
        }
    }
}

impl NextWordModel for ModelKind {
    fn next_word(&self, history: &[&str]) -> Vec<SmolStr> {
        match self {
            ModelKind::KneserNey(model) => model.next_word(history),
        }
    }
}

impl From<ModifiedKneserNey> for ModelKind {
    fn from(model: ModifiedKneserNey) -> Self {
        ModelKind::KneserNey(model)
    }
}
