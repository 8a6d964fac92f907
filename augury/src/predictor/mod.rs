//! Word prediction: spelling candidates ranked by a language model.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod auger;

pub use self::auger::Auger;

use crate::tokenizer::Tokenize;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictorConfig {
    /// spelling candidates fetched before language model scoring
    pub max_candidates: usize,
    /// predictions returned
    pub max_results: usize,
    /// put the typed word first when it is itself a known word
    pub prefer_exact_input: bool,
}

impl PredictorConfig {
    pub const fn default() -> PredictorConfig {
        PredictorConfig {
            max_candidates: 100,
            max_results: 10,
            prefer_exact_input: true,
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig::default()
    }
}

pub trait Predictor {
    /// Completions of the last word of `history`, best first. An empty last
    /// word asks for the words most likely to come next.
    fn predict(self: Arc<Self>, history: &[&str]) -> Vec<String>;
    fn predict_with_config(self: Arc<Self>, history: &[&str], config: &PredictorConfig) -> Vec<String>;

    /// Predicts from raw text, using the words of its last sentence as the
    /// history.
    fn predict_text(self: Arc<Self>, raw_input: &str) -> Vec<String> {
        let words = raw_input.last_sentence();
        let history: Vec<&str> = words.iter().map(|w| w.as_str()).collect();
        self.predict(&history)
    }
}
