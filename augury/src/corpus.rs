//! Building a predictor from corpus text.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::dawg::{compare_words, DawgError};
use crate::model::{ModelConfig, ModifiedKneserNey};
use crate::predictor::{Auger, PredictorConfig};
use crate::speller::{SpellCheck, SpellerKind, SymmetricPredictor};
use crate::tokenizer::case_handling::lower_case;
use crate::tokenizer::ngram::NgramCounts;
use crate::tokenizer::Tokenize;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CorpusError {
    /// A corpus or word list file could not be read
    #[error("Failed to read {0}")]
    Io(String, #[source] std::io::Error),

    /// The word list could not be stored in a graph
    #[error("Failed to build word graph")]
    Dawg(#[from] DawgError),
}

/// Accumulates corpus text and builds an [`Auger`] from it.
///
/// Text is split into sentences and lowercased before counting. Unless an
/// explicit word list is given, the predictor spells from the words the
/// language model keeps.
#[derive(Debug, Default)]
pub struct AugerBuilder {
    model_config: ModelConfig,
    predictor_config: PredictorConfig,
    symmetric: bool,
    words: Option<Vec<SmolStr>>,
    counts: NgramCounts,
    sentences: usize,
}

impl AugerBuilder {
    pub fn new() -> AugerBuilder {
        AugerBuilder::default()
    }

    pub fn model_config(&mut self, config: ModelConfig) -> &mut Self {
        self.model_config = config;
        self
    }

    pub fn predictor_config(&mut self, config: PredictorConfig) -> &mut Self {
        self.predictor_config = config;
        self
    }

    /// Use the symmetric-delete index instead of the DAWG search.
    pub fn symmetric(&mut self, symmetric: bool) -> &mut Self {
        self.symmetric = symmetric;
        self
    }

    /// Spell from these words instead of the model vocabulary.
    pub fn words<I, S>(&mut self, words: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words = Some(words.into_iter().map(|w| lower_case(w.as_ref())).collect());
        self
    }

    pub fn counts(&self) -> &NgramCounts {
        &self.counts
    }

    pub fn add_text(&mut self, text: &str) -> &mut Self {
        for sentence in text.sentences() {
            let lowered: Vec<SmolStr> = sentence.iter().map(|w| lower_case(w)).collect();
            let words: Vec<&str> = lowered.iter().map(SmolStr::as_str).collect();
            self.counts.add_sentence(&words);
            self.sentences += 1;
        }
        self
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self, CorpusError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CorpusError::Io(path.display().to_string(), e))?;

        let before = self.sentences;
        self.add_text(&text);
        log::info!(
            "{}: {} sentences",
            path.display(),
            self.sentences - before
        );
        Ok(self)
    }

    /// Reads a word list with one word per line.
    pub fn add_word_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self, CorpusError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CorpusError::Io(path.display().to_string(), e))?;

        let words: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        log::info!("{}: {} words", path.display(), words.len());

        self.words(words);
        Ok(self)
    }

    pub fn build(&self) -> Result<Arc<Auger>, CorpusError> {
        let model = ModifiedKneserNey::new(&self.counts, &self.model_config);

        let mut words: Vec<SmolStr> = match &self.words {
            Some(words) => words.clone(),
            None => model.vocabulary().iter().cloned().collect(),
        };
        words.retain(|word| !word.trim().is_empty());
        words.sort_by(|a, b| compare_words(a, b));
        words.dedup();

        log::info!(
            "building predictor: {} sentences, {} model words, {} spelling words",
            self.sentences,
            model.vocabulary().len(),
            words.len()
        );

        let speller: SpellerKind = if self.symmetric {
            SymmetricPredictor::new(words.iter().map(SmolStr::as_str)).into()
        } else {
            SpellCheck::from_sorted_words(words.iter().map(SmolStr::as_str))?.into()
        };

        Ok(Auger::new(speller, model, self.predictor_config.clone()))
    }
}
