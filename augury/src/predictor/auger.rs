use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;
use smol_str::SmolStr;
use tempfile::NamedTempFile;

use super::{Predictor, PredictorConfig};
use crate::model::{LanguageModel, ModelKind, NextWordModel};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::speller::{PrefixLookup, SpellerKind};
use crate::tokenizer::case_handling::{capitalize_from_template, lower_case};

/// Predictor combining a prefix lookup with a language model.
///
/// Immutable once built; share it behind an [`Arc`] and query from any
/// number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Auger {
    pub(crate) speller: SpellerKind,
    pub(crate) model: ModelKind,
    pub(crate) config: PredictorConfig,
}

impl Auger {
    pub fn new(
        speller: impl Into<SpellerKind>,
        model: impl Into<ModelKind>,
        config: PredictorConfig,
    ) -> Arc<Auger> {
        Arc::new(Auger {
            speller: speller.into(),
            model: model.into(),
            config,
        })
    }

    pub fn speller(&self) -> &SpellerKind {
        &self.speller
    }

    pub fn model(&self) -> &ModelKind {
        &self.model
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Writes a snapshot to `path`, replacing any existing file only once
    /// the new one is complete.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            self.write_snapshot(&mut writer)?;
            writer.flush()?;
        }
        file.persist(path).map_err(|e| SnapshotError::Io(e.error))?;

        log::debug!("saved predictor to {}", path.display());
        Ok(())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Arc<Auger>, SnapshotError> {
        Auger::open_with_config(path, PredictorConfig::default())
    }

    /// Loads a snapshot written by [`Auger::save`].
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: PredictorConfig,
    ) -> Result<Arc<Auger>, SnapshotError> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file)? };

        let mut auger = Auger::from_snapshot_bytes(&mmap[..])?;
        auger.config = config;

        log::debug!(
            "opened {}: {} words in model",
            path.as_ref().display(),
            auger.model.vocabulary().len()
        );
        Ok(Arc::new(auger))
    }

    fn next_words(&self, context: &[&str], template: &str, sentence_start: bool) -> Vec<String> {
        self.model
            .next_word(context)
            .into_iter()
            .filter(|word| !word.is_empty())
            .map(|word| capitalize_from_template(template, &word, sentence_start).to_string())
            .collect()
    }
}

impl Predictor for Auger {
    fn predict(self: Arc<Self>, history: &[&str]) -> Vec<String> {
        let config = self.config.clone();
        self.predict_with_config(history, &config)
    }

    fn predict_with_config(self: Arc<Self>, history: &[&str], config: &PredictorConfig) -> Vec<String> {
        let template = match history.last() {
            Some(&last) => last,
            None => return vec![],
        };
        let sentence_start = history.len() == 1;

        let lowered: Vec<SmolStr> = history.iter().map(|word| lower_case(word)).collect();
        let partial = lowered[lowered.len() - 1].as_str();
        let previous = &lowered[lowered.len().saturating_sub(3)..lowered.len() - 1];
        let mut context: Vec<&str> = previous.iter().map(|word| word.as_str()).collect();

        if partial.trim().is_empty() {
            return self.next_words(&context, template, sentence_start);
        }

        let candidates = self.speller.prefix_lookup(partial, config.max_candidates);
        let has_exact = candidates.iter().any(|c| c.value() == partial);
        log::trace!("{:?}: {} candidates", partial, candidates.len());

        let mut scored: Vec<(f64, &str)> = Vec::with_capacity(candidates.len());
        for candidate in candidates.iter() {
            context.push(candidate.value());
            let value = self.model.evaluate(&context);
            context.pop();

            let score = if value > 0.0 {
                value * candidate.similarity()
            } else {
                candidate.similarity() - 1.0
            };
            scored.push((score, candidate.value()));
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        let mut words: Vec<&str> = scored
            .into_iter()
            .take(config.max_results)
            .map(|(_, word)| word)
            .collect();

        if config.prefer_exact_input && has_exact && config.max_results > 0 {
            match words.iter().position(|&word| word == partial) {
                Some(index) => {
                    words.remove(index);
                }
                None => {
                    words.truncate(config.max_results - 1);
                }
            }
            words.insert(0, partial);
        }

        words
            .into_iter()
            .map(|word| capitalize_from_template(template, word, sentence_start).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::AugerBuilder;
    use std::thread;

    const CORPUS: &str = "I love you. I loved it. We live here. ";

    fn auger(symmetric: bool) -> Arc<Auger> {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut builder = AugerBuilder::new();
        builder.symmetric(symmetric);
        for _ in 0..12 {
            builder.add_text(CORPUS);
        }
        builder.build().unwrap()
    }

    #[test]
    fn completes_and_corrects() {
        let auger = auger(false);
        assert_eq!(auger.clone().predict(&["I", "lov"]), vec!["love", "loved", "live"]);
        assert_eq!(auger.predict(&["I", "Lov"]), vec!["Love", "Loved", "Live"]);
    }

    #[test]
    fn all_caps_input() {
        assert_eq!(auger(false).predict(&["I", "LOV"]), vec!["LOVE", "LOVED", "LIVE"]);
    }

    #[test]
    fn sentence_start_is_capitalized() {
        let predictions = auger(false).predict(&["lov"]);
        assert_eq!(predictions[0], "Love");
        assert!(predictions.iter().all(|word| word.starts_with('L')));
    }

    #[test]
    fn blank_partial_predicts_next_word() {
        let auger = auger(false);
        assert_eq!(auger.clone().predict(&["I", ""]), vec!["love", "loved"]);
        assert_eq!(auger.clone().predict(&["we", "live", " "]), vec!["here"]);
        assert!(auger.clone().predict(&[""]).is_empty());
        assert!(auger.predict(&[]).is_empty());
    }

    #[test]
    fn predicts_from_text() {
        let auger = auger(false);
        assert_eq!(auger.clone().predict_text("We live "), vec!["here"]);
        assert_eq!(auger.clone().predict_text("Hello. I lov")[0], "love");
        assert!(auger.predict_text("We live here.").is_empty());
    }

    #[test]
    fn exact_input_goes_first() {
        let auger = auger(false);
        let preferred = auger.clone().predict(&["i", "live"]);
        assert_eq!(preferred[0], "live");

        let config = PredictorConfig {
            max_results: 1,
            ..PredictorConfig::default()
        };
        assert_eq!(auger.clone().predict_with_config(&["i", "live"], &config), vec!["live"]);

        let config = PredictorConfig {
            max_results: 0,
            ..PredictorConfig::default()
        };
        assert!(auger.predict_with_config(&["i", "live"], &config).is_empty());
    }

    #[test]
    fn symmetric_lookup() {
        let auger = auger(true);
        let predictions = auger.predict(&["I", "lov"]);
        assert_eq!(&predictions[..2], &["love", "loved"]);
    }

    #[test]
    fn concurrent_queries() {
        let auger = auger(false);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let auger = auger.clone();
                thread::spawn(move || auger.predict(&["I", "lov"]))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["love", "loved", "live"]);
        }
    }

    #[test]
    fn save_and_open() {
        let auger = auger(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.augury");

        auger.save(&path).unwrap();
        let opened = Auger::open(&path).unwrap();
        assert_eq!(*opened, *auger);
        assert_eq!(opened.predict(&["I", "lov"]), vec!["love", "loved", "live"]);

        let config = PredictorConfig {
            max_results: 1,
            ..PredictorConfig::default()
        };
        let limited = Auger::open_with_config(&path, config).unwrap();
        assert_eq!(limited.predict(&["I", "lov"]), vec!["love"]);
    }

    #[test]
    fn open_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage");
        std::fs::write(&path, [9u8, 1, 2, 3]).unwrap();
        assert!(matches!(
            Auger::open(&path),
            Err(SnapshotError::UnknownDiscriminant { .. })
        ));
        assert!(matches!(
            Auger::open(dir.path().join("missing")),
            Err(SnapshotError::Io(_))
        ));
    }
}
