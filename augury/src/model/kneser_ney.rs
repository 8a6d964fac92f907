use hashbrown::HashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::info::{BigramInfo, CountHistogram, Discounts, UnigramInfo};
use super::{LanguageModel, NextWordModel, Vocabulary};
use crate::tokenizer::ngram::NgramCounts;
use crate::types::{Count, WordId};

/// Frequency floors and list sizes used while building the model.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    /// unigrams seen fewer times are dropped along with every n-gram
    /// containing them
    pub unigram_threshold: Count,
    /// bigrams seen fewer times get no context record
    pub bigram_threshold: Count,
    /// trigrams seen fewer times keep no count of their own
    pub trigram_threshold: Count,
    /// minimum count for a continuation to be offered by `next_word`
    pub most_likely_floor: Count,
    /// continuations kept per context for `next_word`
    pub most_likely_count: usize,
}

impl ModelConfig {
    pub const fn default() -> ModelConfig {
        ModelConfig {
            unigram_threshold: 10,
            bigram_threshold: 5,
            trigram_threshold: 3,
            most_likely_floor: 5,
            most_likely_count: 3,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::default()
    }
}

/// Interpolated Modified Kneser-Ney trigram model.
///
/// Scores are interpolated estimates and are not normalized over the
/// vocabulary.
#[derive(Debug, Clone)]
pub struct ModifiedKneserNey {
    pub(crate) vocabulary: Vocabulary,
    pub(crate) unigrams: Vec<UnigramInfo>,
    /// counts-of-counts of trigrams under retained bigram contexts
    pub(crate) trigram_histogram: CountHistogram,
    /// counts-of-counts of bigrams
    pub(crate) bigram_histogram: CountHistogram,
    /// distinct bigrams between retained words
    pub(crate) bigram_total: f64,
    pub(crate) trigram_discounts: Discounts,
    pub(crate) bigram_discounts: Discounts,
}

const TOLERANCE: f64 = 1e-5;

impl PartialEq for ModifiedKneserNey {
    fn eq(&self, other: &Self) -> bool {
        self.vocabulary == other.vocabulary
            && self.unigrams == other.unigrams
            && self.trigram_histogram == other.trigram_histogram
            && self.bigram_histogram == other.bigram_histogram
            && (self.bigram_total - other.bigram_total).abs() <= TOLERANCE
            && self
                .trigram_discounts
                .approx_eq(&other.trigram_discounts, TOLERANCE)
            && self
                .bigram_discounts
                .approx_eq(&other.bigram_discounts, TOLERANCE)
    }
}

fn top_continuations<I>(continuations: I, config: &ModelConfig) -> Vec<WordId>
where
    I: Iterator<Item = (WordId, Count)>,
{
    continuations
        .filter(|(_, count)| *count >= config.most_likely_floor)
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(config.most_likely_count)
        .map(|(id, _)| id)
        .collect()
}

impl ModifiedKneserNey {
    pub fn new(counts: &NgramCounts, config: &ModelConfig) -> ModifiedKneserNey {
        let mut vocabulary = Vocabulary::new();
        let mut unigrams = vec![];
        let mut rejected = HashSet::new();

        for (word, count) in counts.unigrams() {
            if count < config.unigram_threshold {
                rejected.insert(word);
                continue;
            }

            vocabulary.add(word);
            unigrams.push(UnigramInfo::with_count(count));
        }

        let resolve = |words: &[&str]| -> Option<Vec<WordId>> {
            let ids: Option<Vec<WordId>> = words.iter().map(|w| vocabulary.id(w)).collect();
            if ids.is_none() && !words.iter().any(|w| rejected.contains(w)) {
                log::warn!("n-gram {:?} contains a word with no unigram count", words);
            }
            ids
        };

        let mut bigram_histogram = CountHistogram::default();
        let mut bigram_total = 0.0;

        for (first, second, count) in counts.bigrams() {
            let (a, b) = match resolve(&[first, second]).as_deref() {
                Some(&[a, b]) => (a as usize, b),
                _ => continue,
            };

            bigram_total += 1.0;
            bigram_histogram.record(count);
            unigrams[a].buckets.record(count);
            unigrams[b as usize].left_continuations += 1;

            if count >= config.bigram_threshold {
                unigrams[a].bigrams.insert(b, BigramInfo::with_count(count));
            }
        }

        let mut trigram_histogram = CountHistogram::default();

        for (first, second, third, count) in counts.trigrams() {
            let (a, b, c) = match resolve(&[first, second, third]).as_deref() {
                Some(&[a, b, c]) => (a as usize, b, c),
                _ => continue,
            };

            unigrams[b as usize].middle_continuations += 1;

            if let Some(bigram) = unigrams[a].bigrams.get_mut(&b) {
                trigram_histogram.record(count);
                bigram.buckets.record(count);
                if count >= config.trigram_threshold {
                    bigram.trigrams.insert(c, count);
                }
            }

            if let Some(next) = unigrams[b as usize].bigrams.get_mut(&c) {
                next.left_continuations += 1;
            }
        }

        for unigram in unigrams.iter_mut() {
            unigram.most_likely = top_continuations(
                unigram.bigrams.iter().map(|(id, bigram)| (*id, bigram.count)),
                config,
            );

            for bigram in unigram.bigrams.values_mut() {
                bigram.most_likely = top_continuations(
                    bigram.trigrams.iter().map(|(id, count)| (*id, *count)),
                    config,
                );
            }
        }

        let model = ModifiedKneserNey::from_parts(
            vocabulary,
            unigrams,
            trigram_histogram,
            bigram_histogram,
            bigram_total,
        );

        log::debug!(
            "kneser-ney: {} words kept, {} rejected, {} bigrams, trigram discounts {:?}, bigram discounts {:?}",
            model.vocabulary.len(),
            rejected.len(),
            model.bigram_total,
            model.trigram_discounts,
            model.bigram_discounts
        );

        model
    }

    /// Assembles a model from stored statistics, deriving the discounts.
    pub(crate) fn from_parts(
        vocabulary: Vocabulary,
        unigrams: Vec<UnigramInfo>,
        trigram_histogram: CountHistogram,
        bigram_histogram: CountHistogram,
        bigram_total: f64,
    ) -> ModifiedKneserNey {
        ModifiedKneserNey {
            vocabulary,
            unigrams,
            trigram_discounts: Discounts::from_histogram(&trigram_histogram),
            bigram_discounts: Discounts::from_histogram(&bigram_histogram),
            trigram_histogram,
            bigram_histogram,
            bigram_total,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn trigram_discounts(&self) -> Discounts {
        self.trigram_discounts
    }

    pub fn bigram_discounts(&self) -> Discounts {
        self.bigram_discounts
    }

    /// Raw unigram count, 0 for words outside the vocabulary.
    pub fn count(&self, word: &str) -> Count {
        self.unigram(word).map(|info| info.count).unwrap_or(0)
    }

    pub fn unigram(&self, word: &str) -> Option<&UnigramInfo> {
        self.vocabulary
            .id(word)
            .and_then(|id| self.unigrams.get(id as usize))
    }

    fn words(&self, ids: &[WordId]) -> Vec<SmolStr> {
        ids.iter()
            .filter_map(|&id| self.vocabulary.word(id))
            .cloned()
            .collect()
    }

    /// Relative frequency of `word` among vocabulary entries.
    fn single_word(&self, word: &str) -> f64 {
        match self.unigram(word) {
            Some(info) if !self.unigrams.is_empty() => info.count as f64 / self.unigrams.len() as f64,
            _ => 0.0,
        }
    }

    /// Continuation probability of `word`: how many distinct words precede it.
    fn continuation(&self, word: &str) -> f64 {
        match self.unigram(word) {
            Some(info) if self.bigram_total > 0.0 => info.left_continuations as f64 / self.bigram_total,
            _ => 0.0,
        }
    }

    fn from_pair(&self, first: &str, second: &str) -> f64 {
        let context = match self.unigram(first) {
            Some(info) => info,
            None => return self.single_word(second),
        };

        let denominator = context.count as f64;
        if denominator == 0.0 {
            return 0.0;
        }

        let gamma = context.buckets.discounted(&self.bigram_discounts) / denominator;
        let lower = self.continuation(second);

        let bigram = self
            .vocabulary
            .id(second)
            .and_then(|id| context.bigram(id));

        match bigram {
            None => gamma * lower,
            Some(bigram) => {
                let discount = self.bigram_discounts.for_count(bigram.count);
                (bigram.count as f64 - discount).max(0.0) / denominator + gamma * lower
            }
        }
    }

    /// Middle order estimate for `second` following `first`, built from
    /// continuation counts.
    fn lower_from_pair(&self, first: &str, second: &str) -> f64 {
        let context = match self.unigram(first) {
            Some(info) => info,
            None => return 0.0,
        };

        let middle = context.middle_continuations as f64;
        if middle == 0.0 {
            return 0.0;
        }

        let lower = self.continuation(second);
        let gamma = context.buckets.discounted(&self.bigram_discounts) / middle;

        let bigram = self
            .vocabulary
            .id(second)
            .and_then(|id| context.bigram(id))
            .filter(|bigram| bigram.left_continuations != 0);

        match bigram {
            None => gamma * lower,
            Some(bigram) => {
                let discount = self.bigram_discounts.for_count(bigram.count);
                (bigram.left_continuations as f64 - discount).max(0.0) / middle + gamma * lower
            }
        }
    }

    fn from_triple(&self, first: &str, second: &str, third: &str) -> f64 {
        let context = match self.unigram(first) {
            Some(info) => info,
            None => return self.from_pair(second, third),
        };

        let second_id = match self.vocabulary.id(second) {
            Some(id) => id,
            None => return self.single_word(third),
        };

        let bigram = match context.bigram(second_id) {
            Some(bigram) => bigram,
            None => return self.from_pair(second, third),
        };

        let denominator = bigram.count as f64;
        if denominator == 0.0 {
            return 0.0;
        }

        let gamma = bigram.buckets.discounted(&self.trigram_discounts) / denominator;
        let lower = self.lower_from_pair(second, third);

        let trigram = self
            .vocabulary
            .id(third)
            .and_then(|id| bigram.trigram_count(id));

        match trigram {
            None => gamma * lower,
            Some(count) => {
                let discount = self.trigram_discounts.for_count(count);
                (count as f64 - discount).max(0.0) / denominator + gamma * lower
            }
        }
    }
}

impl LanguageModel for ModifiedKneserNey {
    fn evaluate(&self, history: &[&str]) -> f64 {
        match *history {
            [] => 0.0,
            [word] => self.single_word(word),
            [first, second] => self.from_pair(first, second),
            [.., first, second, third] => self.from_triple(first, second, third),
        }
    }
}

impl NextWordModel for ModifiedKneserNey {
    fn next_word(&self, history: &[&str]) -> Vec<SmolStr> {
        let placeholder = || vec![SmolStr::default()];

        let (first, second) = match *history {
            [] => return placeholder(),
            [word] => (None, word),
            [.., first, second] => (Some(first), second),
        };

        let second_id = match self.vocabulary.id(second) {
            Some(id) => id,
            None => return placeholder(),
        };
        let second_info = &self.unigrams[second_id as usize];

        let first_info = match first {
            None => return self.words(&second_info.most_likely),
            Some(first) => match self.unigram(first) {
                Some(info) => info,
                None => return self.words(&second_info.most_likely),
            },
        };

        match first_info.bigram(second_id) {
            Some(bigram) if !bigram.most_likely.is_empty() => self.words(&bigram.most_likely),
            _ => self.words(&second_info.most_likely),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a:20 b:15 c:10 d:3 with hand-checked bigram and trigram counts.
    fn model() -> ModifiedKneserNey {
        let mut counts = NgramCounts::new();
        counts.add_unigram("a", 20);
        counts.add_unigram("b", 15);
        counts.add_unigram("c", 10);
        counts.add_unigram("d", 3);
        counts.add_bigram("a", "b", 6);
        counts.add_bigram("b", "c", 2);
        counts.add_bigram("a", "c", 1);
        counts.add_bigram("a", "d", 4);
        counts.add_bigram("c", "a", 5);
        counts.add_trigram("a", "b", "c", 3);
        counts.add_trigram("b", "c", "a", 2);
        counts.add_trigram("a", "b", "a", 1);
        ModifiedKneserNey::new(&counts, &ModelConfig::default())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn drops_rare_unigrams() {
        let model = model();
        assert_eq!(model.vocabulary().len(), 3);
        assert_eq!(model.count("a"), 20);
        assert_eq!(model.count("d"), 0);
        assert_eq!(model.count("zzz"), 0);
    }

    #[test]
    fn statistics() {
        let model = model();
        assert_eq!(model.bigram_total, 4.0);
        assert_eq!(model.bigram_histogram.0, [1, 1, 0, 0]);
        assert_eq!(model.trigram_histogram.0, [1, 0, 1, 0]);

        let a = model.unigram("a").unwrap();
        let b_id = model.vocabulary().id("b").unwrap();
        let c_id = model.vocabulary().id("c").unwrap();
        assert_eq!(a.buckets.one, 1);
        assert_eq!(a.buckets.three_plus, 1);
        assert_eq!(a.bigram(b_id).unwrap().trigram_count(c_id), Some(3));
        assert!(a.bigram(c_id).is_none());

        let b = model.unigram("b").unwrap();
        assert_eq!(b.middle_continuations, 2);
        assert_eq!(model.unigram("c").unwrap().left_continuations, 2);

        let a_id = model.vocabulary().id("a").unwrap();
        let c = model.unigram("c").unwrap();
        assert_eq!(c.bigram(a_id).unwrap().left_continuations, 1);
    }

    #[test]
    fn discounts() {
        let model = model();
        let d = model.trigram_discounts();
        assert!(close(d.one, 1.0) && close(d.two, 2.0) && close(d.three_plus, 3.0));
        let d = model.bigram_discounts();
        assert!(close(d.one, 1.0 / 3.0) && close(d.two, 2.0) && close(d.three_plus, 3.0));
    }

    #[test]
    fn evaluate_short_histories() {
        let model = model();
        assert_eq!(model.evaluate(&[]), 0.0);
        assert_eq!(model.evaluate(&["zzz"]), 0.0);
        assert_eq!(model.evaluate(&["d"]), 0.0);
        assert!(close(model.evaluate(&["c"]), 10.0 / 3.0));
    }

    #[test]
    fn evaluate_pairs() {
        let model = model();
        assert!(close(model.evaluate(&["a", "b"]), 0.15 + 1.0 / 24.0));
        assert!(close(model.evaluate(&["a", "c"]), 1.0 / 12.0));
        // Unknown context falls back to the unigram estimate.
        assert!(close(model.evaluate(&["zzz", "b"]), 5.0));
    }

    #[test]
    fn evaluate_triples() {
        let model = model();
        assert!(close(model.evaluate(&["a", "b", "c"]), 1.0 / 3.0));
        assert!(close(model.evaluate(&["x", "a", "b", "c"]), 1.0 / 3.0));
        // Unknown first word backs off to the pair.
        assert!(close(model.evaluate(&["zzz", "a", "b"]), 0.15 + 1.0 / 24.0));
        // Unknown middle word backs off to the unigram.
        assert!(close(model.evaluate(&["a", "zzz", "b"]), 5.0));
        // Untracked bigram context backs off to the pair.
        assert!(close(model.evaluate(&["b", "a", "c"]), 1.0 / 12.0));
    }

    #[test]
    fn next_word() {
        let model = model();
        let empty = vec![SmolStr::default()];
        assert_eq!(model.next_word(&[]), empty);
        assert_eq!(model.next_word(&["zzz"]), empty);
        assert_eq!(model.next_word(&["d"]), empty);
        assert_eq!(model.next_word(&["c", "zzz"]), empty);
        assert_eq!(model.next_word(&["a"]), vec!["b"]);
        assert_eq!(model.next_word(&["zzz", "c"]), vec!["a"]);
        assert_eq!(model.next_word(&["b", "c"]), vec!["a"]);
        assert!(model.next_word(&["a", "b"]).is_empty());
    }

    #[test]
    fn most_likely_is_ordered_and_bounded() {
        let mut counts = NgramCounts::new();
        for word in ["x", "p", "q", "r", "s"].iter() {
            counts.add_unigram(word, 50);
        }
        counts.add_bigram("x", "p", 7);
        counts.add_bigram("x", "q", 9);
        counts.add_bigram("x", "r", 6);
        counts.add_bigram("x", "s", 8);
        let model = ModifiedKneserNey::new(&counts, &ModelConfig::default());
        assert_eq!(model.next_word(&["x"]), vec!["q", "s", "p"]);
    }
}
