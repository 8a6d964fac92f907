//! Sliding-window unigram, bigram and trigram counts.

use std::hash::Hash;

use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::types::Count;

/// Counts keyed by n-gram, iterated in first-seen order.
#[derive(Debug, Clone)]
struct OrderedCounts<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, Count)>,
}

impl<K> Default for OrderedCounts<K> {
    fn default() -> Self {
        OrderedCounts {
            index: HashMap::new(),
            entries: vec![],
        }
    }
}

impl<K: Hash + Eq + Clone> OrderedCounts<K> {
    fn add(&mut self, key: K, count: Count) {
        match self.index.get(&key) {
            Some(&i) => {
                let entry = &mut self.entries[i].1;
                *entry = entry.saturating_add(count);
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    fn get(&self, key: &K) -> Count {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0)
    }
}

/// N-gram frequency tables of a corpus.
#[derive(Debug, Clone, Default)]
pub struct NgramCounts {
    unigrams: OrderedCounts<SmolStr>,
    bigrams: OrderedCounts<(SmolStr, SmolStr)>,
    trigrams: OrderedCounts<(SmolStr, SmolStr, SmolStr)>,
}

impl NgramCounts {
    pub fn new() -> NgramCounts {
        NgramCounts::default()
    }

    /// Counts every unigram, bigram and trigram of one sentence.
    pub fn add_sentence<S: AsRef<str>>(&mut self, words: &[S]) {
        for (i, word) in words.iter().enumerate() {
            let word = word.as_ref();
            self.add_unigram(word, 1);

            if i >= 1 {
                self.add_bigram(words[i - 1].as_ref(), word, 1);
            }

            if i >= 2 {
                self.add_trigram(words[i - 2].as_ref(), words[i - 1].as_ref(), word, 1);
            }
        }
    }

    pub fn add_unigram(&mut self, word: &str, count: Count) {
        self.unigrams.add(SmolStr::new(word), count);
    }

    pub fn add_bigram(&mut self, first: &str, second: &str, count: Count) {
        self.bigrams
            .add((SmolStr::new(first), SmolStr::new(second)), count);
    }

    pub fn add_trigram(&mut self, first: &str, second: &str, third: &str, count: Count) {
        self.trigrams.add(
            (SmolStr::new(first), SmolStr::new(second), SmolStr::new(third)),
            count,
        );
    }

    pub fn unigram_count(&self, word: &str) -> Count {
        self.unigrams.get(&SmolStr::new(word))
    }

    pub fn bigram_count(&self, first: &str, second: &str) -> Count {
        self.bigrams
            .get(&(SmolStr::new(first), SmolStr::new(second)))
    }

    pub fn trigram_count(&self, first: &str, second: &str, third: &str) -> Count {
        self.trigrams
            .get(&(SmolStr::new(first), SmolStr::new(second), SmolStr::new(third)))
    }

    pub fn unigrams(&self) -> impl Iterator<Item = (&str, Count)> {
        self.unigrams
            .entries
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
    }

    pub fn bigrams(&self) -> impl Iterator<Item = (&str, &str, Count)> {
        self.bigrams
            .entries
            .iter()
            .map(|((a, b), count)| (a.as_str(), b.as_str(), *count))
    }

    pub fn trigrams(&self) -> impl Iterator<Item = (&str, &str, &str, Count)> {
        self.trigrams
            .entries
            .iter()
            .map(|((a, b, c), count)| (a.as_str(), b.as_str(), c.as_str(), *count))
    }
}
