//! Symmetric-delete prefix index, an alternative to the DAWG search.
//!
//! Every word is filed under its short prefixes and their deletions, so a
//! typed prefix with a few missing or extra characters can be resolved with
//! hash lookups alone.

use hashbrown::{HashMap, HashSet};
use smol_str::SmolStr;

use super::suggestion::Suggestion;
use super::{rank, PrefixLookup};

/// Words reachable from one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymmetricEntry {
    /// whether the key itself is a vocabulary word
    pub(crate) is_real_word: bool,
    /// positions in the word list of words filed under this key
    pub(crate) indices: Vec<u32>,
}

impl SymmetricEntry {
    pub fn is_real_word(&self) -> bool {
        self.is_real_word
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymmetricPredictor {
    pub(crate) dictionary: HashMap<SmolStr, SymmetricEntry>,
    pub(crate) words: Vec<SmolStr>,
}

impl SymmetricPredictor {
    pub fn new<I, S>(words: I) -> SymmetricPredictor
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut predictor = SymmetricPredictor::default();
        for word in words {
            predictor.add_word(word.as_ref());
        }

        log::debug!(
            "symmetric index: {} words, {} keys",
            predictor.words.len(),
            predictor.dictionary.len()
        );

        predictor
    }

    /// Indexes `word` under its prefixes and deletions. Known words are
    /// skipped.
    pub fn add_word(&mut self, word: &str) {
        let index = match self.mark_real(word) {
            Some(index) => index,
            None => return,
        };

        let chars: Vec<char> = word.chars().collect();
        for key in prefixes_and_deletes(&chars) {
            self.dictionary.entry(key).or_default().indices.push(index);
        }
    }

    /// Adds words that can be suggested verbatim but are not reachable
    /// through misspellings.
    pub fn add_words_no_spelling<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.mark_real(word.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[SmolStr] {
        &self.words
    }

    pub fn entry(&self, key: &str) -> Option<&SymmetricEntry> {
        self.dictionary.get(key)
    }

    fn mark_real(&mut self, word: &str) -> Option<u32> {
        let entry = self.dictionary.entry(SmolStr::new(word)).or_default();
        if entry.is_real_word {
            return None;
        }

        entry.is_real_word = true;
        self.words.push(SmolStr::new(word));
        Some((self.words.len() - 1) as u32)
    }
}

impl PrefixLookup for SymmetricPredictor {
    fn prefix_lookup(&self, input: &str, max_results: usize) -> Vec<Suggestion> {
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();

        let mut keys = HashSet::new();
        keys.insert(SmolStr::new(input));
        if len >= 3 {
            edits(&chars, (len - 1) / 3, &mut keys);
        }

        let mut candidates: HashSet<SmolStr> = keys
            .iter()
            .filter_map(|key| self.dictionary.get(key))
            .flat_map(|entry| entry.indices.iter())
            .filter_map(|&index| self.words.get(index as usize))
            .filter(|word| word.chars().count() >= len)
            .cloned()
            .collect();

        if self
            .dictionary
            .get(input)
            .map_or(false, |entry| entry.is_real_word)
        {
            candidates.insert(SmolStr::new(input));
        }

        let mut candidates: Vec<SmolStr> = candidates.into_iter().collect();
        candidates.sort_unstable();
        log::trace!("{}: {} candidates", input, candidates.len());
        rank(&chars, candidates, max_results)
    }
}

/// Keys a word is filed under: its first character, single deletions of
/// its three and four character prefixes and of short words, and double
/// deletions of every prefix of five characters or more.
fn prefixes_and_deletes(word: &[char]) -> HashSet<SmolStr> {
    let mut keys = HashSet::new();
    let len = word.len();

    if len < 2 {
        return keys;
    }

    keys.insert(word[..1].iter().copied().collect());

    match len {
        2 => {}
        3 => edits(word, 1, &mut keys),
        4 => {
            edits(&word[..3], 1, &mut keys);
            edits(word, 1, &mut keys);
        }
        _ => {
            edits(&word[..3], 1, &mut keys);
            edits(&word[..4], 1, &mut keys);
            // Each prefix gets a fresh set: a delete already filed as a leaf
            // would otherwise stop the recursion below it.
            for end in 5..=len {
                let mut deletes = HashSet::new();
                edits(&word[..end], 2, &mut deletes);
                keys.extend(deletes);
            }
        }
    }

    keys
}

/// Adds every string reachable from `word` by deleting up to `distance`
/// characters.
fn edits(word: &[char], distance: usize, keys: &mut HashSet<SmolStr>) {
    if distance == 0 {
        return;
    }

    for i in 0..word.len() {
        let mut deleted = word.to_vec();
        deleted.remove(i);
        let key: SmolStr = deleted.iter().copied().collect();

        if keys.insert(key) && distance > 1 {
            edits(&deleted, distance - 1, keys);
        }
    }
}
