//! Fuzzy prefix lookup: completions and corrections for a partially typed
//! word, ranked by bounded Jaro-Winkler similarity.

use smol_str::SmolStr;

use self::queue::WordQueue;
use self::suggestion::sort_best_first;
pub use self::suggestion::Suggestion;
use self::worker::SpellerWorker;
use crate::constants::ANCHOR_MIN_INPUT;
use crate::dawg::{Dawg, DawgError};
use crate::metric::bounded_similarity;

pub mod queue;
pub mod suggestion;
pub mod symmetric;
mod worker;

pub use self::symmetric::SymmetricPredictor;

/// Finds words close to a typed prefix.
pub trait PrefixLookup {
    /// Up to `max_results` candidates best first, plus any words tying the
    /// lowest kept score.
    fn prefix_lookup(&self, input: &str, max_results: usize) -> Vec<Suggestion>;
}

/// Edit budget for the part of the input searched fuzzily.
#[inline(always)]
fn max_edits(len: usize) -> usize {
    match len {
        0..=2 => 0,
        3..=4 => 1,
        _ => 2,
    }
}

/// Scores candidates against the full input and keeps the best
/// `max_results`.
pub(crate) fn rank(input: &[char], candidates: Vec<SmolStr>, max_results: usize) -> Vec<Suggestion> {
    let score = |word: &SmolStr| {
        let chars: Vec<char> = word.chars().collect();
        bounded_similarity(input, &chars)
    };

    if candidates.len() <= max_results {
        let mut out: Vec<Suggestion> = candidates
            .into_iter()
            .map(|word| {
                let similarity = score(&word);
                Suggestion::new(word, similarity)
            })
            .collect();
        sort_best_first(&mut out);
        return out;
    }

    let mut queue = WordQueue::new(max_results);
    for word in candidates {
        let similarity = score(&word);
        queue.enqueue(word, similarity);
    }
    queue.into_sorted_vec()
}

/// Edit-distance bounded search over a [`Dawg`].
///
/// Inputs longer than five characters have their first `(len - 1) / 2`
/// characters matched literally; the rest is searched with up to two edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellCheck {
    dawg: Dawg,
}

impl SpellCheck {
    pub fn new(dawg: Dawg) -> SpellCheck {
        SpellCheck { dawg }
    }

    pub fn from_sorted_words<I, S>(words: I) -> Result<SpellCheck, DawgError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(SpellCheck::new(Dawg::from_sorted_words(words)?))
    }

    pub fn dawg(&self) -> &Dawg {
        &self.dawg
    }
}

impl PrefixLookup for SpellCheck {
    fn prefix_lookup(&self, input: &str, max_results: usize) -> Vec<Suggestion> {
        let chars: Vec<char> = input.chars().collect();
        let anchor = if chars.len() > ANCHOR_MIN_INPUT {
            (chars.len() - 1) / 2
        } else {
            0
        };

        let mut worker = SpellerWorker::new(&self.dawg);
        let start = match worker.descend(&chars[..anchor]) {
            Some(node) => node,
            None => {
                log::trace!("{}: anchor not in graph", input);
                return vec![];
            }
        };

        let rest = &chars[anchor..];
        worker.find_corrections(start, rest, max_edits(rest.len()), anchor, 0);

        let candidates = worker.into_candidates();
        log::trace!("{}: {} candidates", input, candidates.len());
        rank(&chars, candidates, max_results)
    }
}

/// The prefix lookup structures a predictor can be built on.
#[derive(Debug, Clone, PartialEq)]
pub enum SpellerKind {
    Dawg(SpellCheck),
    Symmetric(SymmetricPredictor),
}

impl PrefixLookup for SpellerKind {
    fn prefix_lookup(&self, input: &str, max_results: usize) -> Vec<Suggestion> {
        match self {
            SpellerKind::Dawg(speller) => speller.prefix_lookup(input, max_results),
            SpellerKind::Symmetric(speller) => speller.prefix_lookup(input, max_results),
        }
    }
}

impl From<SpellCheck> for SpellerKind {
    fn from(speller: SpellCheck) -> Self {
        SpellerKind::Dawg(speller)
    }
}

impl From<SymmetricPredictor> for SpellerKind {
    fn from(speller: SymmetricPredictor) -> Self {
        SpellerKind::Symmetric(speller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speller(words: &[&str]) -> SpellCheck {
        let mut words = words.to_vec();
        crate::dawg::sort_words(&mut words);
        SpellCheck::from_sorted_words(words).unwrap()
    }

    fn values(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.value()).collect()
    }

    #[test]
    fn love() {
        let speller = speller(&["live", "love", "loved", "house", "lamp", "glove"]);
        let results = speller.prefix_lookup("love", 100);
        let words = values(&results);

        assert!(words.contains(&"love"));
        assert!(words.contains(&"loved"));
        assert!(words.contains(&"live"));
        assert_eq!(words[0], "love");
        assert_eq!(results[0].similarity, 1.0);

        let all = speller.dawg().all_words();
        for word in words {
            assert!(all.iter().any(|w| w == word), "{} is not a word", word);
        }
    }

    #[test]
    fn completes_prefixes() {
        let speller = speller(&["lovely", "love", "loved", "lover", "lamp"]);
        let words: Vec<String> = speller
            .prefix_lookup("lov", 100)
            .into_iter()
            .map(|s| s.value.to_string())
            .collect();

        assert!(words.contains(&"love".to_string()));
        assert!(words.contains(&"loved".to_string()));
        assert!(words.contains(&"lover".to_string()));
        assert!(words.contains(&"lovely".to_string()));
    }

    #[test]
    fn corrects_transpositions() {
        let speller = speller(&["love", "house"]);
        let words: Vec<String> = speller
            .prefix_lookup("lvoe", 10)
            .into_iter()
            .map(|s| s.value.to_string())
            .collect();
        assert!(words.contains(&"love".to_string()));
        assert!(!words.contains(&"house".to_string()));
    }

    #[test]
    fn long_input_is_anchored() {
        let speller = speller(&["houseboats", "housebound", "mouseboat"]);
        let results = speller.prefix_lookup("houseboat", 10);
        let words = values(&results);

        assert!(words.contains(&"houseboats"));
        assert!(words.contains(&"housebound"));
        assert!(!words.contains(&"mouseboat"));
    }

    #[test]
    fn long_completions_are_cut() {
        let speller = speller(&["love", "lovingkindness"]);

        // Two matches out of three typed characters leave room for short
        // words only.
        let words = values(&speller.prefix_lookup("lqv", 10)).join(",");
        assert_eq!(words, "love");

        let words = values(&speller.prefix_lookup("lov", 10)).join(",");
        assert!(words.contains("lovingkindness"), "{}", words);
    }

    #[test]
    fn leaves_do_not_swallow_input() {
        assert!(speller(&["l"]).prefix_lookup("lqv", 10).is_empty());
        assert!(speller(&["lo"]).prefix_lookup("loqv", 10).is_empty());
    }

    #[test]
    fn unknown_anchor_is_empty() {
        let speller = speller(&["houseboats", "housebound"]);
        assert!(speller.prefix_lookup("xyzzyboat", 10).is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        let speller = speller(&["a", "b"]);
        assert!(speller.prefix_lookup("", 10).is_empty());
    }

    #[test]
    fn truncates_to_max_results() {
        let speller = speller(&["live", "love", "loved", "lover", "lovely", "glove"]);
        let results = speller.prefix_lookup("love", 1);
        assert_eq!(values(&results), vec!["love"]);
    }

    #[test]
    fn edit_budget() {
        assert_eq!(max_edits(0), 0);
        assert_eq!(max_edits(2), 0);
        assert_eq!(max_edits(3), 1);
        assert_eq!(max_edits(4), 1);
        assert_eq!(max_edits(5), 2);
    }

    #[test]
    fn dispatches_through_kind() {
        let kind = SpellerKind::from(speller(&["love"]));
        assert_eq!(values(&kind.prefix_lookup("love", 5)), vec!["love"]);
    }
}
