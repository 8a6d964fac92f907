use std::sync::OnceLock;

use super::jaro_winkler::{boosted, matches, order, shared_prefix};
use super::StringMetric;
use crate::constants::{
    BOOST_THRESHOLD, MAX_BOUNDED_LEN, MAX_PREFIX_SCALE, PRUNE_THRESHOLD, PRUNING_TABLE_SIZE,
};
use crate::types::Similarity;

/// Jaro-Winkler similarity that skips the matching pass when a word pair
/// provably cannot reach the pruning threshold.
///
/// Below the threshold the score is an estimate that never exceeds the
/// exact [`JaroWinkler`](super::JaroWinkler) value. Words longer than 30
/// characters always score 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedJaroWinkler;

impl StringMetric for BoundedJaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> Similarity {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        bounded_similarity(&a, &b)
    }
}

pub(crate) fn bounded_similarity(a: &[char], b: &[char]) -> Similarity {
    let (min, max) = order(a, b);

    if max.len() > MAX_BOUNDED_LEN {
        return 0.0;
    }

    if a == b {
        return 1.0;
    }

    if min.is_empty() {
        return 0.0;
    }

    let prefix = shared_prefix(min, max);
    let estimate = (prefix as f64 / min.len() as f64 + prefix as f64 / max.len() as f64) / 3.0;

    if !PruningTable::get().can_reach(max.len(), min.len(), prefix) {
        return estimate;
    }

    let (matches, transpositions) = matches(min, max);
    if matches == 0 {
        return estimate;
    }

    boosted(matches, transpositions, min.len(), max.len(), prefix)
}

/// Longest counterpart a word could have and still reach the boost
/// threshold, given `matches` matched characters out of `len` typed with
/// `transpositions` of them out of order.
///
/// `None` means no length can be ruled out.
pub fn max_length_for_prefix(matches: usize, len: usize, transpositions: usize) -> Option<usize> {
    if matches == 0 || len == 0 {
        return None;
    }

    let m = matches as f64;
    let denom = 3.0 * BOOST_THRESHOLD - (m - transpositions as f64) / m - m / len as f64;

    if denom <= 0.0 {
        return None;
    }

    Some((m / denom).floor() as usize)
}

/// For each `(longer, shorter, prefix)` length triple, whether the best
/// possible Jaro-Winkler score clears the pruning threshold.
struct PruningTable {
    flags: Vec<bool>,
}

static PRUNING_TABLE: OnceLock<PruningTable> = OnceLock::new();

impl PruningTable {
    fn get() -> &'static PruningTable {
        PRUNING_TABLE.get_or_init(PruningTable::build)
    }

    fn build() -> PruningTable {
        let n = PRUNING_TABLE_SIZE;
        let mut flags = vec![false; n * n * n];

        for x in 1..n {
            let scale = MAX_PREFIX_SCALE.min(1.0 / x as f64);
            for y in 0..=x {
                // Best case: every character of the shorter word matches
                // and nothing is transposed.
                let jaro = 2.0 / 3.0 + y as f64 / (3.0 * x as f64);
                for prefix in 0..=y {
                    let boost = prefix as f64 * scale;
                    flags[Self::index(x, y, prefix)] = jaro + boost * (1.0 - jaro) > PRUNE_THRESHOLD;
                }
            }
        }

        PruningTable { flags }
    }

    #[inline(always)]
    fn index(longer: usize, shorter: usize, prefix: usize) -> usize {
        (longer * PRUNING_TABLE_SIZE + shorter) * PRUNING_TABLE_SIZE + prefix
    }

    #[inline(always)]
    fn can_reach(&self, longer: usize, shorter: usize, prefix: usize) -> bool {
        longer < PRUNING_TABLE_SIZE && self.flags[Self::index(longer, shorter, prefix)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::JaroWinkler;

    #[test]
    fn same_string() {
        let metric = BoundedJaroWinkler;
        assert_eq!(metric.similarity("", ""), 1.0);
        assert_eq!(metric.similarity("a", "a"), 1.0);
        assert_eq!(metric.similarity("predictive", "predictive"), 1.0);
        assert_eq!(metric.similarity(&"a".repeat(30), &"a".repeat(30)), 1.0);
    }

    #[test]
    fn long_strings_score_zero() {
        let long = "a".repeat(31);
        assert_eq!(BoundedJaroWinkler.similarity(&long, &long), 0.0);
        assert_eq!(BoundedJaroWinkler.similarity("a", &long), 0.0);
        assert_eq!(BoundedJaroWinkler.similarity(&long, "abc"), 0.0);
    }

    #[test]
    fn never_above_exact() {
        let words = [
            "ab", "abcd", "acbd", "adbc", "badc", "axcd", "abxd", "axyd", "axbcd", "abcxd",
            "axbcyd", "love", "loved", "live", "lovely", "x", "", "čáhci",
        ];

        for a in words.iter() {
            for b in words.iter() {
                let bounded = BoundedJaroWinkler.similarity(a, b);
                let exact = JaroWinkler.similarity(a, b);
                assert!(bounded <= exact, "{} {}: {} > {}", a, b, bounded, exact);
            }
        }
    }

    #[test]
    fn close_words_are_exact() {
        let bounded = BoundedJaroWinkler.similarity("lov", "love");
        let exact = JaroWinkler.similarity("lov", "love");
        assert_eq!(bounded, exact);
    }

    #[test]
    fn far_words_are_estimated() {
        // "a" against a ten letter word can never clear the threshold.
        let score = BoundedJaroWinkler.similarity("a", "abcdefghij");
        assert!((score - (1.0 + 0.1) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn length_bound() {
        assert_eq!(max_length_for_prefix(0, 3, 0), None);
        assert_eq!(max_length_for_prefix(2, 3, 0), Some(4));
        assert_eq!(max_length_for_prefix(2, 4, 1), Some(1));
        assert!(max_length_for_prefix(4, 4, 0).unwrap() >= 30);
    }
}
