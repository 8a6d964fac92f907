use super::StringMetric;
use crate::constants::{BOOST_THRESHOLD, MAX_PREFIX_SCALE};
use crate::types::Similarity;

/// Exact Jaro-Winkler similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl StringMetric for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> Similarity {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        if a == b {
            return 1.0;
        }

        let (min, max) = order(&a, &b);
        if min.is_empty() {
            return 0.0;
        }

        let (matches, transpositions) = matches(min, max);
        if matches == 0 {
            return 0.0;
        }

        boosted(matches, transpositions, min.len(), max.len(), shared_prefix(min, max))
    }
}

/// Returns `(shorter, longer)`; equal lengths keep the argument order.
#[inline(always)]
pub(crate) fn order<'a>(a: &'a [char], b: &'a [char]) -> (&'a [char], &'a [char]) {
    if a.len() > b.len() {
        (b, a)
    } else {
        (a, b)
    }
}

#[inline(always)]
pub(crate) fn shared_prefix(min: &[char], max: &[char]) -> usize {
    min.iter().zip(max.iter()).take_while(|(x, y)| x == y).count()
}

/// Counts matching characters of `min` within the Jaro window of `max`, and
/// how many of them appear out of order.
pub(crate) fn matches(min: &[char], max: &[char]) -> (usize, usize) {
    let range = (max.len() / 2).saturating_sub(1);
    let mut claimed = vec![false; max.len()];
    let mut indexes = Vec::with_capacity(min.len());

    for (mi, &ch) in min.iter().enumerate() {
        let start = mi.saturating_sub(range);
        let end = (mi + range + 1).min(max.len());

        for xi in start..end {
            if !claimed[xi] && max[xi] == ch {
                claimed[xi] = true;
                indexes.push(xi);
                break;
            }
        }
    }

    if indexes.is_empty() {
        return (0, 0);
    }

    let mut sorted = indexes.clone();
    sorted.sort_unstable();

    // Walk the matches in input order against their sorted positions; a
    // match is in order only when it lines up with the next sorted slot.
    let mut next = 0;
    let mut transpositions = 0;
    for &index in &indexes {
        if index == sorted[next] {
            next += 1;
        } else {
            transpositions += 1;
        }
    }

    (indexes.len(), transpositions)
}

/// Jaro score from match statistics, with the Winkler boost applied once it
/// clears the boost threshold.
pub(crate) fn boosted(
    matches: usize,
    transpositions: usize,
    min_len: usize,
    max_len: usize,
    prefix: usize,
) -> Similarity {
    let m = matches as f64;
    let jaro = (m / min_len as f64 + m / max_len as f64 + (m - transpositions as f64) / m) / 3.0;

    if jaro < BOOST_THRESHOLD {
        return jaro;
    }

    let scale = MAX_PREFIX_SCALE.min(1.0 / max_len as f64);
    jaro + scale * prefix as f64 * (1.0 - jaro)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string() {
        let metric = JaroWinkler;
        assert_eq!(metric.similarity("", ""), 1.0);
        assert_eq!(metric.similarity("hello", "hello"), 1.0);
        assert_eq!(metric.similarity(&"a".repeat(50), &"a".repeat(50)), 1.0);
    }

    #[test]
    fn one_empty() {
        assert_eq!(JaroWinkler.similarity("", "abc"), 0.0);
        assert_eq!(JaroWinkler.similarity("abc", ""), 0.0);
    }

    #[test]
    fn no_matches() {
        assert_eq!(JaroWinkler.similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn known_values() {
        let score = JaroWinkler.similarity("martha", "marhta");
        assert!((score - 830.0 / 900.0).abs() < 1e-4, "{}", score);

        let score = JaroWinkler.similarity("jones", "johnson");
        assert!((score - 0.832).abs() < 1e-3, "{}", score);
    }

    #[test]
    fn symmetric() {
        let pairs = [("dixon", "dicksonx"), ("love", "loved"), ("abcd", "badc")];
        for (a, b) in pairs.iter() {
            assert_eq!(JaroWinkler.similarity(a, b), JaroWinkler.similarity(b, a));
        }
    }

    #[test]
    fn compares_code_points() {
        assert_eq!(JaroWinkler.similarity("čáhci", "čáhci"), 1.0);
        let score = JaroWinkler.similarity("čáhci", "cahci");
        assert!(score < 1.0 && score > 0.0);
    }

    #[test]
    fn transposition_beats_replacement() {
        let metric = JaroWinkler;
        let transposed = metric.similarity("abcd", "abdc");
        let replaced = metric.similarity("abcd", "abxd");
        let inserted = metric.similarity("abcd", "abxcd");
        assert!(transposed < 1.0);
        assert!(replaced < 1.0);
        assert!(inserted < 1.0);
    }
}
