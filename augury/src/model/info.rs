//! Per-context statistics of the Modified Kneser-Ney model.

use hashbrown::HashMap;

use crate::types::{Count, WordId};

/// How many distinct continuations of a context were seen exactly once,
/// exactly twice, and three or more times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContinuationBuckets {
    pub one: u32,
    pub two: u32,
    pub three_plus: u32,
}

impl ContinuationBuckets {
    #[inline(always)]
    pub(crate) fn record(&mut self, count: Count) {
        match count {
            0 => {}
            1 => self.one += 1,
            2 => self.two += 1,
            _ => self.three_plus += 1,
        }
    }

    /// Total discount mass these continuations give up.
    #[inline(always)]
    pub(crate) fn discounted(&self, discounts: &Discounts) -> f64 {
        discounts.one * self.one as f64
            + discounts.two * self.two as f64
            + discounts.three_plus * self.three_plus as f64
    }
}

/// Number of n-grams of one order seen exactly 1, 2, 3 and 4 times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountHistogram(pub [u32; 4]);

impl CountHistogram {
    #[inline(always)]
    pub(crate) fn record(&mut self, count: Count) {
        if (1..=4).contains(&count) {
            self.0[count as usize - 1] += 1;
        }
    }
}

/// Absolute discounts for counts of one, two, and three or more.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Discounts {
    pub one: f64,
    pub two: f64,
    pub three_plus: f64,
}

#[inline(always)]
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl Discounts {
    /// Chen and Goodman's estimates from the count-of-counts:
    /// `Y = n1 / (n1 + 2 n2)`, `D(k) = k - (k + 1) Y n(k+1) / n(k)`.
    /// Empty buckets contribute nothing to a ratio.
    pub fn from_histogram(histogram: &CountHistogram) -> Discounts {
        let [n1, n2, n3, n4] = histogram.0.map(|n| n as f64);
        let y = ratio(n1, n1 + 2.0 * n2);

        Discounts {
            one: 1.0 - 2.0 * y * ratio(n2, n1),
            two: 2.0 - 3.0 * y * ratio(n3, n2),
            three_plus: 3.0 - 4.0 * y * ratio(n4, n3),
        }
    }

    #[inline(always)]
    pub fn for_count(&self, count: Count) -> f64 {
        match count {
            0 => 0.0,
            1 => self.one,
            2 => self.two,
            _ => self.three_plus,
        }
    }

    pub(crate) fn approx_eq(&self, other: &Discounts, tolerance: f64) -> bool {
        (self.one - other.one).abs() <= tolerance
            && (self.two - other.two).abs() <= tolerance
            && (self.three_plus - other.three_plus).abs() <= tolerance
    }
}

/// Statistics for one vocabulary word as a context and as a continuation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnigramInfo {
    pub(crate) count: Count,
    /// `N1+(•w•)`: distinct trigrams with this word in the middle
    pub(crate) middle_continuations: u32,
    /// `N1+(•w)`: distinct words preceding this one
    pub(crate) left_continuations: u32,
    pub(crate) buckets: ContinuationBuckets,
    pub(crate) most_likely: Vec<WordId>,
    pub(crate) bigrams: HashMap<WordId, BigramInfo>,
}

impl UnigramInfo {
    pub(crate) fn with_count(count: Count) -> UnigramInfo {
        UnigramInfo {
            count,
            ..Default::default()
        }
    }

    pub fn count(&self) -> Count {
        self.count
    }

    /// Most frequent following words, best first.
    pub fn most_likely(&self) -> &[WordId] {
        &self.most_likely
    }

    pub fn bigram(&self, next: WordId) -> Option<&BigramInfo> {
        self.bigrams.get(&next)
    }
}

/// Statistics for a retained bigram as a context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BigramInfo {
    pub(crate) count: Count,
    /// `N1+(•ww)`: distinct words preceding this bigram
    pub(crate) left_continuations: u32,
    pub(crate) buckets: ContinuationBuckets,
    pub(crate) most_likely: Vec<WordId>,
    pub(crate) trigrams: HashMap<WordId, Count>,
}

impl BigramInfo {
    pub(crate) fn with_count(count: Count) -> BigramInfo {
        BigramInfo {
            count,
            ..Default::default()
        }
    }

    pub fn count(&self) -> Count {
        self.count
    }

    pub fn most_likely(&self) -> &[WordId] {
        &self.most_likely
    }

    pub fn trigram_count(&self, next: WordId) -> Option<Count> {
        self.trigrams.get(&next).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets() {
        let mut buckets = ContinuationBuckets::default();
        for count in [0, 1, 1, 2, 3, 4, 9].iter() {
            buckets.record(*count);
        }
        assert_eq!(
            buckets,
            ContinuationBuckets {
                one: 2,
                two: 1,
                three_plus: 3
            }
        );
    }

    #[test]
    fn histogram_ignores_large_counts() {
        let mut histogram = CountHistogram::default();
        for count in [1, 2, 3, 4, 5, 100].iter() {
            histogram.record(*count);
        }
        assert_eq!(histogram.0, [1, 1, 1, 1]);
    }

    #[test]
    fn discounts() {
        let d = Discounts::from_histogram(&CountHistogram([4, 2, 1, 1]));
        let y = 4.0 / 8.0;
        assert!((d.one - (1.0 - 2.0 * y * 2.0 / 4.0)).abs() < 1e-12);
        assert!((d.two - (2.0 - 3.0 * y * 1.0 / 2.0)).abs() < 1e-12);
        assert!((d.three_plus - (3.0 - 4.0 * y * 1.0 / 1.0)).abs() < 1e-12);
        assert_eq!(d.for_count(0), 0.0);
        assert_eq!(d.for_count(7), d.three_plus);
    }

    #[test]
    fn empty_histogram_is_finite() {
        let d = Discounts::from_histogram(&CountHistogram::default());
        assert_eq!(d.one, 1.0);
        assert_eq!(d.two, 2.0);
        assert_eq!(d.three_plus, 3.0);
    }
}
