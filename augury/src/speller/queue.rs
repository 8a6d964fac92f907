//! Fixed capacity queue keeping the highest scoring words of a large scan.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use smol_str::SmolStr;

use super::suggestion::{sort_best_first, Suggestion};
use crate::types::Similarity;

#[derive(Debug)]
struct Entry {
    suggestion: Suggestion,
    sequence: u64,
}

// `BinaryHeap` pops its greatest element, so the ordering is reversed: the
// lowest similarity is greatest, and among equals the earliest insertion.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .suggestion
            .similarity
            .partial_cmp(&self.suggestion.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Min-heap on similarity holding at most `capacity` words.
///
/// Once full, a word scoring above the current minimum evicts it, a word
/// scoring below is dropped, and a word tying the minimum is kept aside as
/// an extra. Extras are discarded whenever the minimum is evicted.
/// Iteration yields the heap members followed by the extras.
#[derive(Debug)]
pub struct WordQueue {
    capacity: usize,
    heap: BinaryHeap<Entry>,
    extras: Vec<Suggestion>,
    sequence: u64,
}

impl WordQueue {
    pub fn new(capacity: usize) -> WordQueue {
        WordQueue {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
            extras: vec![],
            sequence: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Heap members only; extras are not counted.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn extras(&self) -> &[Suggestion] {
        &self.extras
    }

    pub fn enqueue(&mut self, value: SmolStr, similarity: Similarity) {
        if self.capacity == 0 {
            return;
        }

        let suggestion = Suggestion::new(value, similarity);

        if self.heap.len() < self.capacity {
            self.push(suggestion);
            return;
        }

        let minimum = match self.heap.peek() {
            Some(entry) => entry.suggestion.similarity,
            None => return,
        };

        if similarity > minimum {
            self.heap.pop();
            self.extras.clear();
            self.push(suggestion);
        } else if similarity == minimum {
            self.extras.push(suggestion);
        }
    }

    /// Removes the lowest scoring heap member, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<Suggestion> {
        self.heap.pop().map(|entry| entry.suggestion)
    }

    /// The lowest scoring heap member.
    pub fn peek(&self) -> Option<&Suggestion> {
        self.heap.peek().map(|entry| &entry.suggestion)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suggestion> {
        self.heap
            .iter()
            .map(|entry| &entry.suggestion)
            .chain(self.extras.iter())
    }

    /// Heap members and extras, best first.
    pub fn into_sorted_vec(self) -> Vec<Suggestion> {
        let mut out: Vec<Suggestion> = self.into_iter().collect();
        sort_best_first(&mut out);
        out
    }

    fn push(&mut self, suggestion: Suggestion) {
        self.sequence += 1;
        self.heap.push(Entry {
            suggestion,
            sequence: self.sequence,
        });
    }
}

impl IntoIterator for WordQueue {
    type Item = Suggestion;
    type IntoIter = std::vec::IntoIter<Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        let mut out: Vec<Suggestion> = self
            .heap
            .into_iter()
            .map(|entry| entry.suggestion)
            .collect();
        out.extend(self.extras);
        out.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(queue: WordQueue) -> Vec<String> {
        queue
            .into_sorted_vec()
            .into_iter()
            .map(|s| s.value.to_string())
            .collect()
    }

    #[test]
    fn keeps_top_k_regardless_of_order() {
        let items = [("a", 0.1), ("b", 0.9), ("c", 0.5), ("d", 0.7), ("e", 0.3)];

        let mut forward = WordQueue::new(3);
        for (w, p) in items.iter() {
            forward.enqueue((*w).into(), *p);
        }

        let mut backward = WordQueue::new(3);
        for (w, p) in items.iter().rev() {
            backward.enqueue((*w).into(), *p);
        }

        assert_eq!(words(forward), vec!["b", "d", "c"]);
        assert_eq!(words(backward), vec!["b", "d", "c"]);
    }

    #[test]
    fn ties_at_the_boundary_become_extras() {
        let mut queue = WordQueue::new(2);
        queue.enqueue("a".into(), 0.9);
        queue.enqueue("b".into(), 0.5);
        queue.enqueue("c".into(), 0.5);
        queue.enqueue("d".into(), 0.1);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.extras().len(), 1);
        assert_eq!(queue.iter().count(), 3);
        assert_eq!(words(queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn eviction_clears_extras() {
        let mut queue = WordQueue::new(2);
        queue.enqueue("a".into(), 0.9);
        queue.enqueue("b".into(), 0.5);
        queue.enqueue("c".into(), 0.5);
        queue.enqueue("d".into(), 0.8);

        assert!(queue.extras().is_empty());
        assert_eq!(words(queue), vec!["a", "d"]);
    }

    #[test]
    fn dequeue_is_fifo_on_ties() {
        let mut queue = WordQueue::new(4);
        queue.enqueue("first".into(), 0.5);
        queue.enqueue("high".into(), 0.9);
        queue.enqueue("second".into(), 0.5);

        assert_eq!(queue.peek().map(|s| s.value()), Some("first"));
        assert_eq!(queue.dequeue().map(|s| s.value), Some("first".into()));
        assert_eq!(queue.dequeue().map(|s| s.value), Some("second".into()));
        assert_eq!(queue.dequeue().map(|s| s.value), Some("high".into()));
        assert!(queue.dequeue().is_none());
        assert!(queue.peek().is_none());
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut queue = WordQueue::new(0);
        queue.enqueue("a".into(), 1.0);
        assert!(queue.is_empty());
        assert!(queue.dequeue().is_none());
        assert_eq!(queue.into_sorted_vec().len(), 0);
    }
}
