use hashbrown::HashSet;
use smol_str::SmolStr;

use crate::dawg::Dawg;
use crate::metric::max_length_for_prefix;
use crate::types::NodeIndex;

/// Per-query state of the fuzzy walk over a [`Dawg`].
///
/// The walk spends one unit of the edit budget per insertion, deletion,
/// substitution or transposition. Recursion depth is bounded by the input
/// length plus the budget.
pub(crate) struct SpellerWorker<'a> {
    dawg: &'a Dawg,
    prefix: String,
    prefix_len: usize,
    found: HashSet<SmolStr>,
}

impl<'a> SpellerWorker<'a> {
    pub(crate) fn new(dawg: &'a Dawg) -> SpellerWorker<'a> {
        SpellerWorker {
            dawg,
            prefix: String::new(),
            prefix_len: 0,
            found: HashSet::new(),
        }
    }

    /// Follows `anchor` literally from the root.
    pub(crate) fn descend(&mut self, anchor: &[char]) -> Option<NodeIndex> {
        let mut node = self.dawg.root();
        for &ch in anchor {
            node = self.dawg.child(node, ch)?;
            self.push(ch);
        }
        Some(node)
    }

    /// Candidates found so far, sorted so ranking does not depend on hash
    /// order.
    pub(crate) fn into_candidates(self) -> Vec<SmolStr> {
        let mut candidates: Vec<SmolStr> = self.found.into_iter().collect();
        candidates.sort_unstable();
        candidates
    }

    pub(crate) fn find_corrections(
        &mut self,
        node: NodeIndex,
        input: &[char],
        budget: usize,
        matches: usize,
        transpositions: usize,
    ) {
        let want = match input.first() {
            Some(&ch) => ch,
            None => return self.complete(node, matches, transpositions),
        };

        let edges = self.dawg.edge_range(node);

        // Deletion: drop input characters without moving in the graph. A
        // leaf has nothing left to match them against.
        if budget > 0 && input.len() > 1 && !edges.is_empty() {
            self.find_corrections(node, &input[2..], budget - 1, matches, transpositions);
        }

        for edge in edges {
            let found = self.dawg.edge_char(edge);
            let next = self.dawg.edge_target(edge);
            self.push(found);

            if want == found {
                self.find_corrections(next, &input[1..], budget, matches + 1, transpositions);
            }

            if budget > 0 {
                // Insertion
                self.find_corrections(next, input, budget - 1, matches, transpositions);
                // Substitution
                self.find_corrections(next, &input[1..], budget - 1, matches, transpositions);
                self.transposed(
                    next,
                    &input[1..],
                    budget - 1,
                    (want, found),
                    matches,
                    transpositions + 1,
                );
            }

            self.pop();
        }
    }

    /// Continues a walk where `swapped.0` was typed but `swapped.1` was
    /// taken. It rejoins [`find_corrections`](Self::find_corrections) once
    /// the opposite pair turns up.
    fn transposed(
        &mut self,
        node: NodeIndex,
        input: &[char],
        budget: usize,
        swapped: (char, char),
        matches: usize,
        transpositions: usize,
    ) {
        let want = match input.first() {
            Some(&ch) => ch,
            None => return,
        };

        let edges = self.dawg.edge_range(node);

        if budget > 0 && input.len() > 1 && !edges.is_empty() {
            self.transposed(node, &input[2..], budget - 1, swapped, matches, transpositions);
        }

        for edge in edges {
            let found = self.dawg.edge_char(edge);
            let next = self.dawg.edge_target(edge);
            self.push(found);

            if want == swapped.1 && found == swapped.0 {
                self.find_corrections(next, &input[1..], budget, matches, transpositions);
            } else {
                if want == found {
                    self.transposed(next, &input[1..], budget, swapped, matches + 1, transpositions);
                }

                if budget > 0 {
                    self.transposed(next, input, budget - 1, swapped, matches, transpositions);
                    self.transposed(next, &input[1..], budget - 1, swapped, matches, transpositions);
                }
            }

            self.pop();
        }
    }

    /// Input exhausted: collect the words below `node` that are short enough
    /// to still score well.
    fn complete(&mut self, node: NodeIndex, matches: usize, transpositions: usize) {
        if matches == 0 {
            return;
        }

        let built = self.prefix_len;
        let max_depth = max_length_for_prefix(matches, built, transpositions)
            .map(|len| len.saturating_sub(built));

        let SpellerWorker {
            dawg,
            prefix,
            found,
            ..
        } = self;

        dawg.collect_words(node, prefix, max_depth, |word| {
            found.insert(SmolStr::new(word));
        });
    }

    #[inline(always)]
    fn push(&mut self, ch: char) {
        self.prefix.push(ch);
        self.prefix_len += 1;
    }

    #[inline(always)]
    fn pop(&mut self) {
        self.prefix.pop();
        self.prefix_len -= 1;
    }
}
