//! Directed acyclic word graph: a minimized trie frozen into flat arrays.
//!
//! Node ids are dense. Terminal nodes take the ids below `terminal_count`,
//! so checking whether a node ends a word is a single comparison. The
//! edges of node `i` occupy `first_child_index[i]..first_child_index[i + 1]`
//! (the last node's range ends at `edges.len()`), ordered by character.

use std::cmp::Ordering;
use std::ops::Range;

mod builder;
mod error;

pub use self::builder::DawgBuilder;
pub use self::error::DawgError;

use crate::types::{CharIndex, NodeIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dawg {
    pub(crate) terminal_count: u32,
    pub(crate) characters: Vec<char>,
    pub(crate) root: NodeIndex,
    pub(crate) first_child_index: Vec<u32>,
    pub(crate) edges: Vec<NodeIndex>,
    pub(crate) edge_character: Vec<CharIndex>,
}

impl Dawg {
    /// Builds a graph from words already sorted with [`sort_words`].
    pub fn from_sorted_words<I, S>(words: I) -> Result<Dawg, DawgError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = DawgBuilder::new();
        for word in words {
            builder.insert(word.as_ref())?;
        }
        builder.finish()
    }

    /// Assembles a graph from its flat arrays, checking that every index
    /// stays in range and that no edge closes a cycle.
    pub fn from_raw_parts(
        terminal_count: u32,
        characters: Vec<char>,
        root: NodeIndex,
        first_child_index: Vec<u32>,
        edges: Vec<NodeIndex>,
        edge_character: Vec<CharIndex>,
    ) -> Result<Dawg, DawgError> {
        let invalid = |reason: &str| Err(DawgError::InvalidStructure(reason.to_string()));
        let nodes = first_child_index.len();

        if nodes == 0 {
            return invalid("graph has no nodes");
        }
        if root as usize >= nodes {
            return invalid("root index out of range");
        }
        if terminal_count as usize > nodes {
            return invalid("terminal count exceeds node count");
        }
        if edges.len() != edge_character.len() {
            return invalid("edge and edge character arrays differ in length");
        }
        if characters.len() > CharIndex::MAX as usize + 1 {
            return Err(DawgError::AlphabetTooLarge(characters.len()));
        }

        let mut last = 0;
        for &start in first_child_index.iter() {
            if start < last || start as usize > edges.len() {
                return invalid("edge offsets are not monotone");
            }
            last = start;
        }

        if edges.iter().any(|&target| target as usize >= nodes) {
            return invalid("edge target out of range");
        }
        if edge_character
            .iter()
            .any(|&ch| ch as usize >= characters.len())
        {
            return invalid("edge character out of range");
        }

        let dawg = Dawg {
            terminal_count,
            characters,
            root,
            first_child_index,
            edges,
            edge_character,
        };

        if dawg.has_cycle() {
            return invalid("graph contains a cycle");
        }

        Ok(dawg)
    }

    /// Depth-first colouring over every node: reaching a node that is still
    /// on the stack means a back edge.
    fn has_cycle(&self) -> bool {
        const UNSEEN: u8 = 0;
        const OPEN: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNSEEN; self.node_count()];

        for start in 0..self.node_count() {
            if state[start] != UNSEEN {
                continue;
            }

            state[start] = OPEN;
            let mut stack = vec![(start, self.edge_range(start as NodeIndex))];

            loop {
                let (node, edge) = match stack.last_mut() {
                    Some((node, range)) => (*node, range.next()),
                    None => break,
                };

                match edge {
                    Some(edge) => {
                        let target = self.edges[edge] as usize;
                        match state[target] {
                            UNSEEN => {
                                state[target] = OPEN;
                                stack.push((target, self.edge_range(target as NodeIndex)));
                            }
                            OPEN => return true,
                            _ => {}
                        }
                    }
                    None => {
                        state[node] = DONE;
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    #[inline(always)]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    #[inline(always)]
    pub fn node_count(&self) -> usize {
        self.first_child_index.len()
    }

    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Distinct edge labels, in edge order.
    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    #[inline(always)]
    pub fn is_terminal(&self, node: NodeIndex) -> bool {
        node < self.terminal_count
    }

    #[inline(always)]
    pub(crate) fn edge_range(&self, node: NodeIndex) -> Range<usize> {
        let node = node as usize;
        let start = self.first_child_index[node] as usize;
        let end = self
            .first_child_index
            .get(node + 1)
            .map(|&end| end as usize)
            .unwrap_or_else(|| self.edges.len());
        start..end
    }

    #[inline(always)]
    pub(crate) fn edge_char(&self, edge: usize) -> char {
        self.characters[self.edge_character[edge] as usize]
    }

    #[inline(always)]
    pub(crate) fn edge_target(&self, edge: usize) -> NodeIndex {
        self.edges[edge]
    }

    pub fn child(&self, node: NodeIndex, ch: char) -> Option<NodeIndex> {
        self.edge_range(node)
            .find(|&edge| self.edge_char(edge) == ch)
            .map(|edge| self.edges[edge])
    }

    /// The node reached by spelling `prefix` from the root.
    pub fn node_for_string(&self, prefix: &str) -> Option<NodeIndex> {
        prefix
            .chars()
            .try_fold(self.root, |node, ch| self.child(node, ch))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.node_for_string(word)
            .map(|node| self.is_terminal(node))
            .unwrap_or(false)
    }

    /// Every stored word, in graph order.
    pub fn all_words(&self) -> Vec<String> {
        let mut words = vec![];
        let mut prefix = String::new();
        self.collect_words(self.root, &mut prefix, None, |word| {
            words.push(word.to_string())
        });
        words
    }

    /// Words starting with `prefix` that end at most `max_depth` characters
    /// below `node`, which must be the node `prefix` leads to.
    pub fn match_prefix(
        &self,
        node: NodeIndex,
        prefix: &str,
        max_depth: Option<usize>,
    ) -> Vec<String> {
        let mut words = vec![];
        let mut scratch = prefix.to_string();
        self.collect_words(node, &mut scratch, max_depth, |word| {
            words.push(word.to_string())
        });
        words
    }

    /// Depth-first walk below `start` with an explicit stack, calling `emit`
    /// with `prefix` extended to each terminal reached. `prefix` is restored
    /// before returning.
    pub(crate) fn collect_words<F>(
        &self,
        start: NodeIndex,
        prefix: &mut String,
        max_depth: Option<usize>,
        mut emit: F,
    ) where
        F: FnMut(&str),
    {
        if self.is_terminal(start) {
            emit(prefix.as_str());
        }

        if max_depth == Some(0) {
            return;
        }

        let mut stack: Vec<Range<usize>> = vec![self.edge_range(start)];

        loop {
            let edge = match stack.last_mut() {
                Some(range) => range.next(),
                None => break,
            };

            match edge {
                Some(edge) => {
                    let target = self.edges[edge];
                    prefix.push(self.edge_char(edge));

                    if self.is_terminal(target) {
                        emit(prefix.as_str());
                    }

                    if max_depth.map_or(true, |depth| stack.len() < depth) {
                        stack.push(self.edge_range(target));
                    } else {
                        prefix.pop();
                    }
                }
                None => {
                    stack.pop();
                    if !stack.is_empty() {
                        prefix.pop();
                    }
                }
            }
        }
    }
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// Simple case folding onto the uppercase letter. A character folds only
/// when it belongs to an uppercase/lowercase pair that maps back and forth,
/// so two distinct lowercase letters (Turkish `ı` and `i`) never share a key.
#[inline(always)]
fn fold_case(ch: char) -> char {
    let upper = match single(ch.to_uppercase()) {
        Some(upper) => upper,
        None => return ch,
    };
    let lower = match single(upper.to_lowercase()) {
        Some(lower) => lower,
        None => return ch,
    };

    if (ch == upper || ch == lower) && single(lower.to_uppercase()) == Some(upper) {
        upper
    } else {
        ch
    }
}

/// Edge ordering key matching [`compare_words`] on single characters.
#[inline(always)]
pub(crate) fn char_key(ch: char) -> (char, char) {
    (fold_case(ch), ch)
}

/// Case-insensitive ordinal order, with ordinal order breaking ties so that
/// only identical words compare equal. This is the order
/// [`DawgBuilder`] expects.
pub fn compare_words(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(fold_case)
        .cmp(b.chars().map(fold_case))
        .then_with(|| a.cmp(b))
}

/// Sorts words into insertion order for [`DawgBuilder`].
pub fn sort_words<S: AsRef<str>>(words: &mut [S]) {
    words.sort_by(|a, b| compare_words(a.as_ref(), b.as_ref()));
}
