use std::cmp::Ordering;

use hashbrown::HashMap;
use itertools::Itertools;

use super::{char_key, compare_words, Dawg, DawgError};
use crate::types::{CharIndex, NodeIndex};

#[derive(Debug, Default)]
struct BuilderNode {
    terminal: bool,
    children: Vec<(char, usize)>,
}

impl BuilderNode {
    fn child(&self, ch: char) -> Option<usize> {
        self.children
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, child)| *child)
    }
}

/// Content key of a minimized node: its terminal flag and its edges to
/// already canonical children.
#[derive(Debug, PartialEq, Eq, Hash)]
struct NodeSignature {
    terminal: bool,
    edges: Vec<(char, usize)>,
}

/// Incremental minimal DAWG construction over sorted input.
///
/// Nodes live in an arena until [`finish`](DawgBuilder::finish) compacts the
/// reachable ones into a [`Dawg`]. Branches below the common prefix of two
/// consecutive words can no longer change, so they are merged into the
/// signature cache as soon as the next word diverges from them.
#[derive(Debug)]
pub struct DawgBuilder {
    nodes: Vec<BuilderNode>,
    unchecked: Vec<(usize, char, usize)>,
    minimized: HashMap<NodeSignature, usize>,
    previous: Option<String>,
    word_count: usize,
}

impl Default for DawgBuilder {
    fn default() -> Self {
        DawgBuilder::new()
    }
}

impl DawgBuilder {
    pub fn new() -> DawgBuilder {
        DawgBuilder {
            nodes: vec![BuilderNode::default()],
            unchecked: vec![],
            minimized: HashMap::new(),
            previous: None,
            word_count: 0,
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Adds the next word. It must sort strictly after the previous one
    /// under [`compare_words`].
    pub fn insert(&mut self, word: &str) -> Result<(), DawgError> {
        if word.is_empty() {
            return Err(DawgError::EmptyWord);
        }

        let common = match &self.previous {
            Some(previous) => {
                if compare_words(word, previous) != Ordering::Greater {
                    return Err(DawgError::Unsorted {
                        previous: previous.clone(),
                        word: word.to_string(),
                    });
                }

                previous
                    .chars()
                    .zip(word.chars())
                    .take_while(|(a, b)| a == b)
                    .count()
            }
            None => 0,
        };

        self.minimize(common);

        let mut node = self.unchecked.last().map(|(_, _, child)| *child).unwrap_or(0);

        for ch in word.chars().skip(common) {
            if self.nodes[node].child(ch).is_some() {
                return Err(DawgError::BranchReentered {
                    word: word.to_string(),
                });
            }

            let next = self.nodes.len();
            self.nodes.push(BuilderNode::default());
            self.nodes[node].children.push((ch, next));
            self.unchecked.push((node, ch, next));
            node = next;
        }

        self.nodes[node].terminal = true;
        self.previous = Some(word.to_string());
        self.word_count += 1;
        Ok(())
    }

    /// Minimizes the remaining branch and compacts the graph.
    pub fn finish(mut self) -> Result<Dawg, DawgError> {
        self.minimize(0);
        let dawg = self.compact()?;

        log::debug!(
            "dawg: {} words, {} nodes ({} terminal), {} edges, {} characters",
            self.word_count,
            dawg.node_count(),
            dawg.terminal_count,
            dawg.edge_count(),
            dawg.characters.len()
        );

        Ok(dawg)
    }

    fn signature(&self, node: usize) -> NodeSignature {
        let node = &self.nodes[node];
        let mut edges = node.children.clone();
        edges.sort_unstable_by_key(|(ch, _)| *ch);
        NodeSignature {
            terminal: node.terminal,
            edges,
        }
    }

    fn minimize(&mut self, down_to: usize) {
        while self.unchecked.len() > down_to {
            let (parent, ch, child) = match self.unchecked.pop() {
                Some(x) => x,
                None => break,
            };

            let signature = self.signature(child);
            match self.minimized.get(&signature) {
                Some(&existing) => {
                    if let Some(edge) = self.nodes[parent]
                        .children
                        .iter_mut()
                        .find(|(c, _)| *c == ch)
                    {
                        edge.1 = existing;
                    }
                }
                None => {
                    self.minimized.insert(signature, child);
                }
            }
        }
    }

    /// Walks the reachable nodes in depth-first preorder and renumbers them,
    /// terminals first.
    fn compact(&self) -> Result<Dawg, DawgError> {
        let mut order = vec![];
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![0usize];

        while let Some(node) = stack.pop() {
            if seen[node] {
                continue;
            }
            seen[node] = true;
            order.push(node);

            for (_, child) in self.sorted_children(node).into_iter().rev() {
                if !seen[child] {
                    stack.push(child);
                }
            }
        }

        let (terminals, inner): (Vec<usize>, Vec<usize>) =
            order.iter().copied().partition(|&node| self.nodes[node].terminal);

        let mut ids = vec![NodeIndex::MAX; self.nodes.len()];
        for (id, &node) in terminals.iter().chain(inner.iter()).enumerate() {
            ids[node] = id as NodeIndex;
        }

        let characters: Vec<char> = order
            .iter()
            .flat_map(|&node| self.nodes[node].children.iter().map(|(ch, _)| *ch))
            .unique()
            .sorted_by_key(|ch| char_key(*ch))
            .collect();

        if characters.len() > CharIndex::MAX as usize + 1 {
            return Err(DawgError::AlphabetTooLarge(characters.len()));
        }

        let char_index: HashMap<char, CharIndex> = characters
            .iter()
            .enumerate()
            .map(|(i, ch)| (*ch, i as CharIndex))
            .collect();

        let mut first_child_index = Vec::with_capacity(order.len());
        let mut edges = vec![];
        let mut edge_character = vec![];

        for &node in terminals.iter().chain(inner.iter()) {
            first_child_index.push(edges.len() as u32);
            for (ch, child) in self.sorted_children(node) {
                edges.push(ids[child]);
                edge_character.push(char_index[&ch]);
            }
        }

        Dawg::from_raw_parts(
            terminals.len() as u32,
            characters,
            ids[0],
            first_child_index,
            edges,
            edge_character,
        )
    }

    fn sorted_children(&self, node: usize) -> Vec<(char, usize)> {
        let mut children = self.nodes[node].children.clone();
        children.sort_unstable_by_key(|(ch, _)| char_key(*ch));
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_suffixes() {
        let mut builder = DawgBuilder::new();
        for word in ["cities", "city", "pities", "pity"].iter() {
            builder.insert(word).unwrap();
        }
        let dawg = builder.finish().unwrap();
        assert_eq!(dawg.node_count(), 7);
        assert_eq!(dawg.edge_count(), 8);
    }

    #[test]
    fn shares_suffixes_with_branching() {
        let words = ["cities", "city", "pities", "pitiful", "pity", "pretty"];
        let mut builder = DawgBuilder::new();
        for word in words.iter() {
            builder.insert(word).unwrap();
        }
        let dawg = builder.finish().unwrap();
        assert_eq!(dawg.node_count(), 17);
        assert_eq!(dawg.edge_count(), 21);
    }

    #[test]
    fn rejects_unsorted() {
        let mut builder = DawgBuilder::new();
        builder.insert("pity").unwrap();
        match builder.insert("city") {
            Err(DawgError::Unsorted { previous, word }) => {
                assert_eq!(previous, "pity");
                assert_eq!(word, "city");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        let mut builder = DawgBuilder::new();
        assert!(matches!(builder.insert(""), Err(DawgError::EmptyWord)));
        builder.insert("a").unwrap();
        assert!(matches!(builder.insert("a"), Err(DawgError::Unsorted { .. })));
        assert!(matches!(builder.insert("A"), Err(DawgError::Unsorted { .. })));
    }

    #[test]
    fn rejects_interleaved_case_variants() {
        let mut builder = DawgBuilder::new();
        builder.insert("ab").unwrap();
        builder.insert("AC").unwrap();
        assert!(matches!(
            builder.insert("ad"),
            Err(DawgError::BranchReentered { .. })
        ));
    }

    #[test]
    fn terminals_take_lowest_ids() {
        let mut builder = DawgBuilder::new();
        for word in ["a", "ab", "b"].iter() {
            builder.insert(word).unwrap();
        }
        let dawg = builder.finish().unwrap();
        // "a", "ab" and "b" end at two distinct nodes ("ab" and "b" share
        // the childless terminal).
        assert_eq!(dawg.terminal_count, 2);
        assert!(!dawg.is_terminal(dawg.root()));
        assert_eq!(dawg.root(), 2);
    }

    #[test]
    fn empty_builder() {
        let dawg = DawgBuilder::new().finish().unwrap();
        assert_eq!(dawg.node_count(), 1);
        assert_eq!(dawg.edge_count(), 0);
        assert!(dawg.all_words().is_empty());
    }
}
