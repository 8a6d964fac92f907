use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::types::WordId;

/// Dense word ids in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub(crate) key_table: Vec<SmolStr>,
    pub(crate) string_to_id: HashMap<SmolStr, WordId>,
}

impl Vocabulary {
    pub fn new() -> Vocabulary {
        Vocabulary::default()
    }

    /// Returns the id of `word`, assigning the next one if it is new.
    pub fn add(&mut self, word: &str) -> WordId {
        if let Some(&id) = self.string_to_id.get(word) {
            return id;
        }

        let id = self.key_table.len() as WordId;
        let word = SmolStr::new(word);
        self.key_table.push(word.clone());
        self.string_to_id.insert(word, id);
        id
    }

    #[inline(always)]
    pub fn id(&self, word: &str) -> Option<WordId> {
        self.string_to_id.get(word).copied()
    }

    #[inline(always)]
    pub fn word(&self, id: WordId) -> Option<&SmolStr> {
        self.key_table.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.key_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_table.is_empty()
    }

    /// Words in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.key_table.iter()
    }
}
