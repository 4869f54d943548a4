//! Insertion-order vocabularies mapping keys to dense integer ids.
//!
//! Syndromes, words, and ordered word pairs all get ids in first-seen order.
//! A forward hash map gives O(1) key -> id lookup and a reverse vector gives
//! O(1) id -> key lookup. Ids are dense, starting at 0, and stable for the
//! lifetime of the vocabulary.

use std::borrow::Borrow;
use std::hash::Hash;

use ahash::AHashMap;

/// An interner that assigns sequential ids to keys on first insert.
///
/// Generic over the key type so the same machinery serves plain words
/// (`String`) and ordered adjacent word pairs (`(String, String)`).
#[derive(Debug, Clone)]
pub struct Vocabulary<K> {
    ids: AHashMap<K, u32>,
    keys: Vec<K>,
}

impl<K: Eq + Hash + Clone> Vocabulary<K> {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Vocabulary {
            ids: AHashMap::new(),
            keys: Vec::new(),
        }
    }

    /// Return the id for `key`, assigning the next id if it is unseen.
    pub fn intern(&mut self, key: &K) -> u32 {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.keys.len() as u32;
            self.keys.push(key.clone());
            self.ids.insert(key.clone(), id);
            id
        }
    }

    /// Look up the id of `key`, if it has been interned.
    pub fn id<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ids.get(key).copied()
    }

    /// Look up the key for `id`.
    pub fn key(&self, id: u32) -> Option<&K> {
        self.keys.get(id as usize)
    }

    /// All keys in id order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of interned keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for Vocabulary<K> {
    fn default() -> Self {
        Self::new()
    }
}
