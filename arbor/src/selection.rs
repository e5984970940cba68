//! Active (selected) node tracking.

use std::collections::HashSet;
use std::hash::Hash;

/// Tracks selected items by their keys.
///
/// Single-select versus additive selection is decided per call rather than
/// by a stored mode, since the same tree handles both plain and ctrl-clicks.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    /// Select a key. Without `multi` every other key is deselected first.
    ///
    /// Returns (whether `key` was newly added, keys that were removed).
    pub fn select(&mut self, key: K, multi: bool) -> (bool, Vec<K>) {
        let removed = if multi {
            Vec::new()
        } else {
            let others: Vec<K> = self
                .selected
                .iter()
                .filter(|k| **k != key)
                .cloned()
                .collect();
            for k in &others {
                self.selected.remove(k);
            }
            others
        };
        let added = self.selected.insert(key);
        (added, removed)
    }

    /// Deselect a key. Returns true if it was selected.
    pub fn deselect(&mut self, key: &K) -> bool {
        self.selected.remove(key)
    }

    /// Toggle selection for a key.
    /// Returns (added keys, removed keys).
    pub fn toggle(&mut self, key: K, multi: bool) -> (Vec<K>, Vec<K>) {
        if self.selected.contains(&key) {
            self.selected.remove(&key);
            (Vec::new(), vec![key])
        } else {
            let (_, removed) = self.select(key.clone(), multi);
            (vec![key], removed)
        }
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Clear all selections, returning what was selected.
    pub fn clear(&mut self) -> Vec<K> {
        self.selected.drain().collect()
    }

    /// Get all selected keys.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
