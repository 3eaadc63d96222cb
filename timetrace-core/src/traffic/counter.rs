//! Insertion-ordered occurrence counter.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts occurrences while remembering the order keys were first seen.
///
/// Iteration follows first-insertion order, which is also the tie-break
/// order for `top_n`.
#[derive(Debug, Clone)]
pub struct Counter<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K> Default for Counter<K> {
    fn default() -> Self {
        Counter {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Counter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn get(&self, key: &K) -> usize {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// The `n` highest counts, ties in first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<(&K, usize)> {
        rank(self.iter().collect(), n)
    }
}

impl<K: PartialEq> PartialEq for Counter<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq> Eq for Counter<K> {}

/// Sort by descending count, keeping the incoming order among equal counts,
/// then keep the first `n`.
pub fn rank<T>(mut items: Vec<(T, usize)>, n: usize) -> Vec<(T, usize)> {
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items.truncate(n);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(keys: &[&str]) -> Counter<String> {
        let mut counter = Counter::new();
        for key in keys {
            counter.add(key.to_string());
        }
        counter
    }

    #[test]
    fn counts_and_remembers_first_seen_order() {
        let c = counter(&["b", "a", "b", "c", "a", "b"]);
        let seen: Vec<(&str, usize)> = c.iter().map(|(k, n)| (k.as_str(), n)).collect();
        assert_eq!(seen, vec![("b", 3), ("a", 2), ("c", 1)]);
        assert_eq!(c.total(), 6);
        assert_eq!(c.len(), 3);
        assert_eq!(c.get(&"zzz".to_string()), 0);
    }

    #[test]
    fn ties_break_by_first_insertion() {
        let c = counter(&["x", "y", "z", "z", "y", "x", "w"]);
        let top: Vec<&str> = c.top_n(3).into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(top, vec!["x", "y", "z"]);
    }

    #[test]
    fn top_n_larger_than_counter_returns_everything() {
        let c = counter(&["a", "b"]);
        assert_eq!(c.top_n(10).len(), 2);
        assert!(c.top_n(0).is_empty());
    }

    #[test]
    fn ranking_is_idempotent() {
        let c = counter(&["p", "q", "q", "r", "r", "s", "p", "t"]);
        let once = rank(c.iter().collect(), 4);
        let twice = rank(once.clone(), 4);
        assert_eq!(once, twice);
    }

    #[test]
    fn equality_ignores_lookup_table() {
        assert_eq!(counter(&["a", "b", "a"]), counter(&["a", "b", "a"]));
        assert_ne!(counter(&["a", "b"]), counter(&["b", "a"]));
    }
}
