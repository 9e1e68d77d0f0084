//! # Generic In-Memory Store
//!
//! Thread-safe, cloneable key-value map used by both registries. Keys are
//! unique and iteration order is unspecified.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous. The lock is `parking_lot`, which is
/// non-poisonable: a panicking writer does not permanently wedge the store.
/// Clones share the same underlying map.
#[derive(Debug)]
pub struct Store<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Retrieve a record by key.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.data.read().get(key).cloned()
    }

    /// Check if a record exists.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.data.read().contains_key(key)
    }

    /// Insert `value` only if `key` is vacant.
    ///
    /// The vacancy check and the insert run under one write lock. Returns
    /// `false`, leaving the existing record untouched, if the key was taken.
    pub fn insert_new(&self, key: K, value: V) -> bool {
        let mut guard = self.data.write();
        if guard.contains_key(&key) {
            return false;
        }
        guard.insert(key, value);
        true
    }

    /// Insert or overwrite, returning the previous value if the key existed.
    pub fn upsert(&self, key: K, value: V) -> Option<V> {
        self.data.write().insert(key, value)
    }

    /// Mutate a record in place under the write lock.
    ///
    /// Returns `None` if the record doesn't exist, otherwise the closure's
    /// result.
    pub fn update<Q, R>(&self, key: &Q, f: impl FnOnce(&mut V) -> R) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.data.write().get_mut(key).map(f)
    }

    /// Snapshot every record matching `pred`.
    pub fn filter(&self, pred: impl Fn(&K, &V) -> bool) -> Vec<(K, V)> {
        self.data
            .read()
            .iter()
            .filter(|(k, v)| pred(k, v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot every record.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.filter(|_, _| true)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for Store<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_new_refuses_duplicates() {
        let store: Store<String, u32> = Store::new();
        assert!(store.insert_new("a".to_string(), 1));
        assert!(!store.insert_new("a".to_string(), 2));
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_overwrites() {
        let store: Store<String, u32> = Store::new();
        assert_eq!(store.upsert("a".to_string(), 1), None);
        assert_eq!(store.upsert("a".to_string(), 2), Some(1));
        assert_eq!(store.get("a"), Some(2));
    }

    #[test]
    fn test_update_missing_is_none() {
        let store: Store<String, u32> = Store::new();
        assert_eq!(store.update("missing", |v| *v += 1), None);
        store.upsert("a".to_string(), 1);
        assert_eq!(store.update("a", |v| { *v += 1; *v }), Some(2));
    }

    #[test]
    fn test_clones_share_state() {
        let a: Store<String, u32> = Store::new();
        let b = a.clone();
        a.upsert("k".to_string(), 7);
        assert!(b.contains("k"));
        assert!(!b.is_empty());
    }

    #[test]
    fn test_filter() {
        let store: Store<String, u32> = Store::new();
        for (k, v) in [("a", 1), ("b", 2), ("c", 3)] {
            store.upsert(k.to_string(), v);
        }
        let mut odd = store.filter(|_, v| v % 2 == 1);
        odd.sort();
        assert_eq!(odd, vec![("a".to_string(), 1), ("c".to_string(), 3)]);
        assert_eq!(store.entries().len(), 3);
    }
}
