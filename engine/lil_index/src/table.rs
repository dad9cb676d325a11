//! Typed wrappers over [`RawTable`] for self-contained keys.

use crate::RawTable;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Hash a key with `FxHasher`.
pub fn hash_key<K: Hash>(key: &K) -> u64 {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Content hash of a byte slice with `FxHasher`.
///
/// Entity stores use this directly so that a span resolved from a string
/// pool and an owned lookup string hash identically.
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.finish()
}

/// Associative container keyed by owned values.
///
/// Invariant: no duplicate keys; `len` counts live entries exactly across
/// any sequence of inserts and removals.
pub struct HashTable<K, V> {
    raw: RawTable<(K, V)>,
}

impl<K: Hash + Eq, V> HashTable<K, V> {
    /// Create an empty table.
    pub fn new() -> Self {
        HashTable {
            raw: RawTable::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// True if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Insert `value` under `key`, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = hash_key(&key);
        let old = self.raw.remove(hash, |(k, _)| *k == key).map(|(_, v)| v);
        self.raw.insert(hash, (key, value));
        old
    }

    /// Value bound to `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw
            .find(hash_key(key), |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Mutable value bound to `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw
            .find_mut(hash_key(key), |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw
            .remove(hash_key(key), |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterate over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.raw.iter().map(|(k, v)| (k, v))
    }
}

impl<K: Hash + Eq, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Set of owned keys over the same open-addressing scheme.
pub struct HashSet<K> {
    table: HashTable<K, ()>,
}

impl<K: Hash + Eq> HashSet<K> {
    /// Create an empty set.
    pub fn new() -> Self {
        HashSet {
            table: HashTable::new(),
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Insert `key`; returns `false` if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.table.insert(key, ()).is_none()
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Remove `key`; returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.table.remove(key).is_some()
    }
}

impl<K: Hash + Eq> Default for HashSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_keys_match_on_content() {
        let mut table: HashTable<String, u32> = HashTable::new();
        table.insert("alpha".to_owned(), 1);
        table.insert("beta".to_owned(), 2);
        assert_eq!(table.get(&"alpha".to_owned()), Some(&1));
        assert_eq!(table.get(&"alph".to_owned()), None);
        assert_eq!(table.get(&"alphaa".to_owned()), None);
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut table: HashTable<u32, &str> = HashTable::new();
        assert_eq!(table.insert(7, "old"), None);
        assert_eq!(table.insert(7, "new"), Some("old"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&7), Some(&"new"));
    }

    #[test]
    fn removed_key_can_be_reinserted() {
        let mut set: HashSet<String> = HashSet::new();
        assert!(set.insert("node_1".to_owned()));
        assert!(set.remove(&"node_1".to_owned()));
        assert!(!set.contains(&"node_1".to_owned()));
        assert!(set.insert("node_1".to_owned()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn many_keys_roundtrip() {
        let mut set: HashSet<String> = HashSet::new();
        for i in 0..1000 {
            for j in 0..10 {
                set.insert(format!("key_{i}_{j}"));
            }
        }
        assert_eq!(set.len(), 10_000);
        for i in 0..1000 {
            for j in 0..10 {
                assert!(set.contains(&format!("key_{i}_{j}")));
            }
        }
        for i in 0..1000 {
            for j in 0..10 {
                assert!(set.remove(&format!("key_{i}_{j}")));
            }
        }
        assert_eq!(set.len(), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet as StdSet;

        proptest! {
            /// `contains` and `len` agree with a std model across arbitrary
            /// insert/remove sequences.
            #[test]
            fn set_matches_std_model(ops in proptest::collection::vec((any::<bool>(), 0u16..64), 0..256)) {
                let mut set: HashSet<u16> = HashSet::new();
                let mut model: StdSet<u16> = StdSet::new();
                for (is_insert, key) in ops {
                    if is_insert {
                        prop_assert_eq!(set.insert(key), model.insert(key));
                    } else {
                        prop_assert_eq!(set.remove(&key), model.remove(&key));
                    }
                    prop_assert_eq!(set.len(), model.len());
                    prop_assert_eq!(set.contains(&key), model.contains(&key));
                }
                for key in 0u16..64 {
                    prop_assert_eq!(set.contains(&key), model.contains(&key));
                }
            }
        }
    }
}
