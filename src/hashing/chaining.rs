//! # Separate Chaining Hash Table
//!
//! This module implements a hash table using **separate chaining**: every bucket holds a short
//! vector of entries, and keys that hash to the same bucket simply share it.
//!
//! ## Key Features
//! - **Generic** key-value pairs (`K: HashKey, V`); keys are hashed through their canonical string.
//! - **Pluggable** hash function chosen from the [`HashFunction`] registry.
//! - **Automatic growth**: the bucket array doubles before a new key would push the load factor
//!   above the threshold.
//! - **Collision statistics** describing how evenly the chosen hash function spreads keys.
//!
//! **Note**: not thread-safe. Wrap it in a mutex, or shard across several tables, if you need
//! concurrent access.
//!
//! ## Example
//! ```rust
//! use hashtables::ChainingTable;
//!
//! let mut table = ChainingTable::new(5, "polynomial").unwrap();
//! table.insert("abc".to_string(), 1);
//! table.insert("cba".to_string(), 2);
//! assert_eq!(table.search("abc"), Some(&1));
//! assert!(table.delete("cba"));
//! assert_eq!(table.search("cba"), None);
//! ```

use std::borrow::Borrow;

use log::debug;

use super::functions::{key_eq, HashFunction, HashKey};
use super::resize::{self, ResizePolicy, DEFAULT_SIZE};
use crate::error::{Result, TableError};

/// A single entry in a chain.
#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// A bucket is the chain of entries sharing one index.
type Bucket<K, V> = Vec<Entry<K, V>>;

/// Distribution metrics for a [`ChainingTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainingStats {
    /// Sum over buckets of `len - 1` for every non-empty bucket.
    pub total_collisions: usize,
    /// Length of the longest chain.
    pub max_chain_length: usize,
    /// Number of buckets holding no entry.
    pub empty_buckets: usize,
    pub load_factor: f64,
}

/// Builder for [`ChainingTable`].
#[derive(Debug, Clone)]
pub struct ChainingTableBuilder {
    size: usize,
    hash_function: HashFunction,
    threshold: f64,
}

impl Default for ChainingTableBuilder {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            hash_function: HashFunction::default(),
            threshold: resize::DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }
}

impl ChainingTableBuilder {
    /// Creates a builder with size 10, the polynomial hash and threshold 0.7.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of buckets.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }

    /// Sets the load factor above which the table grows. Must lie in (0, 1).
    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Validates the configuration and allocates the buckets.
    pub fn build<K: HashKey, V>(self) -> Result<ChainingTable<K, V>> {
        if self.size == 0 {
            return Err(TableError::ZeroSize);
        }
        let policy = ResizePolicy::new(self.threshold)?;

        Ok(ChainingTable {
            buckets: empty_buckets(self.size),
            count: 0,
            hash_function: self.hash_function,
            policy,
        })
    }
}

fn empty_buckets<K, V>(size: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(size);
    buckets.resize_with(size, Vec::new);
    buckets
}

/// A separate-chaining hash table.
#[derive(Debug, Clone)]
pub struct ChainingTable<K, V> {
    buckets: Vec<Bucket<K, V>>,
    /// Number of live entries, always the sum of the bucket lengths.
    count: usize,
    hash_function: HashFunction,
    policy: ResizePolicy,
}

impl<K: HashKey, V> Default for ChainingTable<K, V> {
    fn default() -> Self {
        Self {
            buckets: empty_buckets(DEFAULT_SIZE),
            count: 0,
            hash_function: HashFunction::default(),
            policy: ResizePolicy::default(),
        }
    }
}

impl<K: HashKey, V> ChainingTable<K, V> {
    /// Creates a table with `size` buckets and the named hash function (`simple`, `polynomial`
    /// or `djb2`), using the default threshold.
    pub fn new(size: usize, hash_function: &str) -> Result<Self> {
        ChainingTableBuilder::new()
            .with_size(size)
            .with_hash_function(hash_function.parse()?)
            .build()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of buckets.
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        resize::load_factor(self.count, self.size())
    }

    pub fn threshold(&self) -> f64 {
        self.policy.threshold()
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    /// Inserts a key-value pair.
    /// If the key already exists its value is replaced and the old value returned; otherwise the
    /// table may grow first, then the entry is appended to its bucket.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.bucket_index(&key);
        if let Some(entry) = self.buckets[idx].iter_mut().find(|entry| entry.key == key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }

        let idx = if self.policy.needs_growth(self.count, self.size()) {
            self.resize(self.policy.grown_size(self.count, self.size()));
            self.bucket_index(&key)
        } else {
            idx
        };

        self.buckets[idx].push(Entry { key, value });
        self.count += 1;
        None
    }

    /// Returns a reference to the value stored under `key`, or `None` if the key is absent.
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter()
            .find(|entry| key_eq(&entry.key, key))
            .map(|entry| &entry.value)
    }

    pub fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter_mut()
            .find(|entry| key_eq(&entry.key, key))
            .map(|entry| &mut entry.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Removes `key` and returns its value, if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let pos = bucket.iter().position(|entry| key_eq(&entry.key, key))?;
        let entry = bucket.swap_remove(pos);
        self.count -= 1;
        Some(entry.value)
    }

    /// Removes every entry, keeping the current number of buckets.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.count = 0;
    }

    /// Iterates over all `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|entry| (&entry.key, &entry.value)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Chain length of every bucket, in index order.
    pub fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }

    /// Summarises how keys are spread over the buckets.
    pub fn collision_stats(&self) -> ChainingStats {
        let mut total_collisions = 0;
        let mut max_chain_length = 0;
        let mut empty_buckets = 0;

        for len in self.chain_lengths() {
            if len == 0 {
                empty_buckets += 1;
            }
            total_collisions += len.saturating_sub(1);
            max_chain_length = max_chain_length.max(len);
        }

        ChainingStats {
            total_collisions,
            max_chain_length,
            empty_buckets,
            load_factor: self.load_factor(),
        }
    }

    fn bucket_index<Q: HashKey + ?Sized>(&self, key: &Q) -> usize {
        self.hash_function.hash_key(key, self.size())
    }

    /// Replaces the bucket array with `new_size` empty buckets and rehashes every entry into it.
    fn resize(&mut self, new_size: usize) {
        debug!(
            "chaining table growing from {} to {} buckets ({} entries)",
            self.size(),
            new_size,
            self.count
        );
        let old_buckets = std::mem::replace(&mut self.buckets, empty_buckets(new_size));
        for entry in old_buckets.into_iter().flatten() {
            let idx = self.bucket_index(&entry.key);
            self.buckets[idx].push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(size: usize) -> ChainingTable<String, String> {
        ChainingTableBuilder::new().with_size(size).build().unwrap()
    }

    #[test]
    fn basic_insert_search_delete() {
        let mut ht = table(10);
        assert!(ht.is_empty());

        assert_eq!(ht.insert("key1".into(), "value1".into()), None);
        assert_eq!(ht.insert("key2".into(), "value2".into()), None);
        assert_eq!(ht.len(), 2);

        assert_eq!(ht.search("key1").map(String::as_str), Some("value1"));
        assert_eq!(ht.search("key2").map(String::as_str), Some("value2"));
        assert_eq!(ht.search("key3"), None);

        assert!(ht.delete("key1"));
        assert_eq!(ht.search("key1"), None);
        assert!(!ht.delete("key1"));
        assert_eq!(ht.len(), 1);
    }

    #[test]
    fn insert_existing_key_updates_in_place() {
        let mut ht = table(10);
        ht.insert("key1".into(), "value1".into());
        let old = ht.insert("key1".into(), "new_value".into());

        assert_eq!(old.as_deref(), Some("value1"));
        assert_eq!(ht.search("key1").map(String::as_str), Some("new_value"));
        assert_eq!(ht.len(), 1);
    }

    #[test]
    fn stored_none_is_distinct_from_missing_key() {
        let mut ht: ChainingTable<&str, Option<i32>> = ChainingTableBuilder::new().build().unwrap();
        ht.insert("present", None);

        assert_eq!(ht.search("present"), Some(&None));
        assert_eq!(ht.search("absent"), None);
    }

    #[test]
    fn order_sensitive_keys_and_forced_collisions() {
        let mut ht = ChainingTable::new(5, "polynomial").unwrap();
        ht.insert("abc", 1);
        ht.insert("cba", 2);
        assert_eq!(ht.search("abc"), Some(&1));
        assert_eq!(ht.search("cba"), Some(&2));

        // a single bucket is forced to hold everything; at size 1 the table grows as soon as
        // a key arrives, so this state can only be set up directly
        let mut ht = ChainingTableBuilder::new()
            .with_size(1)
            .with_load_factor_threshold(0.99)
            .build::<&str, i32>()
            .unwrap();
        ht.buckets[0].push(Entry { key: "a", value: 1 });
        ht.buckets[0].push(Entry { key: "b", value: 2 });
        ht.buckets[0].push(Entry { key: "c", value: 3 });
        ht.count = 3;

        let stats = ht.collision_stats();
        assert_eq!(stats.total_collisions, 2);
        assert_eq!(stats.max_chain_length, 3);
        assert_eq!(stats.empty_buckets, 0);
        assert_eq!(stats.load_factor, 3.0);
        assert_eq!(ht.search("b"), Some(&2));
    }

    #[test]
    fn collision_stats_with_simple_hash_anagrams() {
        let mut ht = ChainingTable::new(100, "simple").unwrap();
        for key in ["abc", "acb", "bac", "bca"] {
            ht.insert(key, ());
        }
        let stats = ht.collision_stats();
        assert_eq!(stats.total_collisions, 3);
        assert_eq!(stats.max_chain_length, 4);
        assert_eq!(stats.empty_buckets, 99);
        assert_eq!(stats.load_factor, 0.04);
    }

    #[test]
    fn grows_only_when_a_new_key_would_exceed_threshold() {
        let mut ht = table(10);
        for i in 0..7 {
            ht.insert(format!("key{i}"), format!("value{i}"));
        }
        assert_eq!(ht.size(), 10);

        // updating at the threshold does not grow
        ht.insert("key0".into(), "again".into());
        assert_eq!(ht.size(), 10);

        ht.insert("key7".into(), "value7".into());
        assert_eq!(ht.size(), 20);
        for i in 1..8 {
            assert_eq!(ht.search(format!("key{i}").as_str()), Some(&format!("value{i}")));
        }
        assert_eq!(ht.search("key0").map(String::as_str), Some("again"));
    }

    #[test]
    fn count_matches_chain_lengths() {
        let mut ht = ChainingTable::new(3, "djb2").unwrap();
        for i in 0..50u32 {
            ht.insert(i, i * 2);
        }
        for i in (0..50u32).step_by(3) {
            assert!(ht.delete(&i));
        }
        assert_eq!(ht.len(), ht.chain_lengths().sum::<usize>());
        assert!(ht.load_factor() <= ht.threshold());
    }

    #[test]
    fn clear_keeps_size() {
        let mut ht = table(4);
        for i in 0..20 {
            ht.insert(format!("k{i}"), String::new());
        }
        let size = ht.size();
        ht.clear();
        assert!(ht.is_empty());
        assert_eq!(ht.size(), size);
        assert_eq!(ht.iter().count(), 0);
    }

    #[test]
    fn contains_key_hit_and_miss() {
        let mut ht = table(10);
        ht.insert("key1".into(), "value1".into());
        assert!(ht.contains_key("key1"));
        assert!(!ht.contains_key("key2"));

        ht.delete("key1");
        assert!(!ht.contains_key("key1"));
    }

    #[test]
    fn remove_returns_value_once() {
        let mut ht = table(10);
        ht.insert("key1".into(), "value1".into());

        assert_eq!(ht.remove("key1").as_deref(), Some("value1"));
        assert_eq!(ht.remove("key1"), None);
        assert!(ht.is_empty());
    }

    #[test]
    fn search_mut_writes_through() {
        let mut ht = table(10);
        ht.insert("key1".into(), "value1".into());

        if let Some(v) = ht.search_mut("key1") {
            v.push_str("_edited");
        }
        assert_eq!(ht.search("key1").map(String::as_str), Some("value1_edited"));
        assert_eq!(ht.search_mut("missing"), None);
    }

    #[test]
    fn rejects_bad_configuration() {
        assert_eq!(
            ChainingTable::<String, i32>::new(10, "crc32").unwrap_err(),
            TableError::UnknownHashFunction("crc32".into())
        );
        assert_eq!(
            ChainingTableBuilder::new()
                .with_size(0)
                .build::<String, i32>()
                .unwrap_err(),
            TableError::ZeroSize
        );
        assert!(ChainingTableBuilder::new()
            .with_load_factor_threshold(1.0)
            .build::<String, i32>()
            .is_err());
    }
}
