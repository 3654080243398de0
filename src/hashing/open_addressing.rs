//! # Open Addressing Hash Table
//!
//! This module provides a hash table using *open addressing*: every entry lives in one flat slot
//! array and is found again by walking a deterministic probe sequence from its home slot.
//!
//! ## Key Features
//! - **Generic** key-value pairs (`K: HashKey, V`).
//! - **Configurable probing**: linear (`h + a`) or double hashing (`h1 + a * h2`) via [`ProbingMethod`].
//! - **Full coverage**: the double-hashing step is forced coprime with the table size, so every
//!   probe sequence visits every slot exactly once.
//! - **Tombstones**: deletion leaves a marker so keys further along the same probe sequence stay
//!   reachable. Tombstones are reused by later inserts and dropped on resize.
//!   They are never cleared at the same size, so heavy insert/delete churn without growth can
//!   leave no `Empty` slot at all; a lookup miss then scans all `size` slots (O(size)).
//! - **Automatic growth**: the slot array doubles before a new key would push the load factor
//!   above the threshold.
//!
//! **Note**: not thread-safe. Wrap it in a mutex, or shard across several tables, if you need
//! concurrent access.
//!
//! ## Example
//! ```rust
//! use hashtables::OpenAddressingTable;
//!
//! let mut table = OpenAddressingTable::new(10, "djb2", "double").unwrap();
//! table.insert("key1", "value1");
//! table.insert("key2", "value2");
//! assert!(table.delete("key1"));
//! assert_eq!(table.search("key2"), Some(&"value2"));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};
use num_integer::Integer;

use super::functions::{key_eq, HashFunction, HashKey};
use super::resize::{self, ResizePolicy, DEFAULT_SIZE};
use crate::error::{Result, TableError};

/// A slot is `Empty`, `Tombstone` (held an entry that was deleted) or `Occupied(key, value)`.
#[derive(Debug, Clone, Default)]
enum Slot<K, V> {
    #[default]
    Empty,
    Tombstone,
    Occupied(K, V),
}

/// The strategy used to step from one candidate slot to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProbingMethod {
    /// Linear probing: slot = (h + a) mod size
    #[default]
    Linear,
    /// Double hashing: slot = (h1 + a * h2) mod size, with h2 derived from a second hash
    /// taken modulo `size - 1`.
    Double,
}

impl ProbingMethod {
    pub const ALL: [ProbingMethod; 2] = [ProbingMethod::Linear, ProbingMethod::Double];

    pub fn name(self) -> &'static str {
        match self {
            ProbingMethod::Linear => "linear",
            ProbingMethod::Double => "double",
        }
    }
}

impl fmt::Display for ProbingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbingMethod {
    type Err = TableError;

    fn from_str(name: &str) -> Result<Self> {
        ProbingMethod::ALL
            .into_iter()
            .find(|method| method.name() == name)
            .ok_or_else(|| TableError::unknown_probing_method(name))
    }
}

/// The candidate slots for one key, in probing order.
///
/// Yields exactly `size` indices. Because `step` is coprime with `size`, they are a permutation
/// of `0..size`.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    next: usize,
    step: usize,
    size: usize,
    remaining: usize,
}

impl ProbeSequence {
    fn new(start: usize, step: usize, size: usize) -> Self {
        Self {
            next: start,
            step,
            size,
            remaining: size,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let idx = self.next;
        self.next = (self.next + self.step) % self.size;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

/// Outcome of walking a probe sequence for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key lives in this slot.
    Found(usize),
    /// The key is absent; this is the first reusable slot on its path.
    Vacant(usize),
    /// The key is absent and the path has no reusable slot.
    Full,
}

/// Probe metrics for an [`OpenAddressingTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbingStats {
    /// Mean number of slots examined to find each stored key.
    pub average_probes: f64,
    /// Worst number of slots examined to find a stored key.
    pub max_probes: usize,
    pub load_factor: f64,
    pub occupied_cells: usize,
    /// Deletion markers currently in the slot array.
    pub tombstones: usize,
}

/// Builder for [`OpenAddressingTable`].
#[derive(Debug, Clone)]
pub struct OpenAddressingTableBuilder {
    size: usize,
    hash_function: HashFunction,
    probing_method: ProbingMethod,
    threshold: f64,
}

impl Default for OpenAddressingTableBuilder {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            hash_function: HashFunction::default(),
            probing_method: ProbingMethod::default(),
            threshold: resize::DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }
}

impl OpenAddressingTableBuilder {
    /// Creates a builder with size 10, the polynomial hash, linear probing and threshold 0.7.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of slots.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }

    /// Sets the collision resolution strategy (linear probing or double hashing).
    pub fn with_probing_method(mut self, probing_method: ProbingMethod) -> Self {
        self.probing_method = probing_method;
        self
    }

    /// Sets the load factor above which the table grows. Must lie in (0, 1).
    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Validates the configuration and allocates the slots.
    pub fn build<K: HashKey, V>(self) -> Result<OpenAddressingTable<K, V>> {
        if self.size == 0 {
            return Err(TableError::ZeroSize);
        }
        let policy = ResizePolicy::new(self.threshold)?;

        Ok(OpenAddressingTable {
            slots: empty_slots(self.size),
            count: 0,
            tombstones: 0,
            hash_function: self.hash_function,
            probing_method: self.probing_method,
            policy,
        })
    }
}

fn empty_slots<K, V>(size: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(size);
    slots.resize_with(size, || Slot::Empty);
    slots
}

/// The open addressing hash table.
#[derive(Debug, Clone)]
pub struct OpenAddressingTable<K, V> {
    slots: Vec<Slot<K, V>>,
    /// Number of `Occupied` slots.
    count: usize,
    tombstones: usize,

    hash_function: HashFunction,
    probing_method: ProbingMethod,
    policy: ResizePolicy,
}

impl<K: HashKey, V> Default for OpenAddressingTable<K, V> {
    fn default() -> Self {
        Self {
            slots: empty_slots(DEFAULT_SIZE),
            count: 0,
            tombstones: 0,
            hash_function: HashFunction::default(),
            probing_method: ProbingMethod::default(),
            policy: ResizePolicy::default(),
        }
    }
}

impl<K: HashKey, V> OpenAddressingTable<K, V> {
    /// Creates a table from configuration names: `hash_function` is one of `simple`,
    /// `polynomial`, `djb2`, and `probing_method` one of `linear`, `double`.
    pub fn new(size: usize, hash_function: &str, probing_method: &str) -> Result<Self> {
        OpenAddressingTableBuilder::new()
            .with_size(size)
            .with_hash_function(hash_function.parse()?)
            .with_probing_method(probing_method.parse()?)
            .build()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
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

    pub fn probing_method(&self) -> ProbingMethod {
        self.probing_method
    }

    /// Number of deletion markers waiting to be reused or dropped by the next resize.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Insert a key-value pair. Returns the old value if the key existed.
    ///
    /// A new key goes into the first empty or tombstone slot on its probe sequence, after the
    /// table has grown if admitting it would exceed the threshold.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let probe = match self.locate(&key) {
            Probe::Found(idx) => {
                if let Slot::Occupied(_, v) = &mut self.slots[idx] {
                    return Some(std::mem::replace(v, value));
                }
                unreachable!("located slot {idx} is not occupied");
            }
            probe => probe,
        };

        let probe = if self.policy.needs_growth(self.count, self.size()) {
            self.rehash(self.policy.grown_size(self.count, self.size()));
            self.locate(&key)
        } else {
            probe
        };

        let idx = match probe {
            Probe::Vacant(idx) => idx,
            Probe::Found(_) | Probe::Full => self.force_vacancy(&key),
        };

        if let Slot::Tombstone = self.slots[idx] {
            self.tombstones -= 1;
        }
        self.slots[idx] = Slot::Occupied(key, value);
        self.count += 1;
        None
    }

    /// Retrieve a reference to the value for `key`, or `None` if it is absent.
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        match self.locate(key) {
            Probe::Found(idx) => match &self.slots[idx] {
                Slot::Occupied(_, v) => Some(v),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        match self.locate(key) {
            Probe::Found(idx) => match &mut self.slots[idx] {
                Slot::Occupied(_, v) => Some(v),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        matches!(self.locate(key), Probe::Found(_))
    }

    /// Removes `key`, leaving a tombstone in its slot. Returns `false` if it was not present.
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
        let Probe::Found(idx) = self.locate(key) else {
            return None;
        };
        match std::mem::replace(&mut self.slots[idx], Slot::Tombstone) {
            Slot::Occupied(_, v) => {
                self.count -= 1;
                self.tombstones += 1;
                Some(v)
            }
            other => {
                self.slots[idx] = other;
                None
            }
        }
    }

    /// Clears every slot back to `Empty`, keeping the current size.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.count = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over all (key, value) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// The slot indices examined for `key`, in order.
    pub fn probe_sequence<Q: HashKey + ?Sized>(&self, key: &Q) -> ProbeSequence {
        let size = self.size();
        let canonical = key.canonical();
        let start = self.hash_function.hash(&canonical, size);
        let step = match self.probing_method {
            ProbingMethod::Linear => 1,
            ProbingMethod::Double => {
                let h2 = if size > 1 {
                    1 + self.hash_function.hash(&canonical, size - 1)
                } else {
                    1
                };
                coprime_step(h2, size)
            }
        };
        ProbeSequence::new(start, step, size)
    }

    /// Number of slots a search for `key` examines before it stops.
    pub fn probe_count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        let mut probes = 0;
        for idx in self.probe_sequence(key) {
            probes += 1;
            match &self.slots[idx] {
                Slot::Empty => break,
                Slot::Occupied(k, _) if key_eq(k, key) => break,
                _ => {}
            }
        }
        probes
    }

    /// Summarises probe lengths over all stored keys.
    pub fn collision_stats(&self) -> ProbingStats {
        let mut total_probes = 0;
        let mut max_probes = 0;
        let mut occupied_cells = 0;

        for key in self.keys() {
            let probes = self.probe_count(key);
            occupied_cells += 1;
            total_probes += probes;
            max_probes = max_probes.max(probes);
        }

        let average_probes = if occupied_cells > 0 {
            total_probes as f64 / occupied_cells as f64
        } else {
            0.0
        };

        ProbingStats {
            average_probes,
            max_probes,
            load_factor: self.load_factor(),
            occupied_cells,
            tombstones: self.tombstones,
        }
    }

    /// Walks the probe sequence for `key`.
    ///
    /// An `Empty` slot ends the walk. Tombstones are skipped, but the first one is remembered as
    /// the insertion point so that a key is never stored twice.
    fn locate<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: HashKey + ?Sized,
    {
        let mut first_tombstone = None;
        for idx in self.probe_sequence(key) {
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(idx)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(idx);
                }
                Slot::Occupied(k, _) => {
                    if key_eq(k, key) {
                        return Probe::Found(idx);
                    }
                }
            }
        }
        first_tombstone.map_or(Probe::Full, Probe::Vacant)
    }

    /// Grows once after a probe scan came up without a vacancy, then scans again.
    ///
    /// # Panics
    /// If the grown table still offers no vacancy, which would mean the probe sequence does not
    /// cover the slot array.
    fn force_vacancy(&mut self, key: &K) -> usize {
        warn!(
            "no vacancy for key on its probe sequence (size {}, {} entries, {} tombstones)",
            self.size(),
            self.count,
            self.tombstones
        );
        self.rehash(self.size().saturating_mul(2));
        trace!("retrying insert after forced growth to {}", self.size());
        match self.locate(key) {
            Probe::Vacant(idx) => idx,
            probe => panic!(
                "open addressing invariant violated: {probe:?} after growing to {} slots",
                self.size()
            ),
        }
    }

    /// Rebuild the table with `new_size` slots, re-inserting all occupied slots and dropping
    /// tombstones. Migration never re-checks the threshold.
    fn rehash(&mut self, new_size: usize) {
        debug!(
            "open addressing table growing from {} to {} slots ({} entries, {} tombstones dropped)",
            self.size(),
            new_size,
            self.count,
            self.tombstones
        );
        let old_slots = std::mem::replace(&mut self.slots, empty_slots(new_size));
        self.tombstones = 0;

        for slot in old_slots {
            if let Slot::Occupied(k, v) = slot {
                let idx = self.first_empty(&k);
                self.slots[idx] = Slot::Occupied(k, v);
            }
        }
    }

    /// First `Empty` slot on the probe sequence of a key known to be absent.
    fn first_empty(&self, key: &K) -> usize {
        match self
            .probe_sequence(key)
            .find(|&idx| matches!(self.slots[idx], Slot::Empty))
        {
            Some(idx) => idx,
            None => unreachable!("rehash target has fewer slots than entries"),
        }
    }
}

/// Smallest step `>= h2` that is coprime with `size`, so the probe sequence visits every slot.
fn coprime_step(h2: usize, size: usize) -> usize {
    let mut step = h2.max(1);
    while step.gcd(&size) != 1 {
        step += 1;
    }
    step
}
