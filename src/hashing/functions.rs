//! # String Hash Functions
//!
//! This module provides the family of deterministic **key → bucket index** functions shared by
//! both table variants. Every function maps the canonical string form of a key to an index in
//! `[0, table_size)`.
//!
//! ## Registered Functions
//! - **simple**: sum of the key's character codes. Cheap, but anagrams always collide, so the
//!   distribution is poor.
//! - **polynomial**: rolling polynomial hash with base 31. Order sensitive, good distribution.
//! - **djb2**: Bernstein's shift-and-add accumulator seeded with 5381. Best distribution of the three.
//!
//! The registry is the [`HashFunction`] enum; names are validated once when a table is configured.
//!
//! **Note**: none of these is cryptographically secure or resistant to adversarial keys.

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TableError};

/// Multiplier used by the polynomial hash.
const POLYNOMIAL_BASE: u128 = 31;
/// Initial accumulator of djb2.
const DJB2_SEED: u128 = 5381;

/// Keys that can be reduced to a canonical string before hashing.
///
/// Two keys that compare equal must produce the same canonical string, and borrowed forms
/// (`str` for `String`) must agree with their owners.
pub trait HashKey: Eq {
    fn canonical(&self) -> Cow<'_, str>;
}

impl HashKey for str {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl HashKey for String {
    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: HashKey + ?Sized> HashKey for &T {
    fn canonical(&self) -> Cow<'_, str> {
        (**self).canonical()
    }
}

macro_rules! display_hash_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl HashKey for $t {
                fn canonical(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

display_hash_key!(char, bool, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// The registered hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashFunction {
    /// Sum of character codes.
    Simple,
    /// Rolling polynomial hash, base 31.
    #[default]
    Polynomial,
    /// djb2 (`h * 33 + c`, seeded with 5381).
    Djb2,
}

impl HashFunction {
    /// Every registered function, in registry order.
    pub const ALL: [HashFunction; 3] = [
        HashFunction::Simple,
        HashFunction::Polynomial,
        HashFunction::Djb2,
    ];

    /// The configuration name of this function.
    pub fn name(self) -> &'static str {
        match self {
            HashFunction::Simple => "simple",
            HashFunction::Polynomial => "polynomial",
            HashFunction::Djb2 => "djb2",
        }
    }

    /// The plain function implementing this variant.
    pub fn function(self) -> fn(&str, usize) -> usize {
        match self {
            HashFunction::Simple => simple_hash,
            HashFunction::Polynomial => polynomial_hash,
            HashFunction::Djb2 => djb2_hash,
        }
    }

    /// Hashes `key` into `[0, table_size)`.
    pub fn hash(self, key: &str, table_size: usize) -> usize {
        (self.function())(key, table_size)
    }

    /// Hashes any [`HashKey`] through its canonical string.
    pub fn hash_key<Q: HashKey + ?Sized>(self, key: &Q, table_size: usize) -> usize {
        self.hash(&key.canonical(), table_size)
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = TableError;

    fn from_str(name: &str) -> Result<Self> {
        HashFunction::ALL
            .into_iter()
            .find(|function| function.name() == name)
            .ok_or_else(|| TableError::unknown_hash_function(name))
    }
}

/// Compares a stored key with a borrowed lookup key.
pub(crate) fn key_eq<K, Q>(stored: &K, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    let stored: &Q = stored.borrow();
    stored == key
}

fn modulus(table_size: usize) -> u128 {
    assert!(table_size > 0, "table size must be positive");
    table_size as u128
}

/// Sum of the key's character codes, modulo `table_size`.
///
/// # Panics
/// If `table_size` is zero.
pub fn simple_hash(key: &str, table_size: usize) -> usize {
    let m = modulus(table_size);
    key.chars().fold(0u128, |h, c| (h + c as u128) % m) as usize
}

/// Polynomial rolling hash with base 31, reduced modulo `table_size` at every step.
///
/// # Panics
/// If `table_size` is zero.
pub fn polynomial_hash(key: &str, table_size: usize) -> usize {
    let m = modulus(table_size);
    key.chars()
        .fold(0u128, |h, c| (h * POLYNOMIAL_BASE + c as u128) % m) as usize
}

/// djb2: `h = h * 33 + c` starting from 5381, modulo `table_size`.
///
/// Reducing at each step gives the same result as reducing the unbounded accumulator once.
///
/// # Panics
/// If `table_size` is zero.
pub fn djb2_hash(key: &str, table_size: usize) -> usize {
    let m = modulus(table_size);
    key.chars()
        .fold(DJB2_SEED % m, |h, c| (((h << 5) + h) + c as u128) % m) as usize
}
