//! Growth rule shared by the chaining and open addressing tables.
//!
//! A table grows before it admits a new key whose arrival would push the load factor above
//! the threshold. Growth doubles the backing storage; updating a key that is already present
//! never grows.

use crate::error::{Result, TableError};

/// Default number of buckets or slots.
pub const DEFAULT_SIZE: usize = 10;
/// Default load factor threshold.
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.7;

/// Live entries divided by backing-storage size.
pub fn load_factor(count: usize, size: usize) -> f64 {
    count as f64 / size as f64
}

/// Validated load-factor threshold and the doubling rule built on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePolicy {
    threshold: f64,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }
}

impl ResizePolicy {
    /// Creates a policy with the given threshold, which must lie in the open interval (0, 1).
    pub fn new(threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(TableError::InvalidLoadFactor(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True if holding `count` entries in `size` slots stays within the threshold.
    pub fn fits(&self, count: usize, size: usize) -> bool {
        load_factor(count, size) <= self.threshold
    }

    /// True if one more entry on top of `count` would exceed the threshold at `size`.
    pub fn needs_growth(&self, count: usize, size: usize) -> bool {
        !self.fits(count + 1, size)
    }

    /// The size to grow to before admitting one more entry.
    ///
    /// Doubles `size` once, and keeps doubling only while a tiny table still cannot hold
    /// `count + 1` entries within the threshold.
    pub fn grown_size(&self, count: usize, size: usize) -> usize {
        let mut new_size = size.saturating_mul(2).max(1);
        while !self.fits(count + 1, new_size) && new_size < usize::MAX {
            new_size = new_size.saturating_mul(2);
        }
        new_size
    }
}
