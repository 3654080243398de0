//! In-memory hash tables with two collision-resolution disciplines, separate chaining and open
//! addressing (linear or double-hash probing), over a registry of string hash functions.
//!
//! Both tables grow by doubling before a new key would push the load factor above the
//! configured threshold. They are meant for single-threaded use.

pub mod error;
pub mod hashing;

pub use error::{Result, TableError};
pub use hashing::{
    ChainingStats, ChainingTable, ChainingTableBuilder, HashFunction, HashKey,
    OpenAddressingTable, OpenAddressingTableBuilder, ProbingMethod, ProbingStats,
};
