use thiserror::Error;

/// Errors raised while configuring a hash table.
///
/// Lookups never fail: a missing key is `None`, and deleting one returns `false`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("unknown hash function `{0}` (expected one of: simple, polynomial, djb2)")]
    UnknownHashFunction(String),

    #[error("unknown probing method `{0}` (expected one of: linear, double)")]
    UnknownProbingMethod(String),

    #[error("table size must be positive")]
    ZeroSize,

    #[error("load factor threshold must lie in (0, 1), got {0}")]
    InvalidLoadFactor(f64),
}

impl TableError {
    pub fn unknown_hash_function<S: Into<String>>(name: S) -> Self {
        TableError::UnknownHashFunction(name.into())
    }

    pub fn unknown_probing_method<S: Into<String>>(name: S) -> Self {
        TableError::UnknownProbingMethod(name.into())
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
