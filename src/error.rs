//! Cache error types.
//!
//! Lock contention is not an error (callers simply wait for the gate), so
//! the taxonomy is small: the fallible `try_*` update operations surface
//! whatever reason a caller-supplied updater gave for rejecting an update.

use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// An updater declined to produce a new value; the cache was left
    /// unchanged.
    #[error("Update rejected: {0}")]
    UpdateRejected(String),

    /// Embedder-defined failure threaded through an updater.
    #[error("{0}")]
    Other(String),
}

impl From<String> for CacheError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl From<&str> for CacheError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}
