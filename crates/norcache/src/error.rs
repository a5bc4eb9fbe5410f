//! Error types for norcache

use std::fmt;

/// Result type alias for norcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction
///
/// Lookup misses are not errors; they are reported as `Option`/no-op results
/// on the cache operations themselves. Only misconfiguration at construction
/// time is reportable.
#[derive(Debug)]
pub enum Error {
    /// Capacity of 0 entries was requested
    InvalidCapacity(usize),

    /// Bucket count of 0 was requested
    InvalidBucketCount(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(n) => {
                write!(f, "Invalid capacity: {} (must be at least 1)", n)
            }
            Error::InvalidBucketCount(n) => {
                write!(f, "Invalid bucket count: {} (must be at least 1)", n)
            }
        }
    }
}

impl std::error::Error for Error {}
