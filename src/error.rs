use thiserror::Error;

/// Failures returned by [`HashTable`](crate::HashTable) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid table geometry: width {width}, depth {depth} (both must be positive)")]
    InvalidConfiguration { width: usize, depth: usize },
    #[error("key {0:?} already exists")]
    DuplicateKey(String),
    #[error("key {0:?} not found")]
    KeyNotFound(String),
    #[error("bucket {bucket} is full ({depth} live records, no tombstones)")]
    BucketFull { bucket: usize, depth: usize },
}
