//! grid-table: a fixed-geometry, single-threaded hash table of text records
//! with bounded buckets and soft deletion.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a `width x depth` slot grid whose capacity is fixed at
//!   construction and whose full-bucket condition is an explicit error
//!   rather than silent growth.
//! - Layers:
//!   - `PolynomialBuildHasher`: deterministic rolling hash over key bytes;
//!     the bucket index is `hash mod width`.
//!   - `Bucket`: ordered list of at most `depth` slot keys with the scans the
//!     table needs (live match, tombstone match, oldest tombstone).
//!   - `HashTable<S>`: owns the records in a generational `SlotMap` and the
//!     `width` buckets that order them; exposes create/update/query/delete
//!     and a diagnostic dump.
//!
//! Constraints
//! - No resizing or rehashing. `width` and `depth` never change.
//! - Bucket placement is a pure function of the key; a record never moves
//!   between buckets.
//! - At most one live record per key.
//!
//! Deletion and reclamation
//! - `delete_item` sets a tombstone; the slot stays physically occupied and
//!   bucket positions never shift.
//! - `create_item` reuses a tombstone carrying the same key first. Otherwise
//!   it appends while the bucket has room, and once full it reclaims the
//!   tombstone whose record was created earliest. A full bucket with no
//!   tombstones yields `TableError::BucketFull`.
//! - Reclaimed slots receive a fresh generational key, so a `Handle` taken
//!   before reclamation never resolves to the new occupant.
//!
//! Notes and non-goals
//! - Single-threaded: mutating calls take `&mut self` and there is no
//!   internal locking. Wrap the table in a `Mutex` for shared access.
//! - No persistence, no generic key/value types.
//! - The library logs through the `log` facade and never installs a logger.

mod bucket;
pub mod error;
pub mod hash_table;
mod hash_table_proptest;
pub mod hasher;
mod record;

// Public surface
pub use error::TableError;
pub use hash_table::{Handle, HashTable, Iter};
pub use hasher::{PolynomialBuildHasher, PolynomialHasher};
pub use record::Record;
