//! HashTable: fixed `width x depth` grid of bounded buckets with tombstones.

use crate::bucket::{Bucket, Slot, Slots};
use crate::error::TableError;
use crate::hasher::PolynomialBuildHasher;
use crate::record::Record;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use log::{debug, trace, warn};
use slotmap::DefaultKey;

/// Generational reference to a live record.
///
/// Resolves through [`Handle::record`] until the record is deleted. A slot
/// reclaimed by a later create gets a fresh handle, so an old handle never
/// observes the new occupant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn record<'a, S>(&self, table: &'a HashTable<S>) -> Option<&'a Record> {
        table
            .slots
            .get(self.0)
            .map(|s| &s.record)
            .filter(|r| !r.deleted)
    }
}

/// Where a create lands inside its bucket.
enum Placement {
    /// Overwrite the tombstone at this position.
    Reclaim(usize),
    Append,
}

pub struct HashTable<S = PolynomialBuildHasher> {
    hasher: S,
    width: usize,
    depth: usize,
    grid: Vec<Bucket>,
    slots: Slots, // every record, live or tombstoned
    next_seq: u64,
    live: usize,
}

impl HashTable {
    /// Build a `width x depth` table hashed with the polynomial rolling hash.
    pub fn new(width: usize, depth: usize) -> Result<Self, TableError> {
        Self::with_hasher(width, depth, PolynomialBuildHasher)
    }
}

impl<S> HashTable<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(width: usize, depth: usize, hasher: S) -> Result<Self, TableError> {
        if width == 0 || depth == 0 {
            return Err(TableError::InvalidConfiguration { width, depth });
        }
        debug!("hash table created: width {}, depth {}", width, depth);
        Ok(Self {
            hasher,
            width,
            depth,
            grid: (0..width).map(|_| Bucket::new(depth)).collect(),
            slots: Slots::with_key(),
            next_seq: 0,
            live: 0,
        })
    }

    /// Bucket that `key` hashes to. Depends only on the key bytes and `width`.
    pub fn bucket_index(&self, key: &str) -> usize {
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        (h.finish() % self.width as u64) as usize
    }

    pub fn create_item(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), TableError> {
        let key = key.into();
        let idx = self.bucket_index(&key);
        trace!("create {:?} in bucket {}", key, idx);

        let placement = match self.placement(idx, &key) {
            Ok(p) => p,
            Err(e) => {
                if let TableError::BucketFull { .. } = e {
                    warn!("create {:?} rejected: {}", key, e);
                }
                return Err(e);
            }
        };

        let slot = Slot {
            record: Record::new(key, value.into()),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let k = self.slots.insert(slot);
        match placement {
            Placement::Append => self.grid[idx].push(k),
            Placement::Reclaim(pos) => {
                let old = self.grid[idx].replace(pos, k);
                if let Some(evicted) = self.slots.remove(old) {
                    debug!(
                        "bucket {} slot {} reclaimed from tombstone {:?}",
                        idx, pos, evicted.record.key
                    );
                }
            }
        }
        self.live += 1;
        Ok(())
    }

    fn placement(&self, idx: usize, key: &str) -> Result<Placement, TableError> {
        let bucket = &self.grid[idx];
        if bucket.find_live(&self.slots, key).is_some() {
            return Err(TableError::DuplicateKey(key.to_string()));
        }
        if let Some(pos) = bucket.find_tombstone(&self.slots, key) {
            return Ok(Placement::Reclaim(pos));
        }
        if !bucket.is_full() {
            return Ok(Placement::Append);
        }
        bucket
            .oldest_tombstone(&self.slots)
            .map(Placement::Reclaim)
            .ok_or(TableError::BucketFull {
                bucket: idx,
                depth: self.depth,
            })
    }

    pub fn update_item(&mut self, key: &str, value: impl Into<String>) -> Result<(), TableError> {
        trace!("update {:?}", key);
        let k = self
            .find_live(key)
            .ok_or_else(|| TableError::KeyNotFound(key.to_string()))?;
        self.slots[k].record.value = value.into();
        Ok(())
    }

    /// Copy of the live record for `key`.
    pub fn query_item(&self, key: &str) -> Result<Record, TableError> {
        trace!("query {:?}", key);
        self.find_live(key)
            .and_then(|k| self.slots.get(k))
            .map(|s| s.record.clone())
            .ok_or_else(|| TableError::KeyNotFound(key.to_string()))
    }

    /// Tombstone the live record for `key`. The slot stays occupied until a
    /// later create in the same bucket reclaims it.
    pub fn delete_item(&mut self, key: &str) -> Result<(), TableError> {
        trace!("delete {:?}", key);
        let k = self
            .find_live(key)
            .ok_or_else(|| TableError::KeyNotFound(key.to_string()))?;
        self.slots[k].record.deleted = true;
        self.live -= 1;
        Ok(())
    }

    /// Diagnostic dump of every slot, bucket by bucket.
    pub fn print_table(&self) -> String {
        self.to_string()
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        self.find_live(key).map(Handle)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_live(key).is_some()
    }

    fn find_live(&self, key: &str) -> Option<DefaultKey> {
        self.grid[self.bucket_index(key)].find_live(&self.slots, key)
    }
}

impl<S> HashTable<S> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of live (non-deleted) records.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn tombstones(&self) -> usize {
        self.slots.len() - self.live
    }

    /// Physically occupied slots, live and tombstoned.
    pub fn occupied(&self) -> usize {
        self.slots.len()
    }

    /// Live records in bucket-then-slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.grid.iter(),
            keys: Default::default(),
            slots: &self.slots,
        }
    }
}

/// Iterator over live records of a `HashTable`.
pub struct Iter<'a> {
    buckets: core::slice::Iter<'a, Bucket>,
    keys: core::slice::Iter<'a, DefaultKey>,
    slots: &'a Slots,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for &k in self.keys.by_ref() {
                if let Some(slot) = self.slots.get(k) {
                    if !slot.record.deleted {
                        return Some(&slot.record);
                    }
                }
            }
            self.keys = self.buckets.next()?.keys().iter();
        }
    }
}

impl<'a, S> IntoIterator for &'a HashTable<S> {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> fmt::Display for HashTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "HashTable width={} depth={} live={} tombstones={}",
            self.width,
            self.depth,
            self.len(),
            self.tombstones()
        )?;
        for (i, bucket) in self.grid.iter().enumerate() {
            if bucket.keys().is_empty() {
                writeln!(f, "bucket {}: empty", i)?;
                continue;
            }
            writeln!(f, "bucket {}:", i)?;
            for (pos, &k) in bucket.keys().iter().enumerate() {
                if let Some(slot) = self.slots.get(k) {
                    writeln!(f, "  [{}] {}", pos, slot.record)?;
                }
            }
        }
        Ok(())
    }
}

impl<S> fmt::Debug for HashTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("width", &self.width)
            .field("depth", &self.depth)
            .field("live", &self.live)
            .field("tombstones", &self.tombstones())
            .finish()
    }
}
