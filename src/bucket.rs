//! Bounded bucket: an ordered list of at most `depth` slot keys.
//!
//! Records live in the table's `SlotMap`; a bucket only orders the keys of
//! the slots that hashed to it. Positions are stable: a slot is never
//! removed from a bucket, only replaced in place when reclaimed.

use crate::record::Record;
use slotmap::{DefaultKey, SlotMap};

/// A record plus the sequence number it was created with.
#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) record: Record,
    pub(crate) seq: u64,
}

pub(crate) type Slots = SlotMap<DefaultKey, Slot>;

#[derive(Debug)]
pub(crate) struct Bucket {
    keys: Vec<DefaultKey>,
    depth: usize,
}

impl Bucket {
    pub(crate) fn new(depth: usize) -> Self {
        Bucket {
            keys: Vec::new(),
            depth,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.keys.len() >= self.depth
    }

    pub(crate) fn keys(&self) -> &[DefaultKey] {
        &self.keys
    }

    /// Slot key of the live record for `key`, if any.
    pub(crate) fn find_live(&self, slots: &Slots, key: &str) -> Option<DefaultKey> {
        self.keys.iter().copied().find(|&k| {
            slots
                .get(k)
                .map(|s| !s.record.deleted && s.record.key == key)
                .unwrap_or(false)
        })
    }

    /// Position of a tombstone still carrying `key`.
    pub(crate) fn find_tombstone(&self, slots: &Slots, key: &str) -> Option<usize> {
        self.keys.iter().position(|&k| {
            slots
                .get(k)
                .map(|s| s.record.deleted && s.record.key == key)
                .unwrap_or(false)
        })
    }

    /// Position of the tombstone whose record was created first.
    pub(crate) fn oldest_tombstone(&self, slots: &Slots) -> Option<usize> {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(pos, &k)| {
                slots
                    .get(k)
                    .filter(|s| s.record.deleted)
                    .map(|s| (s.seq, pos))
            })
            .min()
            .map(|(_, pos)| pos)
    }

    pub(crate) fn push(&mut self, k: DefaultKey) {
        debug_assert!(!self.is_full(), "push into a full bucket");
        self.keys.push(k);
    }

    /// Point position `pos` at a new slot, returning the slot key it held.
    pub(crate) fn replace(&mut self, pos: usize, k: DefaultKey) -> DefaultKey {
        core::mem::replace(&mut self.keys[pos], k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(slots: &mut Slots, key: &str, seq: u64, deleted: bool) -> DefaultKey {
        let mut record = Record::new(key.to_string(), "v".to_string());
        record.deleted = deleted;
        slots.insert(Slot { record, seq })
    }

    /// Invariant: a bucket reports full exactly at `depth` entries.
    #[test]
    fn capacity_is_depth() {
        let mut slots = Slots::with_key();
        let mut b = Bucket::new(2);
        assert!(!b.is_full());
        b.push(slot(&mut slots, "a", 0, false));
        assert!(!b.is_full());
        b.push(slot(&mut slots, "b", 1, false));
        assert!(b.is_full());
        assert_eq!(b.keys().len(), 2);
    }

    /// Invariant: `depth` is a limit, not a reservation.
    #[test]
    fn huge_depth_allocates_nothing() {
        let b = Bucket::new(usize::MAX);
        assert!(b.keys().is_empty());
        assert!(!b.is_full());
    }

    /// Invariant: live lookup ignores tombstones carrying the same key.
    #[test]
    fn find_live_skips_tombstones() {
        let mut slots = Slots::with_key();
        let mut b = Bucket::new(3);
        let dead = slot(&mut slots, "k", 0, true);
        b.push(dead);
        assert_eq!(b.find_live(&slots, "k"), None);
        assert_eq!(b.find_tombstone(&slots, "k"), Some(0));

        let live = slot(&mut slots, "j", 1, false);
        b.push(live);
        assert_eq!(b.find_live(&slots, "j"), Some(live));
        assert_eq!(b.find_tombstone(&slots, "j"), None);
    }

    /// Invariant: the oldest tombstone is chosen by creation sequence, not
    /// by position.
    #[test]
    fn oldest_tombstone_uses_sequence() {
        let mut slots = Slots::with_key();
        let mut b = Bucket::new(3);
        b.push(slot(&mut slots, "a", 7, true));
        b.push(slot(&mut slots, "b", 2, false));
        b.push(slot(&mut slots, "c", 4, true));
        assert_eq!(b.oldest_tombstone(&slots), Some(2));
    }

    /// Invariant: no tombstones means nothing to reclaim.
    #[test]
    fn oldest_tombstone_none_when_all_live() {
        let mut slots = Slots::with_key();
        let mut b = Bucket::new(2);
        b.push(slot(&mut slots, "a", 0, false));
        b.push(slot(&mut slots, "b", 1, false));
        assert_eq!(b.oldest_tombstone(&slots), None);
    }

    /// Invariant: replacing keeps the position and returns the old key.
    #[test]
    fn replace_keeps_position() {
        let mut slots = Slots::with_key();
        let mut b = Bucket::new(2);
        let a = slot(&mut slots, "a", 0, true);
        let c = slot(&mut slots, "c", 1, false);
        b.push(a);
        b.push(c);
        let n = slot(&mut slots, "n", 2, false);
        assert_eq!(b.replace(0, n), a);
        assert_eq!(b.keys(), &[n, c]);
    }
}
