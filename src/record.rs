//! Stored key/value record with a soft-delete marker.

use core::fmt;

/// A key/value pair as held in a table slot.
///
/// `query_item` hands out clones; the table keeps the original. A record
/// with `is_deleted() == true` is a tombstone: logically absent but still
/// occupying its slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub(crate) key: String,
    pub(crate) value: String,
    pub(crate) deleted: bool,
}

impl Record {
    pub(crate) fn new(key: String, value: String) -> Self {
        Record {
            key,
            value,
            deleted: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} => {:?}", self.key, self.value)?;
        if self.deleted {
            f.write_str(" (deleted)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: new records are live.
    #[test]
    fn new_record_is_live() {
        let r = Record::new("k".to_string(), "v".to_string());
        assert_eq!(r.key(), "k");
        assert_eq!(r.value(), "v");
        assert!(!r.is_deleted());
    }

    /// Invariant: display shows key, value and tombstone state.
    #[test]
    fn display_marks_tombstones() {
        let mut r = Record::new("k".to_string(), "v".to_string());
        assert_eq!(r.to_string(), "\"k\" => \"v\"");
        r.deleted = true;
        assert_eq!(r.to_string(), "\"k\" => \"v\" (deleted)");
    }
}
