pub mod csv_store;
pub mod schema;

use thiserror::Error;

use crate::model::{Record, ValidationError};

pub use csv_store::CsvStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Csv(#[from] csv::Error),
}

/// Persistence for the record list. Every mutation takes the current list and
/// returns the list as saved, so callers never hold a stale copy.
pub trait RecordStore {
    fn load(&self) -> Result<Vec<Record>, StoreError>;

    /// Validate `new`, drop the first record equal to `replacing`, add `new`.
    fn upsert(
        &self,
        current: &[Record],
        new: Record,
        replacing: Option<&Record>,
    ) -> Result<Vec<Record>, StoreError>;

    /// Drop the first record equal to `target`.
    fn delete(&self, current: &[Record], target: &Record) -> Result<Vec<Record>, StoreError>;
}

/// Order used for saved files: timestamp, then text fields.
pub fn sort_for_save(records: &mut [Record]) {
    records.sort_by(|a, b| (a.x, &a.y, &a.z).cmp(&(b.x, &b.y, &b.z)));
}

pub fn apply_upsert(current: &[Record], new: Record, replacing: Option<&Record>) -> Vec<Record> {
    let mut next = current.to_vec();
    if let Some(old) = replacing {
        if let Some(pos) = next.iter().position(|r| r == old) {
            next.remove(pos);
        }
    }
    next.push(new);
    sort_for_save(&mut next);
    next
}

pub fn apply_delete(current: &[Record], target: &Record) -> Vec<Record> {
    let mut next = current.to_vec();
    if let Some(pos) = next.iter().position(|r| r == target) {
        next.remove(pos);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(hour: u32, y: &str) -> Record {
        let x = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Record::new(x, y, "")
    }

    #[test]
    fn test_upsert_replaces_only_first_duplicate() {
        let current = vec![rec(9, "dup"), rec(9, "dup"), rec(10, "other")];
        let next = apply_upsert(&current, rec(8, "new"), Some(&rec(9, "dup")));
        assert_eq!(next, vec![rec(8, "new"), rec(9, "dup"), rec(10, "other")]);
    }

    #[test]
    fn test_upsert_without_replacing_inserts_sorted() {
        let current = vec![rec(9, "b"), rec(11, "c")];
        let next = apply_upsert(&current, rec(10, "a"), None);
        assert_eq!(next, vec![rec(9, "b"), rec(10, "a"), rec(11, "c")]);
    }

    #[test]
    fn test_delete_missing_target_is_noop() {
        let current = vec![rec(9, "b")];
        assert_eq!(apply_delete(&current, &rec(9, "zzz")), current);
        assert!(apply_delete(&current, &rec(9, "b")).is_empty());
    }
}
