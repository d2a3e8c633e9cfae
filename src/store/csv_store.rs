use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::model::Record;
use crate::store::schema::{CSV_MIN_FIELDS, record_from_row, record_to_row};
use crate::store::{RecordStore, StoreError, apply_delete, apply_upsert};

/// Records kept in a headerless `x,y,z[,bucket]` CSV file.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Record>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            if row.len() < CSV_MIN_FIELDS {
                return Err(StoreError::Storage(format!(
                    "{}: row {} has {} fields, expected at least {CSV_MIN_FIELDS}",
                    self.path.display(),
                    line + 1,
                    row.len()
                )));
            }
            let record = record_from_row(&row).map_err(|e| {
                StoreError::Storage(format!("{}: row {}: {e}", self.path.display(), line + 1))
            })?;
            records.push(record);
        }
        records.sort_by_key(|r| r.x);
        Ok(records)
    }

    /// Write through a sibling temp file and rename over the target. The
    /// temp file is removed again if any step after creating it fails.
    fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");

        let written = Self::write_rows(&tmp_path, records)
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(StoreError::from));
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %cleanup, "could not remove temp file");
            }
            return Err(err);
        }
        info!(count = records.len(), path = %self.path.display(), "saved records");
        Ok(())
    }

    fn write_rows(tmp_path: &Path, records: &[Record]) -> Result<(), StoreError> {
        let file = fs::File::create(tmp_path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        for record in records {
            writer.write_record(record_to_row(record))?;
        }
        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        file.sync_all()?;
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn load(&self) -> Result<Vec<Record>, StoreError> {
        let records = self.read()?;
        info!(count = records.len(), path = %self.path.display(), "loaded records");
        Ok(records)
    }

    fn upsert(
        &self,
        current: &[Record],
        new: Record,
        replacing: Option<&Record>,
    ) -> Result<Vec<Record>, StoreError> {
        new.validate()?;
        let next = apply_upsert(current, new, replacing);
        self.save(&next)?;
        Ok(next)
    }

    fn delete(&self, current: &[Record], target: &Record) -> Result<Vec<Record>, StoreError> {
        let next = apply_delete(current, target);
        self.save(&next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bucket;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, CsvStore) {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("nested").join("events.csv"));
        (dir, store)
    }

    fn rec(day: u32, y: &str) -> Record {
        let x = NaiveDate::from_ymd_opt(2026, 8, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Record::new(x, y, "note, with comma")
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = make_test_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_then_reload() {
        let (_dir, store) = make_test_store();
        let saved = store
            .upsert(&[], rec(3, "later").with_bucket(Some(Bucket::Economic)), None)
            .unwrap();
        let saved = store.upsert(&saved, rec(1, "earlier"), None).unwrap();
        assert_eq!(saved[0].y, "earlier");

        let loaded = store.load().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded[1].bucket, Some(Bucket::Economic));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_upsert_rejects_blank_outcome_without_writing() {
        let (_dir, store) = make_test_store();
        let err = store.upsert(&[], rec(1, "   "), None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_delete_persists() {
        let (_dir, store) = make_test_store();
        let saved = store.upsert(&[], rec(1, "keep"), None).unwrap();
        let saved = store.upsert(&saved, rec(2, "drop"), None).unwrap();
        let after = store.delete(&saved, &rec(2, "drop")).unwrap();
        assert_eq!(after, vec![rec(1, "keep")]);
        assert_eq!(store.load().unwrap(), after);
    }

    #[test]
    fn test_bad_rows_name_the_file() {
        let (_dir, store) = make_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "2026-08-01 09:00:00,ok,\nnot a date,x,y\n").unwrap();
        let err = store.load().unwrap_err().to_string();
        assert!(err.starts_with("Storage error:"));
        assert!(err.contains("events.csv"));
        assert!(err.contains("row 2"));

        fs::write(store.path(), "2026-08-01 09:00:00,only two\n").unwrap();
        assert!(store.load().unwrap_err().to_string().contains("expected at least 3"));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let (_dir, store) = make_test_store();
        // A directory at the target path makes the final rename fail.
        fs::create_dir_all(store.path()).unwrap();
        let err = store.upsert(&[], rec(1, "blocked"), None).unwrap_err();
        assert!(err.to_string().starts_with("Storage error:"));
        assert!(!store.path().with_extension("tmp").exists());
        assert!(store.path().is_dir());
    }

    #[test]
    fn test_load_sorts_by_timestamp() {
        let (_dir, store) = make_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            "2026-08-05 10:00:00,b,\n2026-08-01 10:00:00,a,,thing\n",
        )
        .unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].y, "a");
        assert_eq!(loaded[0].bucket, Some(Bucket::Thing));
    }
}
