//! Append-only JSON record stores.
//!
//! Each prediction kind persists to its own flat JSON file: an ordered array
//! of records with contiguous IDs starting at 1. `append` assigns
//! `max(id) + 1`; `delete` removes a record and renumbers the remainder so
//! IDs stay contiguous.
//!
//! Corruption policy: a store file that exists but fails to parse surfaces
//! [`StoreError::Decode`] on every path, including appends. History is never
//! silently reset by a later write.
//!
//! The store performs unsynchronized read-modify-write cycles; callers that
//! share a store across tasks must serialize access (the API layer holds
//! each store behind a mutex).

use crate::types::PredictionRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record (or the whole store file, on delete) does not exist.
    #[error("record {id} not found")]
    NotFound { id: u64 },
    /// The store file exists but is not valid JSON for this record type.
    #[error("corrupted store file {path}: {message}")]
    Decode { path: String, message: String },
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A JSON-file store for one prediction kind.
#[derive(Debug)]
pub struct RecordStore<T> {
    path: PathBuf,
    _entry: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> RecordStore<T> {
    /// Open a store at `path`, creating parent directories as needed.
    /// The file itself is created lazily on first append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            _entry: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records in stored order. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<PredictionRecord<T>>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::Decode {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Append a record, assigning the next contiguous ID. Returns the ID.
    pub fn append(&self, entry: T) -> Result<u64, StoreError> {
        let mut records = self.load()?;
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        records.push(PredictionRecord { id, entry });
        self.write(&records)?;
        Ok(id)
    }

    /// Delete a record by ID and renumber the remainder from 1, preserving
    /// order. Fails with [`StoreError::NotFound`] if the ID (or the store
    /// file) is absent.
    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound { id });
        }
        let records = self.load()?;
        let len_before = records.len();
        let mut remaining: Vec<PredictionRecord<T>> =
            records.into_iter().filter(|r| r.id != id).collect();
        if remaining.len() == len_before {
            return Err(StoreError::NotFound { id });
        }
        for (index, record) in remaining.iter_mut().enumerate() {
            record.id = index as u64 + 1;
        }
        self.write(&remaining)
    }

    fn write(&self, records: &[PredictionRecord<T>]) -> Result<(), StoreError> {
        let file = fs::File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records).map_err(std::io::Error::from)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        label: String,
        value: f64,
    }

    fn entry(label: &str, value: f64) -> Entry {
        Entry {
            label: label.to_string(),
            value,
        }
    }

    fn temp_store() -> (tempfile::TempDir, RecordStore<Entry>) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("records.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_load_round_trips() {
        let (_dir, store) = temp_store();
        assert_eq!(store.append(entry("a", 1.5)).unwrap(), 1);
        assert_eq!(store.append(entry("b", 2.5)).unwrap(), 2);

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].entry, entry("a", 1.5));
        assert_eq!(records[1].id, 2);
        assert_eq!(records[1].entry, entry("b", 2.5));
    }

    #[test]
    fn test_delete_only_record_leaves_empty_store() {
        let (_dir, store) = temp_store();
        store.append(entry("a", 1.0)).unwrap();
        store.delete(1).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_delete_renumbers_remaining_records() {
        let (_dir, store) = temp_store();
        store.append(entry("a", 1.0)).unwrap();
        store.append(entry("b", 2.0)).unwrap();
        store.append(entry("c", 3.0)).unwrap();

        store.delete(2).unwrap();
        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].entry.label, "a");
        assert_eq!(records[1].id, 2); // renumbered from 3
        assert_eq!(records[1].entry.label, "c");
    }

    #[test]
    fn test_delete_missing_id_is_not_found() {
        let (_dir, store) = temp_store();
        store.append(entry("a", 1.0)).unwrap();
        assert!(matches!(
            store.delete(9),
            Err(StoreError::NotFound { id: 9 })
        ));
    }

    #[test]
    fn test_delete_missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.delete(1),
            Err(StoreError::NotFound { id: 1 })
        ));
    }

    #[test]
    fn test_corrupted_file_fails_loudly_on_read_and_write() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), b"{ not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Decode { .. })));
        // the append path must not silently reset a corrupted store
        assert!(matches!(
            store.append(entry("a", 1.0)),
            Err(StoreError::Decode { .. })
        ));
        let contents = fs::read(store.path()).unwrap();
        assert_eq!(contents, b"{ not json");
    }

    #[test]
    fn test_ids_continue_after_delete_renumbering() {
        let (_dir, store) = temp_store();
        store.append(entry("a", 1.0)).unwrap();
        store.append(entry("b", 2.0)).unwrap();
        store.delete(1).unwrap();
        // remaining record renumbered to 1, so the next append gets 2
        assert_eq!(store.append(entry("c", 3.0)).unwrap(), 2);
    }
}
