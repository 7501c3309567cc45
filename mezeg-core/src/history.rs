//! Durable search history: a single JSON file holding an append-only array
//! of lookup records, oldest first.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{config::project_dirs, model::HistoryRecord};

const HISTORY_FILE: &str = "history.json";

/// File-backed history store. The sole reader and writer of the persisted
/// record list; single-process, no locking.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store at the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at_path(default_file_path()?))
    }

    /// Store at an explicit path; used by tests.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full history, oldest first. A missing, unreadable or corrupt file
    /// counts as an empty history; this never fails.
    pub fn read_all(&self) -> Vec<HistoryRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), %err, "history file unreadable, treating as empty");
                }
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "history file corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Append one record, rewriting the whole serialized list.
    pub fn append(&self, record: HistoryRecord) -> Result<()> {
        let mut records = self.read_all();
        records.push(record);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(&records).context("Failed to serialize history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        Ok(())
    }

    /// Remove the persisted history entirely. Clearing an absent history is
    /// not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("Failed to remove history file: {}", self.path.display())
            }),
        }
    }
}

fn default_file_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join(HISTORY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::at_path(dir.path().join("history.json"))
    }

    fn record(n: usize) -> HistoryRecord {
        HistoryRecord {
            timestamp: format!("2026-08-0{n}T12:00:00+03:00"),
            city_name: format!("City {n}"),
            country: "Israel".to_string(),
        }
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).read_all().is_empty());
    }

    #[test]
    fn append_then_read_roundtrips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for n in 1..=3 {
            store.append(record(n)).expect("append should succeed");
        }

        let records = store.read_all();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].city_name, "City 1");
        assert_eq!(records[2].city_name, "City 3");
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.read_all().is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(record(1)).unwrap();

        store.clear().expect("clear should succeed");
        assert!(store.read_all().is_empty());

        // Clearing again is a no-op.
        store.clear().expect("clearing an absent history is fine");
    }

    #[test]
    fn records_use_the_documented_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(record(1)).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"timestamp\""));
        assert!(raw.contains("\"cityName\""));
        assert!(raw.contains("\"country\""));
    }
}
