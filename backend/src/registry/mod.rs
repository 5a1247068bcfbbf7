//! Media Registry - Persist media records
//!
//! One JSON file per record under the registry directory, all loaded into
//! memory when the registry is opened.

use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, RegistryResult};
use crate::models::MediaRecord;

/// Upper bound of a listing, as served by `/api/media`.
pub const MAX_LISTED: usize = 999;

/// Registry of stored media records
pub struct MediaRegistry {
    /// Directory where records are stored
    registry_dir: PathBuf,
    /// Loaded records (id -> record)
    records: HashMap<String, MediaRecord>,
}

impl MediaRegistry {
    /// Open a registry, loading existing records from disk
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let mut registry = Self {
            registry_dir: PathBuf::from(dir.as_ref()),
            records: HashMap::new(),
        };
        registry.load_all();
        registry
    }

    /// Load all records from the registry directory
    fn load_all(&mut self) {
        if !self.registry_dir.exists() {
            return;
        }

        let entries = match fs::read_dir(&self.registry_dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(record) = serde_json::from_str::<MediaRecord>(&content) {
                        self.records.insert(record.id.clone(), record);
                    }
                }
            }
        }
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.registry_dir.join(format!("{}.json", id))
    }

    /// Store a record, refreshing its `updated` timestamp
    pub fn save(&mut self, mut record: MediaRecord) -> RegistryResult<MediaRecord> {
        fs::create_dir_all(&self.registry_dir)?;

        record.updated = Utc::now();
        let content = serde_json::to_string_pretty(&record)?;
        fs::write(self.record_path(&record.id), content)?;

        self.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Get a record by ID
    pub fn get(&self, id: &str) -> Option<&MediaRecord> {
        self.records.get(id)
    }

    /// Get a record by ID, failing when absent
    pub fn require(&self, id: &str) -> RegistryResult<&MediaRecord> {
        self.get(id).ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// All records, in no particular order
    pub fn list(&self) -> Vec<&MediaRecord> {
        self.records.values().collect()
    }

    /// Most recently updated records first, at most `limit`
    pub fn list_recent(&self, limit: usize) -> Vec<&MediaRecord> {
        let mut records = self.list();
        records.sort_by(|a, b| b.updated.cmp(&a.updated).then_with(|| a.id.cmp(&b.id)));
        records.truncate(limit);
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(id: &str) -> MediaRecord {
        MediaRecord::new(id, format!("blob-{}", id), format!("http://h/media/{}", id), "a.png", "image/png")
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut registry = MediaRegistry::open(dir.path());
            registry.save(record("one")).unwrap();
            registry.save(record("two")).unwrap();
        }

        let registry = MediaRegistry::open(dir.path());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("one").unwrap().blob_key.as_deref(), Some("blob-one"));
        assert!(matches!(registry.require("three"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_list_recent_is_newest_first_and_bounded() {
        let dir = tempdir().unwrap();
        let mut registry = MediaRegistry::open(dir.path());
        for id in ["a", "b", "c"] {
            registry.save(record(id)).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let ids: Vec<&str> = registry.list_recent(2).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_save_refreshes_updated() {
        let dir = tempdir().unwrap();
        let mut registry = MediaRegistry::open(dir.path());
        let first = registry.save(record("a")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = registry.save(first.clone()).unwrap();

        assert!(second.updated > first.updated);
        assert_eq!(registry.len(), 1);
    }
}
