//! Blob store to bucket migration.
//!
//! Two passes over the registry:
//!
//! 1. [`migrate`] copies each blob into the bucket and records its `gs_key`.
//!    Blobs are left in place, so the pass can be re-run safely.
//! 2. [`cleanup`] deletes blobs of records that already have a bucket copy.

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::MigrationResult;
use crate::models::MediaRecord;
use crate::registry::MediaRegistry;
use crate::storage::{sanitize_filename, FsObjectStore};

/// Counters reported by a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records visited
    pub scanned: usize,
    /// Records that now have a bucket copy
    pub migrated: usize,
    /// Blobs copied during this pass
    pub copied: usize,
    /// Records whose blob had disappeared
    pub orphaned: usize,
    /// Blobs deleted by cleanup
    pub deleted_blobs: usize,
}

/// Bucket key for a record: `/<bucket>/<filename>`.
pub fn gs_key_for(bucket: &str, record: &MediaRecord) -> String {
    format!("/{}/{}", bucket, sanitize_filename(&record.filename))
}

/// Migrate one record. Returns the updated record when it changed.
pub fn migrate_record(
    record: &MediaRecord,
    blobs: &FsObjectStore,
    bucket_store: &FsObjectStore,
    bucket: &str,
    report: &mut MigrationReport,
) -> MigrationResult<Option<MediaRecord>> {
    let blob_key = match (&record.blob_key, &record.gs_key) {
        (Some(blob_key), None) => blob_key,
        _ => return Ok(None),
    };

    let mut updated = record.clone();
    if !blobs.exists(blob_key) {
        log_warning(format!("Blob {} of {} is gone, dropping reference", blob_key, record.id));
        updated.blob_key = None;
        report.orphaned += 1;
        return Ok(Some(updated));
    }

    let gs_key = gs_key_for(bucket, record);
    if !bucket_store.exists(&gs_key) {
        let bytes = blobs.copy_to(blob_key, bucket_store, &gs_key)?;
        log_info(format!("Copied {} -> {} ({} bytes)", blob_key, gs_key, bytes));
        report.copied += 1;
    }
    updated.gs_key = Some(gs_key);
    Ok(Some(updated))
}

/// Copy every unmigrated blob into the bucket.
pub fn migrate(
    registry: &mut MediaRegistry,
    blobs: &FsObjectStore,
    bucket_store: &FsObjectStore,
    bucket: &str,
) -> MigrationResult<MigrationReport> {
    let mut report = MigrationReport::default();
    let records: Vec<MediaRecord> = registry.list().into_iter().cloned().collect();

    for record in records {
        report.scanned += 1;
        if let Some(updated) = migrate_record(&record, blobs, bucket_store, bucket, &mut report)? {
            let saved = registry.save(updated)?;
            if saved.is_migrated() {
                report.migrated += 1;
            }
        }
    }

    log_success(format!("Migrated: {} of {} records", report.migrated, report.scanned));
    Ok(report)
}

/// Delete blobs of records already copied to the bucket.
pub fn cleanup(registry: &mut MediaRegistry, blobs: &FsObjectStore) -> MigrationResult<MigrationReport> {
    let mut report = MigrationReport::default();
    let records: Vec<MediaRecord> = registry.list().into_iter().cloned().collect();

    for mut record in records {
        report.scanned += 1;
        let Some(blob_key) = record.blob_key.clone() else {
            continue;
        };
        if record.gs_key.is_none() {
            continue;
        }

        if blobs.exists(&blob_key) {
            blobs.delete(&blob_key)?;
        }
        record.blob_key = None;
        registry.save(record)?;
        report.deleted_blobs += 1;
    }

    log_success(format!("Deleted blobs: {}", report.deleted_blobs));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        registry: MediaRegistry,
        blobs: FsObjectStore,
        bucket: FsObjectStore,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let registry = MediaRegistry::open(dir.path().join("media"));
        let blobs = FsObjectStore::new(dir.path().join("blobs"));
        let bucket = FsObjectStore::new(dir.path().join("gcs"));
        Fixture { _dir: dir, registry, blobs, bucket }
    }

    fn add(f: &mut Fixture, id: &str, filename: &str, data: Option<&[u8]>) {
        let blob_key = format!("blob-{}", id);
        if let Some(data) = data {
            f.blobs.put(&blob_key, data).unwrap();
        }
        let record = MediaRecord::new(id, blob_key, format!("http://h/media/{}", id), filename, "image/png");
        f.registry.save(record).unwrap();
    }

    #[test]
    fn test_migrate_copies_and_keeps_blob() {
        let mut f = fixture();
        add(&mut f, "a", "cat.png", Some(b"cat"));

        let report = migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();

        assert_eq!(report.migrated, 1);
        assert_eq!(report.copied, 1);
        let record = f.registry.get("a").unwrap();
        assert_eq!(record.gs_key.as_deref(), Some("/bs2gcs/cat.png"));
        assert_eq!(record.blob_key.as_deref(), Some("blob-a"));
        assert_eq!(f.bucket.get("/bs2gcs/cat.png").unwrap(), b"cat");
        assert!(f.blobs.exists("blob-a"));
    }

    #[test]
    fn test_migrate_twice_is_safe() {
        let mut f = fixture();
        add(&mut f, "a", "cat.png", Some(b"cat"));

        migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();
        let second = migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();

        assert_eq!(second.scanned, 1);
        assert_eq!(second.migrated, 0);
        assert_eq!(second.copied, 0);
    }

    #[test]
    fn test_migrate_after_cleanup_reports_nothing() {
        let mut f = fixture();
        add(&mut f, "a", "cat.png", Some(b"cat"));

        let first = migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();
        cleanup(&mut f.registry, &f.blobs).unwrap();
        let again = migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();

        assert_eq!(first.migrated, 1);
        assert_eq!(again.migrated, 0);
        assert_eq!(again.orphaned, 0);
        assert_eq!(f.registry.require("a").unwrap().blob_key, None);
    }

    #[test]
    fn test_existing_bucket_object_is_not_overwritten() {
        let mut f = fixture();
        add(&mut f, "a", "cat.png", Some(b"new"));
        f.bucket.put("/bs2gcs/cat.png", b"already there").unwrap();

        let report = migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();

        assert_eq!(report.copied, 0);
        assert_eq!(report.migrated, 1);
        assert_eq!(f.bucket.get("/bs2gcs/cat.png").unwrap(), b"already there");
    }

    #[test]
    fn test_missing_blob_drops_reference() {
        let mut f = fixture();
        add(&mut f, "gone", "dog.png", None);

        let report = migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();

        assert_eq!(report.orphaned, 1);
        assert_eq!(report.migrated, 0);
        let record = f.registry.get("gone").unwrap();
        assert_eq!(record.blob_key, None);
        assert_eq!(record.gs_key, None);
    }

    #[test]
    fn test_cleanup_only_touches_migrated_records() {
        let mut f = fixture();
        add(&mut f, "a", "cat.png", Some(b"cat"));
        migrate(&mut f.registry, &f.blobs, &f.bucket, "bs2gcs").unwrap();
        add(&mut f, "b", "dog.png", Some(b"dog"));

        let report = cleanup(&mut f.registry, &f.blobs).unwrap();

        assert_eq!(report.deleted_blobs, 1);
        assert!(!f.blobs.exists("blob-a"));
        assert!(f.blobs.exists("blob-b"));
        assert_eq!(f.registry.get("a").unwrap().blob_key, None);
        assert_eq!(f.registry.get("b").unwrap().blob_key.as_deref(), Some("blob-b"));
    }
}
