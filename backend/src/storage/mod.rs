//! Filesystem object stores.
//!
//! Both the blob store and the bucket are directories of opaque objects.
//! Keys are `/`-separated and always resolve inside the store root.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{StorageError, StorageResult};

/// Size of each read when copying between stores.
pub const COPY_CHUNK_SIZE: usize = 1024 * 1024;

/// A directory of objects addressed by key.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path under the root.
    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let mut path = self.root.clone();
        let mut depth = 0;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                _ => return Err(StorageError::InvalidKey(key.to_string())),
            }
        }
        if depth == 0 || key.contains('\\') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(path)
    }

    /// Write an object, replacing any previous content.
    pub fn put(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        Ok(())
    }

    /// Read a whole object.
    pub fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(fs::read(&path)?)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    pub fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    /// Stream an object into another store, [`COPY_CHUNK_SIZE`] bytes at a time.
    /// Returns the number of bytes copied.
    pub fn copy_to(&self, key: &str, dest: &FsObjectStore, dest_key: &str) -> StorageResult<u64> {
        let src_path = self.path_for(key)?;
        if !src_path.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        let dest_path = dest.path_for(dest_key)?;
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut reader = File::open(&src_path)?;
        let mut writer = File::create(&dest_path)?;
        let mut buf = vec![0u8; COPY_CHUNK_SIZE];
        let mut copied = 0u64;
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n])?;
            copied += n as u64;
        }
        writer.flush()?;
        Ok(copied)
    }
}

/// Make an uploaded file name safe to use as the last segment of a key.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_delete() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        store.put("/bucket/cat.png", b"meow").unwrap();
        assert!(store.exists("/bucket/cat.png"));
        assert_eq!(store.get("bucket/cat.png").unwrap(), b"meow");

        store.delete("/bucket/cat.png").unwrap();
        assert!(!store.exists("/bucket/cat.png"));
        assert!(matches!(store.get("/bucket/cat.png"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path().join("store"));

        for key in ["../outside", "/a/../../b", "", "/", "a\\b"] {
            assert!(
                matches!(store.put(key, b"x"), Err(StorageError::InvalidKey(_))),
                "key {:?} accepted",
                key
            );
        }
        assert!(!dir.path().join("outside").exists());
    }

    #[test]
    fn test_copy_across_stores() {
        let dir = tempdir().unwrap();
        let blobs = FsObjectStore::new(dir.path().join("blobs"));
        let bucket = FsObjectStore::new(dir.path().join("gcs"));
        let data: Vec<u8> = (0..(COPY_CHUNK_SIZE + 17)).map(|i| (i % 251) as u8).collect();

        blobs.put("k1", &data).unwrap();
        let copied = blobs.copy_to("k1", &bucket, "/b/big.bin").unwrap();

        assert_eq!(copied, data.len() as u64);
        assert_eq!(bucket.get("/b/big.bin").unwrap(), data);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_filename("  "), "unnamed");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("holiday photo.jpg"), "holiday photo.jpg");
    }
}
