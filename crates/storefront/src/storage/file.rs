//! File-backed client storage.
//!
//! All keys live in one JSON object at `<dir>/storage.json`. Every write
//! rewrites the whole document through a temporary file and a rename, so a
//! crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ClientStorage, StorageError};

const FILE_NAME: &str = "storage.json";

/// Client storage persisted in a directory.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (creating if needed) the storage document in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// document cannot be read or decoded.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        let path = dir.join(FILE_NAME);

        let values = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(io_error(&path, source)),
        };

        debug!(path = %path.display(), keys = values.len(), "Opened client storage");
        Ok(Self { path, values })
    }

    /// Location of the storage document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|source| io_error(&tmp, source))?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(&self.path, source));
        }
        Ok(())
    }

    /// Put `key` back the way it was after a failed flush.
    fn restore(&mut self, key: &str, previous: Option<String>) {
        match previous {
            Some(value) => self.values.insert(key.to_string(), value),
            None => self.values.remove(key),
        };
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.values.insert(key.to_string(), value.to_string());
        self.flush().inspect_err(|_| self.restore(key, previous))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let Some(previous) = self.values.remove(key) else {
            return Ok(());
        };
        self.flush().inspect_err(|_| self.restore(key, Some(previous)))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("access_token", "abc").unwrap();
        storage.set("localbite_cart", "{}").unwrap();
        drop(storage);

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("access_token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("localbite_cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("access_token", "abc").unwrap();
        storage.remove("access_token").unwrap();
        storage.remove("never-set").unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("access_token").unwrap(), None);
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        assert_eq!(storage.path(), nested.join("storage.json"));
        assert!(nested.is_dir());
    }

    #[test]
    fn test_open_rejects_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("storage.json"), "[1, 2").unwrap();
        assert!(matches!(
            FileStorage::open(dir.path()),
            Err(StorageError::Json(_))
        ));
    }

    /// Replace the document with a non-empty directory so the rename fails.
    fn block_document(dir: &Path) {
        let doc = dir.join(FILE_NAME);
        fs::remove_file(&doc).unwrap();
        fs::create_dir(&doc).unwrap();
        fs::write(doc.join("keep"), "").unwrap();
    }

    #[test]
    fn test_failed_write_keeps_memory_in_step_with_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("access_token", "old").unwrap();
        block_document(dir.path());

        assert!(storage.set("access_token", "new").is_err());
        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("old"));

        assert!(storage.set("localbite_cart", "{}").is_err());
        assert_eq!(storage.get("localbite_cart").unwrap(), None);

        assert!(!dir.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_failed_remove_keeps_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("access_token", "abc").unwrap();
        block_document(dir.path());

        assert!(storage.remove("access_token").is_err());
        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("abc"));
    }
}
