//! File-backed store.
//!
//! The whole store is one JSON object (`{"cart": "[...]", "token": "..."}`)
//! held in memory and rewritten on every change via a temp file and rename,
//! so a crash mid-write leaves either the old or the new contents.
//! Two processes sharing the file race with last-writer-wins semantics.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{KeyValueStore, StorageError};

/// Key/value store persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created (with parent directories) on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let items = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = items.len(), "Opened file store");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn items(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `items` to disk atomically.
    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string_pretty(items)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items();
        let previous = items.insert(key.to_string(), value.to_string());

        if let Err(e) = self.flush(&items) {
            match previous {
                Some(previous) => items.insert(key.to_string(), previous),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items();
        let Some(previous) = items.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.flush(&items) {
            items.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("storage.json")).unwrap();
        assert_eq!(store.get_item(keys::CART), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set_item(keys::TOKEN, "tok-123").unwrap();
        store.set_item(keys::CART, "[]").unwrap();
        store.remove_item(keys::CART).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item(keys::TOKEN).as_deref(), Some("tok-123"));
        assert_eq!(reopened.get_item(keys::CART), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "  \n").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get_item(keys::USER), None);
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        // The store path is a directory, so the final rename fails
        let path = dir.path().join("occupied");
        fs::create_dir_all(path.join("child")).unwrap();

        let store = FileStore {
            path,
            items: Mutex::new(BTreeMap::from([(
                keys::TOKEN.to_string(),
                "old".to_string(),
            )])),
        };

        assert!(store.set_item(keys::TOKEN, "new").is_err());
        assert_eq!(store.get_item(keys::TOKEN).as_deref(), Some("old"));
    }
}
