//! Client-side persistent key/value storage.
//!
//! Models the browser's `localStorage`: string keys mapping to string
//! values, read synchronously, written through on every change. Structured
//! values (the cart, the user profile) are stored as JSON text.
//!
//! # Stores
//!
//! - [`MemoryStore`] - process-local, for tests and ephemeral sessions
//! - [`FileStore`] - a single JSON file on disk, rewritten atomically
//!
//! Both are `Send + Sync` and are shared as `Arc<dyn KeyValueStore>`
//! between the cart and the auth state.

mod file;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;

/// Fixed storage keys.
pub mod keys {
    /// Bearer token of the logged-in user (plain string).
    pub const TOKEN: &str = "token";

    /// Profile of the logged-in user (JSON object).
    pub const USER: &str = "user";

    /// Cart lines in insertion order (JSON array).
    pub const CART: &str = "cart";
}

/// Errors that can occur when reading or writing a store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON object of strings.
    #[error("Corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A `localStorage`-style string store.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the change could not be persisted. The previous
    /// value is kept in that case.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the change could not be persisted.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
///
/// Absent and undecodable values both yield `None`; the latter is logged so
/// corruption is at least visible in the logs.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring unreadable stored value");
            None
        }
    }
}

/// Encode a value as JSON and store it.
///
/// # Errors
///
/// Returns an error if encoding fails or the store cannot persist the value.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw)
}

/// In-memory store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item(keys::TOKEN), None);

        store.set_item(keys::TOKEN, "abc").unwrap();
        assert_eq!(store.get_item(keys::TOKEN).as_deref(), Some("abc"));

        store.remove_item(keys::TOKEN).unwrap();
        assert_eq!(store.get_item(keys::TOKEN), None);

        // Removing again is fine
        store.remove_item(keys::TOKEN).unwrap();
    }

    #[test]
    fn test_read_json_round_trip() {
        let store = MemoryStore::new();
        write_json(&store, keys::CART, &vec![1, 2, 3]).unwrap();
        let value: Option<Vec<i32>> = read_json(&store, keys::CART);
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_read_json_treats_corrupt_as_absent() {
        let store = MemoryStore::new();
        store.set_item(keys::USER, "{not json").unwrap();
        let value: Option<serde_json::Value> = read_json(&store, keys::USER);
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_treats_wrong_shape_as_absent() {
        let store = MemoryStore::new();
        store.set_item(keys::CART, "{\"not\":\"a list\"}").unwrap();
        let value: Option<Vec<i32>> = read_json(&store, keys::CART);
        assert!(value.is_none());
    }
}
