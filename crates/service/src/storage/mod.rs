//! Storage abstractions for the service layer
//!
//! `KeyValueStore` is the capability the bookmarks accessor is built on:
//! a synchronous string-to-string namespace. Backends are injected so the
//! accessor never reaches for process-wide state on its own.

use std::{collections::HashMap, sync::Arc};

use crate::errors::StorageError;

#[cfg(not(target_arch = "wasm32"))]
pub mod json_file_store;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(not(target_arch = "wasm32"))]
pub use json_file_store::JsonFileStore;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

/// Synchronous key-value store scoped to one namespace.
///
/// A write either completes or fails before it returns; readers never see a
/// partially written value.
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` if nothing was ever written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// Backend shared across threads, as handed to the HTTP layer.
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Build the backend selected in configuration.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_backend(cfg: &configs::StorageConfig) -> Result<SharedStore, StorageError> {
    let store: SharedStore = match cfg.backend {
        configs::StorageBackend::Memory => match cfg.quota_bytes {
            Some(q) => Arc::new(MemoryStore::with_quota(q)),
            None => Arc::new(MemoryStore::new()),
        },
        configs::StorageBackend::File => {
            Arc::new(JsonFileStore::open_with_quota(&cfg.path, cfg.quota_bytes)?)
        }
    };
    tracing::info!(backend = ?cfg.backend, path = %cfg.path, quota = ?cfg.quota_bytes, "storage backend opened");
    Ok(store)
}

/// Bytes used by the namespace once `key` holds `value`.
pub(crate) fn usage_after_write(map: &HashMap<String, String>, key: &str, value: &str) -> usize {
    let others: usize = map
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    others + key.len() + value.len()
}

/// Reject a write that would push the namespace past `quota`.
pub(crate) fn check_quota(
    map: &HashMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    if let Some(quota) = quota {
        let required = usage_after_write(map, key, value);
        if required > quota {
            return Err(StorageError::quota_exceeded(required, quota));
        }
    }
    Ok(())
}
