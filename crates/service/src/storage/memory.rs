use std::{collections::HashMap, sync::RwLock};

use crate::errors::StorageError;
use crate::storage::{check_quota, KeyValueStore};

/// In-process key-value store.
///
/// Useful for tests and for running the server without touching disk.
/// `with_quota` and `disabled` reproduce the failure modes of browser storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once key + value bytes exceed `quota`.
    pub fn with_quota(quota: usize) -> Self {
        Self { quota: Some(quota), ..Self::default() }
    }

    /// Store that fails every operation, like storage turned off by the user agent.
    pub fn disabled() -> Self {
        Self { disabled: true, ..Self::default() }
    }

    fn ensure_enabled(&self) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::unavailable("store disabled"));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_enabled()?;
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::unavailable("memory store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_enabled()?;
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::unavailable("memory store lock poisoned"))?;
        check_quota(&map, key, value, self.quota)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
