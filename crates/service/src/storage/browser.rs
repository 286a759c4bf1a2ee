//! Browser `localStorage` backend.
//!
//! Only built for wasm32. `setItem` throws when the origin's quota is
//! exhausted or storage is blocked; both surface as `StorageUnavailable`.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::errors::StorageError;
use crate::storage::KeyValueStore;

pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    /// The current window's `localStorage`.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::unavailable("no window object"))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::unavailable("no localStorage"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_error)
    }
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::unavailable(format!("{err:?}"))
}
