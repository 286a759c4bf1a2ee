use tracing::{debug, warn};

use crate::errors::StorageError;
use crate::storage::KeyValueStore;

/// Key the serialized bookmarks live under.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Reads and writes the serialized bookmarks string.
///
/// The value is opaque: it is stored and returned byte for byte, never
/// parsed. A value that was never written reads back as `""`, the same as a
/// stored empty string.
#[derive(Debug, Clone)]
pub struct BookmarksStore<S> {
    backend: S,
}

impl<S: KeyValueStore> BookmarksStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Replace the stored bookmarks. Backend failures are returned as is.
    pub fn save(&self, serialized: &str) -> Result<(), StorageError> {
        self.backend.set_item(BOOKMARKS_KEY, serialized)?;
        debug!(bytes = serialized.len(), "bookmarks saved");
        Ok(())
    }

    /// Stored bookmarks, or `""` when nothing is stored or the read failed.
    pub fn load(&self) -> String {
        match self.backend.get_item(BOOKMARKS_KEY) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "bookmarks read failed; returning empty");
                String::new()
            }
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}
