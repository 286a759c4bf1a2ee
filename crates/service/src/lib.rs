//! Bookmarks persistence layer.
//! - `storage` holds the key-value capability and its backends.
//! - `bookmarks` holds the accessor that reads and writes the single
//!   serialized bookmarks value under a fixed key.

pub mod bookmarks;
pub mod errors;
pub mod storage;

pub use bookmarks::{BookmarksStore, BOOKMARKS_KEY};
pub use errors::StorageError;
pub use storage::KeyValueStore;
