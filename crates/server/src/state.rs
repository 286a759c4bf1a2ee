use std::sync::Arc;

use service::{storage::SharedStore, BookmarksStore};

/// Shared handler state. The store is synchronous; handlers move calls
/// onto the blocking pool.
#[derive(Clone)]
pub struct AppState {
    pub bookmarks: Arc<BookmarksStore<SharedStore>>,
}

impl AppState {
    pub fn new(backend: SharedStore) -> Self {
        Self { bookmarks: Arc::new(BookmarksStore::new(backend)) }
    }
}
