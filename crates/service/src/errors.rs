use thiserror::Error;

/// Failure of the underlying key-value store.
///
/// Quota exhaustion, a disabled or missing store, and I/O failures all
/// surface as the same kind; the reason is kept for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StorageError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::StorageUnavailable(reason.into())
    }

    pub fn quota_exceeded(required: usize, quota: usize) -> Self {
        Self::StorageUnavailable(format!("quota exceeded: {required} bytes needed, {quota} allowed"))
    }

    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("{}: {err}", path.display()))
    }
}
