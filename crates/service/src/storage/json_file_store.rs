use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::StorageError;
use crate::storage::{check_quota, KeyValueStore};

/// Durable key-value namespace persisted as one JSON object on disk.
///
/// Every write rewrites the file through a temp file and a rename, so the
/// file on disk always holds either the old map or the new one. The
/// in-memory map is only updated after the file was replaced.
#[derive(Debug)]
pub struct JsonFileStore {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
    quota: Option<usize>,
}

impl JsonFileStore {
    /// Open the store at `path`. Creates the file with an empty map if missing.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        Self::open_with_quota(path, None)
    }

    pub fn open_with_quota<P: Into<PathBuf>>(path: P, quota: Option<usize>) -> Result<Self, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let map: HashMap<String, String> = match fs::read(&file_path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    let moved_to = quarantine(&file_path)?;
                    warn!(
                        path = %file_path.display(),
                        moved_to = %moved_to.display(),
                        error = %e,
                        "store file is not a JSON string map; moved aside, starting empty"
                    );
                    let empty = HashMap::new();
                    write_atomically(&file_path, &empty)?;
                    empty
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = HashMap::new();
                write_atomically(&file_path, &empty)?;
                empty
            }
            Err(e) => return Err(StorageError::io(&file_path, e)),
        };

        debug!(path = %file_path.display(), entries = map.len(), "json file store opened");
        Ok(Self { inner: RwLock::new(map), file_path, quota })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::unavailable("file store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::unavailable("file store lock poisoned"))?;
        check_quota(&map, key, value, self.quota)?;

        let mut next = map.clone();
        next.insert(key.to_string(), value.to_string());
        write_atomically(&self.file_path, &next)?;
        *map = next;
        Ok(())
    }
}

/// `<path><suffix>`, next to the store file.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Keep an unreadable store file for manual recovery instead of overwriting it.
fn quarantine(path: &Path) -> Result<PathBuf, StorageError> {
    let target = sibling(path, &format!(".corrupt-{}", Uuid::new_v4()));
    fs::rename(path, &target).map_err(|e| StorageError::io(path, e))?;
    Ok(target)
}

fn write_atomically(path: &Path, map: &HashMap<String, String>) -> Result<(), StorageError> {
    let data = serde_json::to_vec(map).map_err(|e| StorageError::unavailable(e.to_string()))?;
    let tmp = sibling(path, ".tmp");

    if let Err(e) = write_synced(&tmp, &data) {
        let _ = fs::remove_file(&tmp);
        return Err(StorageError::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StorageError::io(path, e));
    }
    sync_parent(path);
    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Flush the directory entry so the rename survives a crash.
#[cfg(unix)]
fn sync_parent(path: &Path) {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => Path::new("."),
    };
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        warn!(dir = %dir.display(), error = %e, "could not sync store directory");
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) {}
