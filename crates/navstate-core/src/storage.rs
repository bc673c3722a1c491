//! Session-storage backends.
//!
//! The engine keeps its whole state in one key of a session-scoped
//! key/value store (plus one auxiliary key for the source pointer's id).
//! [`MemoryStorage`] is used in-process and by tests; [`FileStorage`] keeps
//! a session alive across CLI invocations.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use navstate_model::{StorageError, StorageResult};

/// Minimal key/value interface of browser-style session storage.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

/// In-memory storage that counts mutating calls.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key without counting it as a write.
    #[must_use]
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    /// Number of `set_item`/`remove_item` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.writes += 1;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.writes += 1;
        self.items.remove(key);
        Ok(())
    }
}

/// Session storage backed by a JSON object file.
///
/// Every mutation rewrites the file atomically (temp file + rename).
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open a storage file. A missing or corrupt file is an empty storage.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let items = match read_items(&path) {
            Ok(items) => items,
            Err(StorageError::Corrupt { path, source }) => {
                tracing::warn!(
                    "Ignoring corrupt session file {}: {}",
                    path.display(),
                    source
                );
                BTreeMap::new()
            }
            Err(error) => return Err(error),
        };
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    fn flush(&self) -> StorageResult<()> {
        let content =
            serde_json::to_string_pretty(&self.items).map_err(StorageError::Serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                operation: "create directory for",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|e| StorageError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(content.as_bytes())
            .map_err(|e| StorageError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })?;
        file.sync_all().map_err(|e| StorageError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| StorageError::Io {
            operation: "replace",
            path: self.path.clone(),
            source: e,
        })?;

        tracing::trace!("Flushed session storage to {}", self.path.display());
        Ok(())
    }
}

fn read_items(path: &Path) -> StorageResult<BTreeMap<String, String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(StorageError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
