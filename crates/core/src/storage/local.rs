use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::format::{self, StorageDocument};
use crate::errors::CoreError;

/// Durable string key/value storage (the native stand-in for browser local storage).
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove_item(&self, key: &str) -> Result<(), CoreError>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves plain data behind; keep using it.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CoreError> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CoreError> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON document on disk (native only).
///
/// Every mutation rewrites the whole document through a temporary file and
/// a rename, so a crash mid-write leaves the previous document intact.
/// Assumes a single writer.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StorageDocument, CoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => format::read_document(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StorageDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, doc: &StorageDocument) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = format::write_document(doc)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), items = doc.items.len(), "storage document written");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.read()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let _guard = lock(&self.write_lock);
        let mut doc = self.read()?;
        doc.items.insert(key.to_string(), value.to_string());
        self.write(&doc)
    }

    fn remove_item(&self, key: &str) -> Result<(), CoreError> {
        let _guard = lock(&self.write_lock);
        let mut doc = self.read()?;
        if doc.items.remove(key).is_none() {
            return Ok(());
        }
        self.write(&doc)
    }
}
