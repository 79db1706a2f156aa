//! Durable key-value storage and favorites persistence.

use crate::config::FAVORITES_STORAGE_KEY;
use crate::error::{AppError, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// String-keyed durable storage, in the shape of a browser's local storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Volatile store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the favorites id list. Never fails the caller.
#[derive(Clone)]
pub struct FavoritesStore {
    backend: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Favorites backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Loads the stored ids; any read or parse failure yields an empty list.
    pub fn load(&self) -> Vec<String> {
        let raw = match self.backend.get_item(FAVORITES_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored favorites yet");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to load favorites: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                debug!("Loaded {} favorite(s)", ids.len());
                ids
            }
            Err(e) => {
                warn!("Failed to parse stored favorites: {}", e);
                Vec::new()
            }
        }
    }

    /// Writes the ids back; failures are logged and swallowed.
    pub fn save(&self, ids: &[String]) {
        let encoded = match serde_json::to_string(ids) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to serialize favorites: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set_item(FAVORITES_STORAGE_KEY, &encoded) {
            warn!("Failed to save favorites: {}", e);
        }
    }
}
