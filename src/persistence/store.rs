//! Store implementations

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, PersistenceError, StoredValue};

/// Volatile store; also the fallback when no save file can be used
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&StoredValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<StoredValue> {
        self.values.remove(key)
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Store persisted as one JSON document
///
/// Writes go to a temp file first and are renamed over the save, so a crash
/// mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, StoredValue>,
    dirty: bool,
}

impl JsonFileStore {
    /// Open (or start) a save file. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            let values: BTreeMap<String, StoredValue> = serde_json::from_str(&json)?;
            log::info!("Loaded {} saved values from {:?}", values.len(), path);
            values
        } else {
            log::info!("No save file at {:?}, starting fresh", path);
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// Open, or fall back to an empty store if the file is unreadable
    pub fn open_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Ignoring unreadable save file {:?}: {}", path, e);
                Self {
                    path: path.to_path_buf(),
                    values: BTreeMap::new(),
                    dirty: false,
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<&StoredValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn remove(&mut self, key: &str) -> Option<StoredValue> {
        let removed = self.values.remove(key);
        self.dirty |= removed.is_some();
        removed
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        self.dirty = false;
        log::debug!("Saved {} values to {:?}", self.values.len(), self.path);
        Ok(())
    }
}
