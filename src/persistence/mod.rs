//! Save/load of small scalar settings
//!
//! Features:
//! - Typed values (int, float, bool, string) under string keys
//! - In-memory and JSON-file backed stores
//! - Text field parsing that rejects bad input without touching stored data

pub mod fields;
pub mod store;

pub use fields::{FieldError, SaveProbe};
pub use store::{JsonFileStore, MemoryStore};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known keys
pub mod keys {
    pub const CURRENT_LEVEL: &str = "CurrentLevel";
    pub const MUSIC_VOLUME: &str = "MusicVolume";
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    Int(i64),
    Float(f32),
    Bool(bool),
    Str(String),
}

/// Backing storage for save data
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&StoredValue>;
    fn set(&mut self, key: &str, value: StoredValue);
    fn remove(&mut self, key: &str) -> Option<StoredValue>;
    /// Write pending changes to the medium (no-op for memory)
    fn flush(&mut self) -> Result<(), PersistenceError>;
}

/// Conversion between Rust scalars and stored values
pub trait Storable: Sized {
    fn to_stored(self) -> StoredValue;
    fn from_stored(value: &StoredValue) -> Option<Self>;
}

impl Storable for i32 {
    fn to_stored(self) -> StoredValue {
        StoredValue::Int(self as i64)
    }
    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Int(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl Storable for usize {
    fn to_stored(self) -> StoredValue {
        StoredValue::Int(self as i64)
    }
    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Int(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl Storable for f32 {
    fn to_stored(self) -> StoredValue {
        StoredValue::Float(self)
    }
    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Float(v) => Some(*v),
            StoredValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl Storable for bool {
    fn to_stored(self) -> StoredValue {
        StoredValue::Bool(self)
    }
    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl Storable for String {
    fn to_stored(self) -> StoredValue {
        StoredValue::Str(self)
    }
    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Read `key`, falling back to `default` when absent or of another type
pub fn load_data<T: Storable>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.get(key) {
        Some(value) => T::from_stored(value).unwrap_or_else(|| {
            log::warn!("Stored `{}` has unexpected type {:?}, using default", key, value);
            default
        }),
        None => default,
    }
}

/// Write `key` and flush; a failed flush is logged, the in-memory value stays
pub fn save_data<T: Storable>(store: &mut dyn KeyValueStore, key: &str, value: T) {
    store.set(key, value.to_stored());
    if let Err(e) = store.flush() {
        log::error!("Failed to persist `{}`: {}", key, e);
    }
}

/// Remove `key` and flush
pub fn clear_data(store: &mut dyn KeyValueStore, key: &str) {
    store.remove(key);
    if let Err(e) = store.flush() {
        log::error!("Failed to persist removal of `{}`: {}", key, e);
    }
}
