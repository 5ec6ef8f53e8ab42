//! Typed key-value storage shared by all contexts
//!
//! Mirrors the extension's local storage area: a flat JSON object with no
//! schema, where every key has exactly one logical writer. [`LocalStorage`]
//! adds typed keys on top of an injectable [`StorageBackend`].

pub mod error;
pub mod file;
pub mod memory;

pub use error::StorageError;
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

use crate::models::RepoInfo;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

/// Server URL configured from the settings panel
pub const SERVER_URL: StorageKey<String> = StorageKey::new("serverUrl");

/// Last repository announced by a page script
pub const CURRENT_REPO: StorageKey<RepoInfo> = StorageKey::new("currentRepo");

/// Tab the last announcement came from
pub const TAB_ID: StorageKey<i64> = StorageKey::new("tabId");

/// Raw storage area. Implementations must be safe to share between contexts.
pub trait StorageBackend: Send + Sync {
    /// Fetch the given keys; missing keys are simply absent from the result
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError>;

    /// Merge `items` into the area in one step
    fn set(&self, items: Map<String, Value>) -> Result<(), StorageError>;

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// A storage key bound to the type stored under it
pub struct StorageKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StorageKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StorageKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StorageKey<T> {}

impl<T> std::fmt::Debug for StorageKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorageKey({})", self.name)
    }
}

/// Cloneable handle to the shared storage area
#[derive(Clone)]
pub struct LocalStorage {
    backend: Arc<dyn StorageBackend>,
}

impl LocalStorage {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// In-memory storage, used by tests and one-shot runs
    pub fn memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    /// Storage persisted to a JSON file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileBackend::new(path))
    }

    pub fn get<T: DeserializeOwned>(&self, key: StorageKey<T>) -> Result<Option<T>, StorageError> {
        let mut items = self.backend.get(&[key.name])?;

        match items.remove(key.name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StorageError::Value { key: key.name, source }),
        }
    }

    pub fn set<T: Serialize>(&self, key: StorageKey<T>, value: &T) -> Result<(), StorageError> {
        self.batch().put(key, value)?.commit()
    }

    pub fn remove<T>(&self, key: StorageKey<T>) -> Result<(), StorageError> {
        self.backend.remove(&[key.name])
    }

    /// Start a multi-key write that lands in a single backend call
    pub fn batch(&self) -> StorageBatch<'_> {
        StorageBatch {
            storage: self,
            items: Map::new(),
        }
    }
}

impl std::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStorage").finish_non_exhaustive()
    }
}

/// Pending multi-key write, see [`LocalStorage::batch`]
pub struct StorageBatch<'a> {
    storage: &'a LocalStorage,
    items: Map<String, Value>,
}

impl<'a> StorageBatch<'a> {
    pub fn put<T: Serialize>(mut self, key: StorageKey<T>, value: &T) -> Result<Self, StorageError> {
        let value = serde_json::to_value(value)
            .map_err(|source| StorageError::Value { key: key.name, source })?;
        self.items.insert(key.name.to_string(), value);
        Ok(self)
    }

    pub fn commit(self) -> Result<(), StorageError> {
        if self.items.is_empty() {
            return Ok(());
        }
        self.storage.backend.set(self.items)
    }
}
