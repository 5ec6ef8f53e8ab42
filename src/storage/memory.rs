//! In-memory storage backend

use super::{StorageBackend, StorageError};
use serde_json::{Map, Value};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<Map<String, Value>>,
}

impl MemoryBackend {
    pub fn new(items: Map<String, Value>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;

        Ok(keys
            .iter()
            .filter_map(|key| items.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    fn set(&self, new_items: Map<String, Value>) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.extend(new_items);
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }
}
