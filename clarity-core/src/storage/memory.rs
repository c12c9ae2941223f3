use std::collections::HashMap;
use std::sync::RwLock;

use super::{DocumentStorage, StorageError, StorageKey};

/// In-memory storage. Nothing outlives the process.
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStorage for MemoryStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.values.write().unwrap_or_else(|e| e.into_inner()).remove(&key);
        Ok(())
    }
}
