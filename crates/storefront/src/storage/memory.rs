//! In-memory client storage.

use std::collections::BTreeMap;

use super::{ClientStorage, StorageError};

/// Client storage that lives only as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}
