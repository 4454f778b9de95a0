//! In-memory key-value store, used as the test fake

use crate::core::error::StorageError;
use crate::core::storage::KeyValueStore;
use std::collections::HashMap;

/// `HashMap`-backed [`KeyValueStore`]
///
/// Can be switched offline to make every call fail, and counts successful
/// writes so tests can observe persistence side effects.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
    writes: usize,
    is_offline: bool,
}

impl MemoryKv {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip between online and offline
    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Number of successful `set`/`remove` calls
    #[must_use]
    pub const fn write_count(&self) -> usize {
        self.writes
    }

    /// Whether a key holds a value
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the store holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_online(&self) -> Result<(), StorageError> {
        if self.is_offline {
            return Err(StorageError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_online()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_online()?;
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_online()?;
        self.entries.remove(key);
        self.writes += 1;
        Ok(())
    }
}
