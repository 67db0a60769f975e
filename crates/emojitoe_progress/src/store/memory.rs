//! Process-local store.

use super::KvStore;
use crate::error::StoreError;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    #[instrument(skip(self))]
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    fn save(&mut self, key: &str, payload: &str) -> Result<(), StoreError> {
        debug!("Saving to memory");
        self.entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    #[instrument(skip(self))]
    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
