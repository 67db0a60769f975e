//! Key-value persistence collaborators.
//!
//! The game stores a single JSON document, so every backend only needs to
//! map a string key to a string payload.

mod json_file;
mod memory;
mod models;
mod schema;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{NewSaveSlot, SaveSlot};
pub use sqlite::SqliteStore;

use crate::error::StoreError;

/// String key-value storage.
pub trait KvStore {
    /// Returns the payload stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `payload` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn save(&mut self, key: &str, payload: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn clear(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, payload: &str) -> Result<(), StoreError> {
        (**self).save(key, payload)
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).clear(key)
    }
}
