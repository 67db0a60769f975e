//! SQLite-backed store.

use super::models::{NewSaveSlot, SaveSlot};
use super::{KvStore, schema};
use crate::error::StoreError;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Stores save slots in a SQLite database.
///
/// Each call opens its own connection. Use `":memory:"` only for throwaway
/// checks, since every connection sees a fresh in-memory database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.as_ref().to_string(),
        };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;
        info!(applied = applied.len(), "SqliteStore ready");
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Loads the full slot row, including its timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn slot(&self, key: &str) -> Result<Option<SaveSlot>, StoreError> {
        let mut conn = self.connection()?;
        let slot = schema::save_slots::table
            .find(key)
            .select(SaveSlot::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(slot)
    }
}

impl KvStore for SqliteStore {
    #[instrument(skip(self))]
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let slot = self.slot(key)?;
        debug!(found = slot.is_some(), "Slot looked up");
        Ok(slot.map(|s| s.payload().clone()))
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    fn save(&mut self, key: &str, payload: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let row = NewSaveSlot::new(
            key.to_string(),
            payload.to_string(),
            chrono::Utc::now().naive_utc(),
        );
        diesel::replace_into(schema::save_slots::table)
            .values(&row)
            .execute(&mut conn)?;
        debug!("Slot saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(schema::save_slots::table.find(key)).execute(&mut conn)?;
        debug!(removed, "Slot cleared");
        Ok(())
    }
}
