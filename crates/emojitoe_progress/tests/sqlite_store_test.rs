//! Tests for the SQLite save store.

use emojitoe_progress::{KvStore, ProgressService, SqliteStore};
use tempfile::NamedTempFile;

/// Creates a temporary database file with migrations applied, returns the
/// file handle (must stay in scope to keep the file alive) and the store.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

#[test]
fn test_missing_key_is_none() {
    let (_db, store) = setup_test_db();
    assert_eq!(store.load("nothing").expect("Query failed"), None);
}

#[test]
fn test_save_replaces_previous_value() {
    let (_db, mut store) = setup_test_db();
    store.save("slot", "first").expect("Save failed");
    store.save("slot", "second").expect("Save failed");
    assert_eq!(
        store.load("slot").expect("Query failed").as_deref(),
        Some("second")
    );
    let slot = store.slot("slot").expect("Query failed").expect("Row exists");
    assert_eq!(slot.key(), "slot");
}

#[test]
fn test_clear_removes_key() {
    let (_db, mut store) = setup_test_db();
    store.save("slot", "value").expect("Save failed");
    store.clear("slot").expect("Clear failed");
    store.clear("slot").expect("Clearing twice is fine");
    assert_eq!(store.load("slot").expect("Query failed"), None);
}

#[test]
fn test_reopen_keeps_data_and_migrations_idempotent() {
    let (db, mut store) = setup_test_db();
    store.save("slot", "kept").expect("Save failed");

    let path = db.path().to_str().expect("Invalid path");
    let reopened = SqliteStore::open(path).expect("Reopen failed");
    assert_eq!(
        reopened.load("slot").expect("Query failed").as_deref(),
        Some("kept")
    );
}

#[test]
fn test_service_round_trip_through_sqlite() {
    let (db, store) = setup_test_db();
    let catalog = [(0u32, 12usize), (1, 12)].into_iter().collect();
    let mut service = ProgressService::load(store, catalog, 4).expect("Load failed");
    service.seed_initial_unlocks();
    service.open_bonus();
    let expected = service.payload().clone();

    let path = db.path().to_str().expect("Invalid path");
    let reopened = SqliteStore::open(path).expect("Reopen failed");
    let catalog = [(0u32, 12usize), (1, 12)].into_iter().collect();
    let service = ProgressService::load(reopened, catalog, 4).expect("Reload failed");
    assert_eq!(service.payload(), &expected);
    assert_eq!(service.ledger().total_unlocked_globally(), 9);
}
