//! Tests for the progress service flush discipline and save handling.

use emojitoe_engine::{Difficulty, MatchEngine, MatchOutcome, Side};
use emojitoe_progress::{
    CURRENT_SAVE_VERSION, DEFAULT_OPPONENT_NAME, EmojiRef, KvStore, MemoryStore, ProfileError,
    ProgressService, SAVE_KEY, SavePayload, StoreError,
};
use std::collections::BTreeMap;

fn catalog() -> BTreeMap<u32, usize> {
    [(0, 6), (1, 6)].into_iter().collect()
}

fn player_win() -> MatchOutcome {
    MatchEngine::replay(Side::Player, &[0, 3, 1, 4, 2])
        .outcome()
        .expect("player wins")
}

fn stored(store: &impl KvStore) -> SavePayload {
    let raw = store
        .load(SAVE_KEY)
        .expect("store readable")
        .expect("payload present");
    SavePayload::decode(&raw).expect("payload decodes")
}

/// Memory store whose writes can be switched off.
#[derive(Debug, Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: bool,
    attempts: usize,
}

impl KvStore for FlakyStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.load(key)
    }

    fn save(&mut self, key: &str, payload: &str) -> Result<(), StoreError> {
        self.attempts += 1;
        if self.failing {
            return Err(StoreError::new("disk unavailable"));
        }
        self.inner.save(key, payload)
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.clear(key)
    }
}

#[test]
fn test_fresh_store_gets_defaults_written() {
    let service = ProgressService::load(MemoryStore::new(), catalog(), 4).expect("load");
    assert!(!service.is_dirty());
    assert_eq!(stored(service.store()), SavePayload::default());
}

#[test]
fn test_seeding_runs_once() {
    let mut service = ProgressService::load(MemoryStore::new(), catalog(), 4).expect("load");
    assert!(service.seed_initial_unlocks());
    assert_eq!(service.ledger().total_unlocked_globally(), 8);
    assert!(service.payload().first_launch_done);
    assert!(!service.seed_initial_unlocks());

    let store = service.store().clone();
    let mut reloaded = ProgressService::load(store, catalog(), 4).expect("reload");
    assert!(!reloaded.seed_initial_unlocks());
    assert_eq!(reloaded.ledger().total_unlocked_globally(), 8);
}

#[test]
fn test_foreign_version_replaced_with_defaults() {
    let mut store = MemoryStore::new();
    let mut old = SavePayload::default();
    old.version = CURRENT_SAVE_VERSION + 1;
    old.first_launch_done = true;
    store
        .save(SAVE_KEY, &old.encode().expect("encode"))
        .expect("save");

    let service = ProgressService::load(store, catalog(), 4).expect("load");
    assert_eq!(service.payload(), &SavePayload::default());
    assert_eq!(stored(service.store()).version, CURRENT_SAVE_VERSION);
}

#[test]
fn test_corrupt_payload_replaced_with_defaults() {
    let mut store = MemoryStore::new();
    store.save(SAVE_KEY, "{{{").expect("save");
    let service = ProgressService::load(store, catalog(), 4).expect("load");
    assert_eq!(stored(service.store()), SavePayload::default());
}

#[test]
fn test_win_is_persisted() {
    let mut service = ProgressService::load(MemoryStore::new(), catalog(), 4).expect("load");
    service.seed_initial_unlocks();
    let result = service.resolve_match(&player_win());
    assert!(*result.item_unlocked());
    assert_eq!(
        stored(service.store()).progress.unlocked_indices(0),
        vec![0, 1, 2, 3, 4]
    );
}

#[test]
fn test_failed_flush_stays_dirty_then_retries() {
    let mut service = ProgressService::load(FlakyStore::default(), catalog(), 4).expect("load");
    service.store_mut().failing = true;

    service.set_player_name("Zed");
    assert!(service.is_dirty());
    assert_eq!(service.player().name(), "Zed");
    assert!(service.flush().is_err());

    service.store_mut().failing = false;
    let attempts = service.store().attempts;
    service.flush().expect("flush succeeds once the store recovers");
    assert!(!service.is_dirty());
    assert_eq!(service.store().attempts, attempts + 1);
    assert_eq!(stored(service.store()).player.name(), "Zed");

    // Nothing pending, nothing written.
    service.flush().expect("clean flush");
    assert_eq!(service.store().attempts, attempts + 1);
}

#[test]
fn test_profile_edits() {
    let mut service = ProgressService::load(MemoryStore::new(), catalog(), 4).expect("load");
    service.seed_initial_unlocks();

    service.set_player_name("   ");
    assert_eq!(service.player().name(), "Player");
    service.set_player_name("Alexandria");
    assert_eq!(service.player().name(), "Alexandr");

    service.set_difficulty(Difficulty::Hard);
    assert_eq!(*stored(service.store()).opponent.difficulty(), Difficulty::Hard);

    assert_eq!(
        service.select_player_emoji(1, 5),
        Err(ProfileError::EmojiLocked {
            category: 1,
            index: 5
        })
    );
    service.select_player_emoji(1, 2).expect("unlocked emoji");
    assert_eq!(*service.player().emoji().index(), 2);

    service.update_settings(|s| s.set_music_volume(3.0));
    assert_eq!(*stored(service.store()).settings.music_volume(), 1.0);
}

#[test]
fn test_opponent_never_wears_the_player_emoji() {
    let mut service = ProgressService::load(MemoryStore::new(), catalog(), 6).expect("load");
    service.seed_initial_unlocks();
    assert_ne!(service.player().emoji(), service.opponent().emoji());

    service.select_player_emoji(1, 0).expect("unlocked emoji");
    let opponent = *service.opponent().emoji();
    assert_ne!(*service.player().emoji(), opponent);
    assert!(service.ledger().is_unlocked(*opponent.category(), *opponent.index()));
    assert_eq!(opponent, EmojiRef::new(0, 0));
    assert_eq!(*stored(service.store()).opponent.emoji(), opponent);

    // Choosing something else leaves a valid opponent where it is.
    service.select_player_emoji(0, 3).expect("unlocked emoji");
    assert_eq!(*service.opponent().emoji(), opponent);
}

#[test]
fn test_clashing_emoji_fixed_on_load() {
    let mut store = MemoryStore::new();
    let mut clash = SavePayload::default();
    clash.opponent.set_emoji(*clash.player.emoji());
    store
        .save(SAVE_KEY, &clash.encode().expect("encode"))
        .expect("save");

    let service = ProgressService::load(store, catalog(), 4).expect("load");
    assert!(!service.is_dirty());
    let saved = stored(service.store());
    assert_ne!(saved.player.emoji(), saved.opponent.emoji());
    assert_eq!(saved.opponent.emoji(), service.opponent().emoji());
}

#[test]
fn test_difficulty_renames_opponent() {
    let mut service = ProgressService::load(MemoryStore::new(), catalog(), 4).expect("load");
    assert_eq!(service.opponent().name(), DEFAULT_OPPONENT_NAME);

    service.set_difficulty(Difficulty::Hard);
    assert_eq!(service.opponent().name(), "Bobik");
    assert_eq!(stored(service.store()).opponent.name(), "Bobik");

    service.set_difficulty(Difficulty::Normal);
    let store = service.store().clone();
    let reloaded = ProgressService::load(store, catalog(), 4).expect("reload");
    assert_eq!(reloaded.opponent().name(), "Barsik");
    assert_eq!(*reloaded.opponent().difficulty(), Difficulty::Normal);
}

#[test]
fn test_reset_all_returns_to_defaults() {
    let mut service = ProgressService::load(MemoryStore::new(), catalog(), 4).expect("load");
    service.seed_initial_unlocks();
    service.open_bonus();
    service.reset_all();
    assert_eq!(stored(service.store()), SavePayload::default());
    assert!(service.seed_initial_unlocks());
}
