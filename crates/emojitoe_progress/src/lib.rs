//! Unlock progression and persistence for emojitoe.
//!
//! Holds the cosmetic unlock ledger, the reward rules that grow it, the
//! player/opponent profiles, and the save document they are persisted in.
//! [`ProgressService`] ties these to a [`KvStore`] backend.

#![forbid(unsafe_code)]

mod error;
mod ledger;
mod payload;
mod profile;
mod reward;
mod service;
pub mod store;

pub use error::{LedgerError, PayloadError, ProfileError, StoreError};
pub use ledger::{CategoryId, ItemView, ProgressLedger, UnlockRef, UnlockSet};
pub use payload::{CURRENT_SAVE_VERSION, SAVE_KEY, SavePayload};
pub use profile::{
    DEFAULT_OPPONENT_NAME, DEFAULT_PLAYER_NAME, EmojiRef, MAX_NAME_CHARS, OpponentProfile,
    PlayerProfile, Settings, opponent_name, sanitize_name,
};
pub use reward::{RewardEngine, RewardResult};
pub use service::ProgressService;
pub use store::{JsonFileStore, KvStore, MemoryStore, SqliteStore};
