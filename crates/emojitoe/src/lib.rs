//! Emojitoe: tic-tac-toe against the computer with unlockable emoji.
//!
//! # Architecture
//!
//! - **Engine** ([`emojitoe_engine`]): board, rules, turn order, AI policy
//! - **Progress** ([`emojitoe_progress`]): unlock ledger, rewards, save document
//! - **Session**: one player's run of matches, result reveals, ad pacing
//!
//! # Example
//!
//! ```
//! use emojitoe::{GameConfig, MatchSession};
//! use emojitoe_progress::{MemoryStore, ProgressService};
//!
//! let config = GameConfig::default();
//! let progress = ProgressService::load(
//!     MemoryStore::new(),
//!     config.catalog(),
//!     *config.seed_unlocks_per_category(),
//! )
//! .expect("memory store never fails");
//!
//! let mut session = MatchSession::new(&config, progress, 7);
//! session.submit_move(4);
//! assert_eq!(session.board().filled(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ads;
mod config;
mod scheduler;
mod session;

pub use ads::AdPacing;
pub use config::{
    AdsConfig, CategoryConfig, ConfigError, DEFAULT_CONFIG_PATH, GameConfig, StoreBackend,
};
pub use scheduler::{Scheduler, TaskHandle};
pub use session::{MatchSession, ResultScreen};
