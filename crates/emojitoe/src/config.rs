//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use emojitoe_engine::Side;
use emojitoe_progress::{
    CategoryId, JsonFileStore, KvStore, MemoryStore, ProgressService, SqliteStore, StoreError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "emojitoe.toml";

/// Where the save document lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite database at `save_path`.
    #[default]
    #[display("sqlite")]
    Sqlite,
    /// JSON file at `save_path`.
    #[display("json")]
    Json,
    /// Nothing survives the process.
    #[display("memory")]
    Memory,
}

/// One emoji set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CategoryConfig {
    /// Category id.
    id: CategoryId,
    /// Number of items in the set.
    capacity: usize,
}

impl CategoryConfig {
    /// Creates a category entry.
    pub fn new(id: CategoryId, capacity: usize) -> Self {
        Self { id, capacity }
    }
}

/// Interstitial pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AdsConfig {
    /// Fewest finished matches between interstitials.
    #[serde(default = "default_matches_per_ad_min")]
    matches_per_ad_min: u32,
    /// Most finished matches between interstitials.
    #[serde(default = "default_matches_per_ad_max")]
    matches_per_ad_max: u32,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            matches_per_ad_min: default_matches_per_ad_min(),
            matches_per_ad_max: default_matches_per_ad_max(),
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameConfig {
    /// Save location for the file-backed stores.
    #[serde(default = "default_save_path")]
    save_path: String,

    /// Persistence backend.
    #[serde(default)]
    store: StoreBackend,

    /// Emoji sets available for unlocking.
    #[serde(default = "default_categories")]
    categories: Vec<CategoryConfig>,

    /// Items unlocked per category on first launch.
    #[serde(default = "default_seed_unlocks")]
    seed_unlocks_per_category: usize,

    /// Pause before a draw result is shown, in milliseconds.
    #[serde(default = "default_draw_reveal_delay_ms")]
    draw_reveal_delay_ms: u64,

    /// Time a result screen ignores dismissal, in milliseconds.
    #[serde(default = "default_popup_block_ms")]
    popup_block_ms: u64,

    /// Interstitial pacing.
    #[serde(default)]
    ads: AdsConfig,

    /// Whether the player opens each match.
    #[serde(default = "default_player_moves_first")]
    player_moves_first: bool,
}

fn default_save_path() -> String {
    "emojitoe.db".to_string()
}

fn default_categories() -> Vec<CategoryConfig> {
    (0..4).map(|id| CategoryConfig::new(id, 12)).collect()
}

fn default_seed_unlocks() -> usize {
    4
}

fn default_draw_reveal_delay_ms() -> u64 {
    800
}

fn default_popup_block_ms() -> u64 {
    300
}

fn default_matches_per_ad_min() -> u32 {
    2
}

fn default_matches_per_ad_max() -> u32 {
    3
}

fn default_player_moves_first() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            store: StoreBackend::default(),
            categories: default_categories(),
            seed_unlocks_per_category: default_seed_unlocks(),
            draw_reveal_delay_ms: default_draw_reveal_delay_ms(),
            popup_block_ms: default_popup_block_ms(),
            ads: AdsConfig::default(),
            player_moves_first: default_player_moves_first(),
        }
    }
}

impl GameConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed TOML or inconsistent values.
    #[instrument(skip(content), fields(bytes = content.len()))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(store = %config.store, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path`, or defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::metadata(path.as_ref()) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config file, using defaults");
                Ok(Self::default())
            }
            _ => Self::from_file(path),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let min = self.ads.matches_per_ad_min;
        let max = self.ads.matches_per_ad_max;
        if min == 0 || min > max {
            return Err(ConfigError::new(format!(
                "Invalid ad pacing range {}..={}",
                min, max
            )));
        }
        let mut seen = std::collections::BTreeSet::new();
        if let Some(dup) = self.categories.iter().find(|c| !seen.insert(c.id)) {
            return Err(ConfigError::new(format!(
                "Category {} listed more than once",
                dup.id
            )));
        }
        Ok(())
    }

    /// Category id to item count.
    pub fn catalog(&self) -> BTreeMap<CategoryId, usize> {
        self.categories.iter().map(|c| (c.id, c.capacity)).collect()
    }

    /// Pause before a draw result is shown.
    pub fn draw_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.draw_reveal_delay_ms)
    }

    /// Time a result screen ignores dismissal.
    pub fn popup_block(&self) -> Duration {
        Duration::from_millis(self.popup_block_ms)
    }

    /// Side that opens each match.
    pub fn first_side(&self) -> Side {
        if self.player_moves_first {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    /// Overrides the persistence backend.
    pub fn with_store(mut self, store: StoreBackend, save_path: impl Into<String>) -> Self {
        self.store = store;
        self.save_path = save_path.into();
        self
    }

    /// Opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the SQLite database cannot be opened.
    #[instrument(skip(self), fields(store = %self.store, path = %self.save_path))]
    pub fn open_store(&self) -> Result<Box<dyn KvStore>, StoreError> {
        let store: Box<dyn KvStore> = match self.store {
            StoreBackend::Sqlite => Box::new(SqliteStore::open(&self.save_path)?),
            StoreBackend::Json => Box::new(JsonFileStore::new(&self.save_path)),
            StoreBackend::Memory => Box::new(MemoryStore::new()),
        };
        Ok(store)
    }

    /// Opens the configured store, loads the save and grants first-launch
    /// unlocks if they are still owed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be opened or read.
    #[instrument(skip(self))]
    pub fn open_progress(&self) -> Result<ProgressService<Box<dyn KvStore>>, StoreError> {
        let store = self.open_store()?;
        let mut progress =
            ProgressService::load(store, self.catalog(), self.seed_unlocks_per_category)?;
        if progress.seed_initial_unlocks() {
            info!("First launch unlocks granted");
        }
        Ok(progress)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
