//! Progress and profile business logic layer.

use crate::error::{ProfileError, StoreError};
use crate::ledger::{CategoryId, ProgressLedger};
use crate::payload::{SAVE_KEY, SavePayload};
use crate::profile::{EmojiRef, OpponentProfile, PlayerProfile, Settings, opponent_name};
use crate::reward::{RewardEngine, RewardResult};
use crate::store::KvStore;
use emojitoe_engine::{Difficulty, MatchOutcome};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Service layer over the save document.
///
/// Wraps a [`KvStore`] with the reward rules and profile edits. Every
/// mutation is followed by a flush; a failed flush keeps the in-memory
/// document as the pending truth and the next flush retries it.
#[derive(Debug)]
pub struct ProgressService<S: KvStore> {
    store: S,
    payload: SavePayload,
    rewards: RewardEngine,
    seed_count: usize,
    dirty: bool,
}

impl<S: KvStore> ProgressService<S> {
    /// Loads the save document from `store`.
    ///
    /// A missing, corrupt or foreign-version document is replaced by
    /// defaults, which are written back immediately. The opponent's name and
    /// emoji are brought in line with its tier and the player's emoji.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the store cannot be read.
    #[instrument(skip(store, catalog), fields(categories = catalog.len()))]
    pub fn load(
        store: S,
        catalog: BTreeMap<CategoryId, usize>,
        seed_count: usize,
    ) -> Result<Self, StoreError> {
        let stored = store.load(SAVE_KEY)?;
        let (payload, replaced) = match stored.as_deref().map(SavePayload::decode) {
            Some(Ok(payload)) => {
                debug!("Existing save loaded");
                (payload, false)
            }
            Some(Err(e)) => {
                warn!(error = %e, "Discarding stored save");
                (SavePayload::default(), true)
            }
            None => {
                info!("No save found, starting fresh");
                (SavePayload::default(), true)
            }
        };

        let mut service = Self {
            store,
            payload,
            rewards: RewardEngine::new(catalog),
            seed_count,
            dirty: replaced,
        };
        let renamed = service.sync_opponent_name();
        let moved = service.ensure_valid_opponent_emoji().is_some();
        if replaced || renamed || moved {
            service.commit();
        }
        Ok(service)
    }

    /// Writes the document if it has unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or writing fails; the service
    /// stays dirty.
    #[instrument(skip(self), fields(dirty = self.dirty))]
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let raw = self.payload.encode()?;
        match self.store.save(SAVE_KEY, &raw) {
            Ok(()) => {
                self.dirty = false;
                info!(bytes = raw.len(), "Save flushed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Flush failed, keeping changes pending");
                Err(e)
            }
        }
    }

    fn commit(&mut self) {
        self.dirty = true;
        // Failure is logged by flush and retried on the next one.
        let _ = self.flush();
    }

    /// Grants the first-launch unlocks.
    ///
    /// Runs only when first launch has not been recorded and the ledger is
    /// empty. Returns true if it ran.
    #[instrument(skip(self))]
    pub fn seed_initial_unlocks(&mut self) -> bool {
        if self.payload.first_launch_done {
            debug!("First launch already recorded");
            return false;
        }
        if !self
            .payload
            .progress
            .seed_initial_unlocks(self.rewards.catalog(), self.seed_count)
        {
            return false;
        }
        self.payload.first_launch_done = true;
        self.ensure_valid_opponent_emoji();
        self.commit();
        true
    }

    /// Applies the reward rules to a finished match.
    #[instrument(skip(self), fields(outcome = %outcome))]
    pub fn resolve_match(&mut self, outcome: &MatchOutcome) -> RewardResult {
        let result = self
            .rewards
            .on_match_resolved(&mut self.payload.progress, outcome);
        if *result.item_unlocked() {
            self.commit();
        }
        result
    }

    /// Opens a bonus reward.
    #[instrument(skip(self))]
    pub fn open_bonus(&mut self) -> RewardResult {
        let result = self.rewards.on_bonus_opened(&mut self.payload.progress);
        if *result.item_unlocked() {
            self.commit();
        }
        result
    }

    /// Renames the player. See [`crate::sanitize_name`].
    #[instrument(skip(self))]
    pub fn set_player_name(&mut self, name: &str) {
        self.payload.player.set_name(name);
        info!(name = %self.payload.player.name(), "Player renamed");
        self.commit();
    }

    /// Changes the opponent tier. The opponent takes the tier's name.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.payload.opponent.set_difficulty(difficulty);
        info!(%difficulty, name = %self.payload.opponent.name(), "Difficulty changed");
        self.commit();
    }

    /// Chooses the player's emoji.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::EmojiLocked`] if the item is not unlocked.
    #[instrument(skip(self))]
    pub fn select_player_emoji(
        &mut self,
        category: CategoryId,
        index: usize,
    ) -> Result<(), ProfileError> {
        if !self.payload.progress.is_unlocked(category, index) {
            warn!("Locked emoji selected");
            return Err(ProfileError::EmojiLocked { category, index });
        }
        self.payload.player.set_emoji(EmojiRef::new(category, index));
        self.ensure_valid_opponent_emoji();
        self.commit();
        Ok(())
    }

    /// Moves the opponent off the player's emoji, and onto an unlocked one
    /// once anything is unlocked.
    ///
    /// The replacement is the first eligible item by category then index.
    /// Returns it if the opponent changed; the caller commits. With no
    /// eligible item the opponent is left as is.
    #[instrument(skip(self))]
    pub fn ensure_valid_opponent_emoji(&mut self) -> Option<EmojiRef> {
        let player = *self.payload.player.emoji();
        let ledger = &self.payload.progress;
        let any_unlocked = ledger.total_unlocked_globally() > 0;
        let valid = |emoji: &EmojiRef| {
            *emoji != player
                && (!any_unlocked || ledger.is_unlocked(*emoji.category(), *emoji.index()))
        };
        if valid(self.payload.opponent.emoji()) {
            return None;
        }

        let replacement = self
            .rewards
            .catalog()
            .iter()
            .flat_map(|(&category, &capacity)| {
                (0..capacity).map(move |index| EmojiRef::new(category, index))
            })
            .find(|emoji| valid(emoji));
        match replacement {
            Some(emoji) => {
                info!(?emoji, "Opponent emoji reassigned");
                self.payload.opponent.set_emoji(emoji);
                Some(emoji)
            }
            None => {
                warn!("No emoji left for the opponent");
                None
            }
        }
    }

    fn sync_opponent_name(&mut self) -> bool {
        let difficulty = *self.payload.opponent.difficulty();
        if self.payload.opponent.name() == opponent_name(difficulty) {
            return false;
        }
        debug!(%difficulty, "Opponent name realigned with tier");
        self.payload.opponent.set_difficulty(difficulty);
        true
    }

    /// Edits the settings in place.
    #[instrument(skip(self, edit))]
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut Settings)) {
        edit(&mut self.payload.settings);
        debug!(settings = ?self.payload.settings, "Settings updated");
        self.commit();
    }

    /// Discards all progress and profiles.
    #[instrument(skip(self))]
    pub fn reset_all(&mut self) {
        info!("Resetting save");
        self.payload = SavePayload::default();
        self.commit();
    }

    /// The in-memory document.
    pub fn payload(&self) -> &SavePayload {
        &self.payload
    }

    /// The unlock ledger.
    pub fn ledger(&self) -> &ProgressLedger {
        &self.payload.progress
    }

    /// The player profile.
    pub fn player(&self) -> &PlayerProfile {
        &self.payload.player
    }

    /// The opponent profile.
    pub fn opponent(&self) -> &OpponentProfile {
        &self.payload.opponent
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.payload.settings
    }

    /// The reward rules.
    pub fn rewards(&self) -> &RewardEngine {
        &self.rewards
    }

    /// Whether changes are waiting for a successful flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
