//! Reward decisions on match resolution and bonus openings.

use crate::ledger::{CategoryId, ProgressLedger, UnlockRef};
use derive_getters::Getters;
use emojitoe_engine::{MatchOutcome, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// What a reward attempt produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct RewardResult {
    /// A new item was unlocked.
    item_unlocked: bool,
    /// Every item is unlocked after this attempt.
    all_items_unlocked: bool,
    /// The unlocked item, when `item_unlocked` is true.
    unlocked: Option<UnlockRef>,
}

impl RewardResult {
    /// Result that unlocked nothing.
    pub fn nothing(all_items_unlocked: bool) -> Self {
        Self {
            item_unlocked: false,
            all_items_unlocked,
            unlocked: None,
        }
    }
}

/// Grants one locked item per player win or bonus opening.
///
/// Items are granted sequentially: lowest category id with a locked item,
/// lowest locked index within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardEngine {
    catalog: BTreeMap<CategoryId, usize>,
}

impl RewardEngine {
    /// Creates an engine over `catalog` (category id to item count).
    #[instrument(skip(catalog), fields(categories = catalog.len()))]
    pub fn new(catalog: BTreeMap<CategoryId, usize>) -> Self {
        debug!("Creating RewardEngine");
        Self { catalog }
    }

    /// Category id to item count.
    pub fn catalog(&self) -> &BTreeMap<CategoryId, usize> {
        &self.catalog
    }

    /// Rewards a finished match. Only a player win unlocks anything.
    #[instrument(skip(self, ledger), fields(outcome = %outcome))]
    pub fn on_match_resolved(
        &self,
        ledger: &mut ProgressLedger,
        outcome: &MatchOutcome,
    ) -> RewardResult {
        if outcome.winner() != Some(Side::Player) {
            debug!("No reward for this outcome");
            return RewardResult::nothing(self.all_unlocked(ledger));
        }
        self.grant(ledger)
    }

    /// Rewards a bonus opening, independent of any match.
    #[instrument(skip(self, ledger))]
    pub fn on_bonus_opened(&self, ledger: &mut ProgressLedger) -> RewardResult {
        self.grant(ledger)
    }

    fn all_unlocked(&self, ledger: &ProgressLedger) -> bool {
        self.catalog.iter().all(|(&category, &capacity)| {
            ledger.unlocked_indices(category).len() >= capacity
        }) && ledger.is_fully_unlocked()
    }

    fn grant(&self, ledger: &mut ProgressLedger) -> RewardResult {
        for (&category, &capacity) in &self.catalog {
            ledger.ensure_category(category, capacity);
        }

        let Some((category, index)) = ledger.next_locked() else {
            info!("Everything already unlocked");
            return RewardResult::nothing(true);
        };

        match ledger.unlock(category, index) {
            Ok(true) => {
                let all = self.all_unlocked(ledger);
                info!(category, index, all_unlocked = all, "Reward granted");
                RewardResult {
                    item_unlocked: true,
                    all_items_unlocked: all,
                    unlocked: ledger.last_unlocked(),
                }
            }
            Ok(false) => RewardResult::nothing(self.all_unlocked(ledger)),
            Err(e) => {
                warn!(error = %e, "Reward unlock rejected");
                RewardResult::nothing(self.all_unlocked(ledger))
            }
        }
    }
}
