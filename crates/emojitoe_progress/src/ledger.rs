//! Durable record of unlocked cosmetic items.
//!
//! Unlocks only ever grow: an index once present in a category is never
//! removed, and the global sequence counter only moves on a real new unlock.

use crate::error::LedgerError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// Identifier of a cosmetic category (an emoji colour set).
pub type CategoryId = u32;

/// Unlocked indices of one category plus its capacity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct UnlockSet {
    capacity: usize,
    unlocked: BTreeSet<usize>,
}

impl UnlockSet {
    /// Creates an empty set holding up to `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            unlocked: BTreeSet::new(),
        }
    }

    /// Returns true if `index` is unlocked.
    pub fn contains(&self, index: usize) -> bool {
        self.unlocked.contains(&index)
    }

    /// Returns true when every item is unlocked.
    pub fn is_complete(&self) -> bool {
        self.unlocked.len() >= self.capacity
    }

    /// Lowest locked index, if any.
    pub fn first_locked(&self) -> Option<usize> {
        (0..self.capacity).find(|i| !self.unlocked.contains(i))
    }
}

/// Pointer to the most recent unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct UnlockRef {
    /// Position in the global unlock sequence.
    sequence: u64,
    /// Category of the item.
    category: CategoryId,
    /// Index of the item within its category.
    index: usize,
}

/// One row of a category view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemView {
    /// Item index within the category.
    pub index: usize,
    /// Whether the item is unlocked.
    pub unlocked: bool,
}

/// Per-category unlock sets and the global unlock sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressLedger {
    categories: BTreeMap<CategoryId, UnlockSet>,
    next_sequence: u64,
    last_unlocked: Option<UnlockRef>,
}

impl ProgressLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `category` or raises its capacity. Capacity never shrinks.
    #[instrument(skip(self))]
    pub fn ensure_category(&mut self, category: CategoryId, capacity: usize) {
        let set = self
            .categories
            .entry(category)
            .or_insert_with(|| UnlockSet::new(capacity));
        if set.capacity < capacity {
            debug!(old = set.capacity, new = capacity, "Raising category capacity");
            set.capacity = capacity;
        }
    }

    /// The unlock set of a category.
    pub fn category(&self, category: CategoryId) -> Option<&UnlockSet> {
        self.categories.get(&category)
    }

    /// Registered category ids in ascending order.
    pub fn category_ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.categories.keys().copied()
    }

    /// Unlocked indices of `category` in ascending order (empty if unknown).
    pub fn unlocked_indices(&self, category: CategoryId) -> Vec<usize> {
        self.categories
            .get(&category)
            .map(|set| set.unlocked.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns true if `index` of `category` is unlocked.
    pub fn is_unlocked(&self, category: CategoryId, index: usize) -> bool {
        self.categories
            .get(&category)
            .is_some_and(|set| set.contains(index))
    }

    /// Number of unlocked items across all categories.
    pub fn total_unlocked_globally(&self) -> usize {
        self.categories.values().map(|set| set.unlocked.len()).sum()
    }

    /// Sum of all category capacities.
    pub fn total_capacity(&self) -> usize {
        self.categories.values().map(|set| set.capacity).sum()
    }

    /// Returns true when every registered category is complete.
    pub fn is_fully_unlocked(&self) -> bool {
        self.categories.values().all(UnlockSet::is_complete)
    }

    /// Sequence position of the most recent unlock.
    pub fn last_unlocked_global_index(&self) -> Option<u64> {
        self.last_unlocked.map(|r| r.sequence)
    }

    /// The most recent unlock.
    pub fn last_unlocked(&self) -> Option<UnlockRef> {
        self.last_unlocked
    }

    /// Unlocks `index` of `category`.
    ///
    /// Returns `Ok(true)` on a new unlock and `Ok(false)` if the item was
    /// already unlocked, in which case nothing changes.
    ///
    /// # Errors
    ///
    /// Fails for an unregistered category or an index beyond its capacity.
    #[instrument(skip(self))]
    pub fn unlock(&mut self, category: CategoryId, index: usize) -> Result<bool, LedgerError> {
        let set = self
            .categories
            .get_mut(&category)
            .ok_or(LedgerError::UnknownCategory(category))?;

        if index >= set.capacity {
            warn!(capacity = set.capacity, "Unlock out of range");
            return Err(LedgerError::IndexOutOfRange {
                category,
                index,
                capacity: set.capacity,
            });
        }

        if !set.unlocked.insert(index) {
            debug!("Item already unlocked");
            return Ok(false);
        }

        let unlock = UnlockRef {
            sequence: self.next_sequence,
            category,
            index,
        };
        self.next_sequence += 1;
        self.last_unlocked = Some(unlock);
        info!(sequence = unlock.sequence, "Item unlocked");
        Ok(true)
    }

    /// Next item to grant: lowest category id with a locked item, lowest index within it.
    pub fn next_locked(&self) -> Option<(CategoryId, usize)> {
        self.categories
            .iter()
            .find_map(|(&id, set)| set.first_locked().map(|index| (id, index)))
    }

    /// Unlocks indices `0..count` (clamped to capacity) in every category of
    /// `capacities`, but only while the ledger holds no unlocks at all.
    ///
    /// Returns true if seeding ran. Running it again is a no-op.
    #[instrument(skip(self, capacities), fields(categories = capacities.len()))]
    pub fn seed_initial_unlocks(
        &mut self,
        capacities: &BTreeMap<CategoryId, usize>,
        count: usize,
    ) -> bool {
        if self.total_unlocked_globally() > 0 {
            debug!("Ledger already holds unlocks, seeding skipped");
            return false;
        }

        for (&category, &capacity) in capacities {
            self.ensure_category(category, capacity);
            for index in 0..count.min(capacity) {
                // Category is registered and index is within capacity.
                let _ = self.unlock(category, index);
            }
        }

        info!(total = self.total_unlocked_globally(), "Initial unlocks seeded");
        true
    }

    /// Presentation list for a category: unlocked items first, then locked,
    /// each group in ascending index order.
    #[instrument(skip(self))]
    pub fn get_sorted_for_view(&self, category: CategoryId, item_count: usize) -> Vec<ItemView> {
        let mut items: Vec<ItemView> = (0..item_count)
            .map(|index| ItemView {
                index,
                unlocked: self.is_unlocked(category, index),
            })
            .collect();
        items.sort_by_key(|item| (!item.unlocked, item.index));
        items
    }
}
