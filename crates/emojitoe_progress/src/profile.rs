//! Player and opponent profiles plus audio/haptic settings.

use crate::ledger::CategoryId;
use derive_getters::Getters;
use derive_new::new;
use emojitoe_engine::Difficulty;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Name used when the player leaves theirs blank.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Name of the computer opponent at its default tier.
pub const DEFAULT_OPPONENT_NAME: &str = "Bambik";

/// Longest accepted player name, in characters.
pub const MAX_NAME_CHARS: usize = 8;

/// Name the opponent goes by at each tier.
pub fn opponent_name(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => DEFAULT_OPPONENT_NAME,
        Difficulty::Normal => "Barsik",
        Difficulty::Hard => "Bobik",
    }
}

/// Reference to one cosmetic item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Getters, new)]
pub struct EmojiRef {
    category: CategoryId,
    index: usize,
}

/// The human player's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerProfile {
    name: String,
    emoji: EmojiRef,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYER_NAME.to_string(),
            emoji: EmojiRef::new(0, 0),
        }
    }
}

impl PlayerProfile {
    /// Sets the name after [`sanitize_name`].
    pub fn set_name(&mut self, raw: &str) {
        self.name = sanitize_name(raw);
    }

    /// Sets the chosen emoji. Unlock checks belong to the caller.
    pub fn set_emoji(&mut self, emoji: EmojiRef) {
        self.emoji = emoji;
    }
}

/// The computer opponent's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct OpponentProfile {
    name: String,
    difficulty: Difficulty,
    emoji: EmojiRef,
}

impl Default for OpponentProfile {
    fn default() -> Self {
        Self {
            name: opponent_name(Difficulty::Easy).to_string(),
            difficulty: Difficulty::Easy,
            emoji: EmojiRef::new(1, 0),
        }
    }
}

impl OpponentProfile {
    /// Sets the AI tier and the name that goes with it.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.name = opponent_name(difficulty).to_string();
    }

    /// Sets the opponent's emoji. Keeping it apart from the player's belongs
    /// to the caller.
    pub fn set_emoji(&mut self, emoji: EmojiRef) {
        self.emoji = emoji;
    }
}

/// Audio and haptic preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct Settings {
    music_enabled: bool,
    music_volume: f32,
    sfx_enabled: bool,
    sfx_volume: f32,
    vibration_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            music_volume: 1.0,
            sfx_enabled: true,
            sfx_volume: 1.0,
            vibration_enabled: true,
        }
    }
}

impl Settings {
    /// Turns music on or off.
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
    }

    /// Sets music volume, clamped to `[0, 1]`.
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
    }

    /// Turns sound effects on or off.
    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.sfx_enabled = enabled;
    }

    /// Sets effects volume, clamped to `[0, 1]`.
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = clamp_volume(volume);
    }

    /// Turns vibration on or off.
    pub fn set_vibration_enabled(&mut self, enabled: bool) {
        self.vibration_enabled = enabled;
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Trims `raw`, falls back to [`DEFAULT_PLAYER_NAME`] when blank, and keeps
/// at most [`MAX_NAME_CHARS`] characters.
#[instrument]
pub fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        debug!("Blank name replaced with default");
        return DEFAULT_PLAYER_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_CHARS).collect()
}
