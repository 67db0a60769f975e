//! The single persisted save document.

use crate::error::PayloadError;
use crate::ledger::ProgressLedger;
use crate::profile::{OpponentProfile, PlayerProfile, Settings};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Storage key of the save document.
pub const SAVE_KEY: &str = "save_payload";

/// Schema version written by this build.
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// Everything the game persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    /// Schema version tag.
    pub version: u32,
    /// Human player profile.
    pub player: PlayerProfile,
    /// Computer opponent profile.
    pub opponent: OpponentProfile,
    /// Unlock ledger.
    pub progress: ProgressLedger,
    /// Audio and haptic settings.
    pub settings: Settings,
    /// Whether first-launch seeding already ran.
    pub first_launch_done: bool,
}

impl Default for SavePayload {
    fn default() -> Self {
        Self {
            version: CURRENT_SAVE_VERSION,
            player: PlayerProfile::default(),
            opponent: OpponentProfile::default(),
            progress: ProgressLedger::default(),
            settings: Settings::default(),
            first_launch_done: false,
        }
    }
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl SavePayload {
    /// Parses a stored document.
    ///
    /// The version tag is checked before the body, so a document from another
    /// schema is reported as a mismatch rather than as corrupt.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] for unparsable JSON or a foreign version.
    #[instrument(skip(raw), fields(bytes = raw.len()))]
    pub fn decode(raw: &str) -> Result<Self, PayloadError> {
        let header: VersionHeader = serde_json::from_str(raw).map_err(|e| {
            warn!(error = %e, "Save payload has no readable version");
            PayloadError::Corrupt(e.to_string())
        })?;

        if header.version != CURRENT_SAVE_VERSION {
            warn!(found = header.version, "Save payload version mismatch");
            return Err(PayloadError::VersionMismatch {
                found: header.version,
                expected: CURRENT_SAVE_VERSION,
            });
        }

        let payload = serde_json::from_str(raw).map_err(|e| {
            warn!(error = %e, "Save payload body unreadable");
            PayloadError::Corrupt(e.to_string())
        })?;
        debug!("Save payload decoded");
        Ok(payload)
    }

    /// Serializes to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
