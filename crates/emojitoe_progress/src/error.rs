//! Error types for progress and persistence.

use derive_more::{Display, Error};
use tracing::instrument;

/// Persistence failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

/// Why a stored payload could not be used.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PayloadError {
    /// The payload is not valid JSON for the current schema.
    #[display("Corrupt payload: {}", _0)]
    Corrupt(String),

    /// The payload was written by a different schema version.
    #[display("Payload version {} does not match expected {}", found, expected)]
    VersionMismatch {
        /// Version tag found in storage.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
}

impl std::error::Error for PayloadError {}

/// Rejected ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum LedgerError {
    /// No such category registered.
    #[display("Unknown category {}", _0)]
    UnknownCategory(u32),

    /// Index beyond the category's capacity.
    #[display("Item {} is out of range for category {} (capacity {})", index, category, capacity)]
    IndexOutOfRange {
        /// Category id.
        category: u32,
        /// Requested index.
        index: usize,
        /// Category capacity.
        capacity: usize,
    },
}

impl std::error::Error for LedgerError {}

/// Rejected profile edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ProfileError {
    /// The chosen emoji has not been unlocked.
    #[display("Emoji {} of category {} is locked", index, category)]
    EmojiLocked {
        /// Category id.
        category: u32,
        /// Item index.
        index: usize,
    },
}

impl std::error::Error for ProfileError {}
