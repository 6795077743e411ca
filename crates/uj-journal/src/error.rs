//! Error types for uj-journal

use thiserror::Error;
use uj_core::CoreError;
use uj_db::DbError;

/// Journal operation errors
#[derive(Error, Debug)]
pub enum JournalError {
    /// Backend error from create/alter/insert/update/select (J001)
    #[error("[J001] Journal database operation failed: {0}")]
    Db(#[from] DbError),

    /// Invalid journal configuration or table descriptor (J002)
    #[error("[J002] Journal configuration invalid: {0}")]
    Core(#[from] CoreError),

    /// Operation not offered by this journal variant (J003)
    #[error("[J003] {operation} is not supported by the {journal} journal")]
    Unsupported {
        journal: &'static str,
        operation: &'static str,
    },

    /// Explicit batch number below 1 (J004)
    #[error("[J004] Invalid batch number {0}: batches start at 1")]
    InvalidBatchNumber(i64),

    /// Journal row that could not be decoded (J005)
    #[error("[J005] Unreadable journal record: {0}")]
    InvalidRecord(String),
}

/// Result type alias for JournalError
pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    /// Whether the journal variant lacks this capability, as opposed to a
    /// backend failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, JournalError::Unsupported { .. })
    }

    /// The backend error, when this is one.
    pub fn as_db_error(&self) -> Option<&DbError> {
        match self {
            JournalError::Db(e) => Some(e),
            _ => None,
        }
    }
}
