//! Errors raised by the auxiliary sinks.
//!
//! The order pipeline never propagates these; it logs them and reports the
//! sink name back to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// File could not be created, read or replaced.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Archive record could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ledger row could not be encoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        LedgerError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
