//! Error types for the ledger.

use blockverify_ledger_core::CoreError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Absence (unknown position or fingerprint) is not an error; lookups return
/// `Option`. Integrity problems are reported by `validate`/`verify`, not here.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Record construction, encoding or mining failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// The payload lacks the configured fingerprint field.
    #[error("payload is missing text field {field:?}")]
    MissingFingerprint { field: String },

    /// Configuration was rejected.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A process-wide ledger is already in place.
    #[error("process-wide ledger already initialized")]
    AlreadyInitialized,
}

impl From<std::convert::Infallible> for LedgerError {
    fn from(e: std::convert::Infallible) -> Self {
        match e {}
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
