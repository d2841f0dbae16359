//! Error types for the ledger core.

use thiserror::Error;

/// Errors that can occur while building, encoding, or mining records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported value for key {key:?}: {kind}")]
    UnsupportedValue { key: String, kind: &'static str },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("difficulty {requested} out of range (max {max})")]
    InvalidDifficulty { requested: u32, max: u32 },

    #[error("mining gave up after {attempts} attempts")]
    MiningExhausted { attempts: u64 },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
