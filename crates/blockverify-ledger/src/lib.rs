//! # BlockVerify Ledger
//!
//! An in-memory, hash-linked, append-only ledger for document fingerprints.
//!
//! ## Overview
//!
//! Callers append records carrying a metadata payload (typically a document
//! fingerprint plus descriptive fields). Each record is linked to its
//! predecessor by hash and mined against a small difficulty gate. Later a
//! caller can look a fingerprint up, or re-verify the whole chain to detect
//! tampering with any stored record.
//!
//! - **Records**: Immutable once appended. Changes are new records.
//! - **Genesis**: Every ledger starts with a sentinel record at position 0.
//! - **Validation**: Content integrity plus linkage, checked end to end.
//!
//! ## Usage
//!
//! ```rust
//! use blockverify_ledger::{Ledger, LedgerConfig, Payload};
//!
//! let ledger = Ledger::new(LedgerConfig::default()).unwrap();
//! let record = ledger
//!     .append(Payload::new().with("fingerprint", "abc123").with("subject", "S1"))
//!     .unwrap();
//!
//! assert_eq!(record.position, 1);
//! assert_eq!(ledger.find_by_fingerprint("abc123"), Some(record));
//! assert!(ledger.validate());
//! ```
//!
//! ## Re-exports
//!
//! - `blockverify_ledger::core` - Pure primitives (Record, Payload, Hash256, ...)

pub mod config;
pub mod error;
pub mod global;
pub mod ledger;

pub use blockverify_ledger_core as core;

pub use config::{LedgerConfig, DEFAULT_FINGERPRINT_FIELD, DEFAULT_GENESIS_INSTITUTION};
pub use error::{LedgerError, Result};
pub use global::{get_ledger, install, LedgerHandle};
pub use ledger::{genesis_payload, Ledger, LedgerSummary, Verification, GENESIS_FINGERPRINT};

pub use blockverify_ledger_core::{
    Difficulty, Hash256, IntegrityViolation, Payload, PayloadValue, Record, RecordView,
};
