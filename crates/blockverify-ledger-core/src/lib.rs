//! # BlockVerify Ledger Core
//!
//! Pure primitives for the BlockVerify ledger: records, payloads, canonical
//! encoding, the difficulty gate, and chain verification.
//!
//! This crate holds no locks and no global state. It is pure computation
//! over hash-linked records; the `blockverify-ledger` crate owns the chain.
//!
//! ## Key Types
//!
//! - [`Record`] - One hash-verifiable ledger entry
//! - [`Payload`] - The metadata mapping carried by a record
//! - [`Hash256`] - SHA-256 digest used for content hashes and linkage
//! - [`Difficulty`] - The leading-zero gate applied when mining
//! - [`RecordView`] - Read-only, serialisable snapshot of a record
//!
//! ## Canonicalization
//!
//! Record hashes are computed over deterministic CBOR. See [`canonical`].

pub mod canonical;
pub mod difficulty;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod payload;
pub mod record;
pub mod validation;
pub mod view;

pub use canonical::{canonical_payload_bytes, canonical_record_bytes, record_hash, RECORD_DOMAIN};
pub use difficulty::{mine, Difficulty, MiningOutcome};
pub use digest::Hash256;
pub use error::{CoreError, Result};
pub use fingerprint::{fingerprint_bytes, fingerprint_file, fingerprint_reader, fingerprint_text};
pub use payload::{Payload, PayloadValue};
pub use record::Record;
pub use validation::{check_link, check_record, verify_chain, IntegrityViolation};
pub use view::RecordView;
