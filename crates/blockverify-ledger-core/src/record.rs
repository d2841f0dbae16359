//! Record: one hash-verifiable entry in the ledger.
//!
//! A record's `content_hash` covers every other field. Once a record has been
//! mined and appended it is never edited; any drift between the stored fields
//! and the stored hash is evidence of corruption or tampering.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::record_hash;
use crate::digest::Hash256;
use crate::error::CoreError;
use crate::payload::Payload;
use crate::view::RecordView;

/// A single ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the chain (genesis is 0).
    pub position: u64,

    /// Creation time (Unix milliseconds). Hashed, so fixed once computed.
    pub created_at: i64,

    /// Metadata mapping.
    pub payload: Payload,

    /// Content hash of the preceding record (`Hash256::ZERO` for genesis).
    pub parent_hash: Hash256,

    /// Counter adjusted by mining until the hash meets the difficulty.
    pub search_counter: u64,

    /// SHA-256 over the canonical encoding of the fields above.
    pub content_hash: Hash256,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(position: u64, payload: Payload, parent_hash: Hash256) -> Result<Self, CoreError> {
        Self::with_timestamp(position, now_millis(), payload, parent_hash)
    }

    /// Create a record with an explicit creation time.
    pub fn with_timestamp(
        position: u64,
        created_at: i64,
        payload: Payload,
        parent_hash: Hash256,
    ) -> Result<Self, CoreError> {
        let mut record = Self {
            position,
            created_at,
            payload,
            parent_hash,
            search_counter: 0,
            content_hash: Hash256::ZERO,
        };
        record.reseal()?;
        Ok(record)
    }

    /// Create a genesis record: position 0, all-zero parent.
    pub fn genesis(payload: Payload) -> Result<Self, CoreError> {
        Self::new(0, payload, Hash256::ZERO)
    }

    /// Recompute the content hash from the current fields.
    pub fn compute_hash(&self) -> Result<Hash256, CoreError> {
        record_hash(
            self.position,
            self.created_at,
            &self.payload,
            &self.parent_hash,
            self.search_counter,
        )
    }

    /// Set `content_hash` to the hash of the current fields.
    pub fn reseal(&mut self) -> Result<(), CoreError> {
        self.content_hash = self.compute_hash()?;
        Ok(())
    }

    /// Whether the stored hash matches the current fields.
    pub fn has_valid_hash(&self) -> bool {
        matches!(self.compute_hash(), Ok(h) if h == self.content_hash)
    }

    pub fn is_genesis(&self) -> bool {
        self.position == 0 && self.parent_hash == Hash256::ZERO
    }

    /// The text value of the designated fingerprint field, if present.
    pub fn fingerprint(&self, field: &str) -> Option<&str> {
        self.payload.get_text(field)
    }

    /// Creation time as a UTC datetime.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }

    /// Read-only snapshot for external consumers.
    pub fn to_view(&self) -> RecordView {
        RecordView::from(self)
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
