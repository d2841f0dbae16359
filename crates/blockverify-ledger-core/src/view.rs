//! Read-only, serialisable snapshots of records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::Payload;
use crate::record::Record;

/// An explorer-style view of a record.
///
/// Hashes are rendered as hex and the creation time is given both as Unix
/// milliseconds and as RFC 3339. Nothing here leads back into the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordView {
    pub position: u64,
    pub created_at: i64,
    pub recorded_at: Option<DateTime<Utc>>,
    pub payload: Payload,
    pub parent_hash: String,
    pub content_hash: String,
    pub search_counter: u64,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        Self {
            position: record.position,
            created_at: record.created_at,
            recorded_at: record.recorded_at(),
            payload: record.payload.clone(),
            parent_hash: record.parent_hash.to_hex(),
            content_hash: record.content_hash.to_hex(),
            search_counter: record.search_counter,
        }
    }
}
