//! Chain verification: content integrity, linkage and positions.

use thiserror::Error;

use crate::digest::Hash256;
use crate::record::Record;

/// The first invariant a chain was found to violate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error("chain has no genesis record")]
    EmptyChain,

    #[error("record at index {index} claims position {found}")]
    PositionMismatch { index: u64, found: u64 },

    #[error("content hash mismatch at position {position}")]
    ContentHashMismatch { position: u64 },

    #[error("broken link at position {position}: parent hash does not match predecessor")]
    BrokenLink { position: u64 },

    #[error("genesis parent hash is not the zero sentinel")]
    GenesisParentNotSentinel,
}

impl IntegrityViolation {
    /// The chain index at which the violation was detected, if any.
    pub fn position(&self) -> Option<u64> {
        match self {
            IntegrityViolation::EmptyChain => None,
            IntegrityViolation::PositionMismatch { index, .. } => Some(*index),
            IntegrityViolation::ContentHashMismatch { position }
            | IntegrityViolation::BrokenLink { position } => Some(*position),
            IntegrityViolation::GenesisParentNotSentinel => Some(0),
        }
    }
}

/// Check a single record's position and content integrity.
pub fn check_record(record: &Record, expected_position: u64) -> Result<(), IntegrityViolation> {
    if record.position != expected_position {
        return Err(IntegrityViolation::PositionMismatch {
            index: expected_position,
            found: record.position,
        });
    }
    if !record.has_valid_hash() {
        return Err(IntegrityViolation::ContentHashMismatch {
            position: expected_position,
        });
    }
    Ok(())
}

/// Check that `next` links to `prev`.
pub fn check_link(prev: &Record, next: &Record) -> Result<(), IntegrityViolation> {
    if next.parent_hash != prev.content_hash {
        return Err(IntegrityViolation::BrokenLink {
            position: next.position,
        });
    }
    Ok(())
}

/// Verify a whole chain, genesis first.
///
/// Checks, in order for each record: position equals index, stored hash
/// equals recomputed hash, and (after genesis) the parent hash equals the
/// predecessor's content hash. Genesis must carry the zero parent.
pub fn verify_chain(records: &[Record]) -> Result<(), IntegrityViolation> {
    let genesis = records.first().ok_or(IntegrityViolation::EmptyChain)?;

    check_record(genesis, 0)?;
    if genesis.parent_hash != Hash256::ZERO {
        return Err(IntegrityViolation::GenesisParentNotSentinel);
    }

    for (index, pair) in records.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        check_record(next, index as u64 + 1)?;
        check_link(prev, next)?;
    }

    Ok(())
}
