//! Difficulty predicate and mining.
//!
//! The difficulty is a cheap rate-limiting gate on insertion: a record is
//! accepted once the hex form of its content hash starts with the required
//! number of `0` characters. It is not a defence against a resourced
//! adversary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest::Hash256;
use crate::error::CoreError;
use crate::record::Record;

/// Required number of leading zero hex nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Difficulty(u32);

impl Difficulty {
    /// One leading zero nibble: about 16 attempts per record.
    pub const DEFAULT: Self = Self(1);

    /// No gate at all; every hash is accepted.
    pub const NONE: Self = Self(0);

    /// A SHA-256 hex digest has 64 nibbles.
    pub const MAX: u32 = 64;

    pub fn new(nibbles: u32) -> Result<Self, CoreError> {
        if nibbles > Self::MAX {
            return Err(CoreError::InvalidDifficulty {
                requested: nibbles,
                max: Self::MAX,
            });
        }
        Ok(Self(nibbles))
    }

    pub fn nibbles(self) -> u32 {
        self.0
    }

    /// The hex prefix a satisfying hash must start with.
    pub fn prefix(self) -> String {
        "0".repeat(self.0 as usize)
    }

    pub fn is_satisfied_by(self, hash: &Hash256) -> bool {
        hash.leading_zero_nibbles() >= self.0
    }

    /// Expected number of hashing attempts to satisfy this difficulty.
    pub fn expected_attempts(self) -> f64 {
        16f64.powi(self.0 as i32)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Difficulty {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u32 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} leading zero nibble(s)", self.0)
    }
}

/// Result of a successful mining run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningOutcome {
    /// Number of hashes evaluated, including the initial one.
    pub attempts: u64,
    /// The accepted counter value.
    pub search_counter: u64,
    /// The accepted content hash.
    pub content_hash: Hash256,
}

/// Adjust `record.search_counter` until its hash satisfies `difficulty`.
///
/// The counter is checked from its current value upward, so a freshly built
/// record (counter 0) ends up with the smallest satisfying counter. When
/// `max_attempts` is reached first, the record is left in an unspecified
/// but resealed state and `MiningExhausted` is returned.
pub fn mine(
    record: &mut Record,
    difficulty: Difficulty,
    max_attempts: Option<u64>,
) -> Result<MiningOutcome, CoreError> {
    let mut attempts: u64 = 1;
    record.reseal()?;

    while !difficulty.is_satisfied_by(&record.content_hash) {
        if max_attempts.is_some_and(|max| attempts >= max) {
            return Err(CoreError::MiningExhausted { attempts });
        }
        record.search_counter = record
            .search_counter
            .checked_add(1)
            .ok_or(CoreError::MiningExhausted { attempts })?;
        record.reseal()?;
        attempts += 1;
    }

    Ok(MiningOutcome {
        attempts,
        search_counter: record.search_counter,
        content_hash: record.content_hash,
    })
}
