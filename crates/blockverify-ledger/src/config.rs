//! Ledger configuration.

use blockverify_ledger_core::Difficulty;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Payload key that holds a record's fingerprint.
pub const DEFAULT_FINGERPRINT_FIELD: &str = "fingerprint";

/// Institution named in the genesis record.
pub const DEFAULT_GENESIS_INSTITUTION: &str = "BlockVerify System";

/// Configuration for a [`Ledger`](crate::Ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Leading zero hex nibbles required of every appended record's hash.
    pub difficulty: Difficulty,

    /// Payload key that `find_by_fingerprint` matches on.
    pub fingerprint_field: String,

    /// Reject appends whose payload lacks a text fingerprint.
    pub require_fingerprint: bool,

    /// Give up mining after this many hash evaluations.
    pub max_mining_attempts: Option<u64>,

    /// Institution recorded in the genesis payload.
    pub genesis_institution: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::DEFAULT,
            fingerprint_field: DEFAULT_FINGERPRINT_FIELD.to_string(),
            require_fingerprint: false,
            max_mining_attempts: None,
            genesis_institution: DEFAULT_GENESIS_INSTITUTION.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Parse from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn fingerprint_field(mut self, field: impl Into<String>) -> Self {
        self.fingerprint_field = field.into();
        self
    }

    pub fn require_fingerprint(mut self, required: bool) -> Self {
        self.require_fingerprint = required;
        self
    }

    pub fn max_mining_attempts(mut self, max: Option<u64>) -> Self {
        self.max_mining_attempts = max;
        self
    }

    pub fn genesis_institution(mut self, institution: impl Into<String>) -> Self {
        self.genesis_institution = institution.into();
        self
    }

    /// Check the configuration for values the ledger cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.fingerprint_field.is_empty() {
            return Err(LedgerError::InvalidConfig(
                "fingerprint_field must not be empty".into(),
            ));
        }
        if self.max_mining_attempts == Some(0) {
            return Err(LedgerError::InvalidConfig(
                "max_mining_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.difficulty, Difficulty::DEFAULT);
        assert_eq!(config.fingerprint_field, "fingerprint");
        assert!(!config.require_fingerprint);
        assert_eq!(config.max_mining_attempts, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            LedgerConfig::from_json_str(r#"{"difficulty": 2, "fingerprint_field": "certificate_hash"}"#)
                .unwrap();
        assert_eq!(config.difficulty.nibbles(), 2);
        assert_eq!(config.fingerprint_field, "certificate_hash");
        assert_eq!(config.genesis_institution, DEFAULT_GENESIS_INSTITUTION);
    }

    #[test]
    fn test_from_json_rejects_bad_difficulty() {
        let err = LedgerConfig::from_json_str(r#"{"difficulty": 65}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_empty_field() {
        let config = LedgerConfig::default().fingerprint_field("");
        assert!(matches!(config.validate(), Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let config = LedgerConfig::default().max_mining_attempts(Some(0));
        assert!(config.validate().is_err());
    }
}
