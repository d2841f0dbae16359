//! The Ledger: an in-memory, hash-linked, append-only chain of records.
//!
//! All mutation goes through one exclusive lock. `append` holds it for the
//! whole of record construction and mining, so no two appends ever observe
//! the same tail. Readers take the shared side of the same lock; a candidate
//! being mined is a local value until it is pushed, so readers never see it.

use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use blockverify_ledger_core::{
    mine, verify_chain, Hash256, IntegrityViolation, Payload, Record, RecordView,
};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};

/// Fingerprint stored in the genesis record.
pub const GENESIS_FINGERPRINT: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// The ordered record sequence.
///
/// Never empty: it is built around a genesis record and only ever grows,
/// or is replaced wholesale by a fresh one.
struct Chain {
    records: Vec<Record>,
}

impl Chain {
    fn new(genesis: Record) -> Self {
        Self {
            records: vec![genesis],
        }
    }

    fn tail(&self) -> &Record {
        &self.records[self.records.len() - 1]
    }

    fn len(&self) -> u64 {
        self.records.len() as u64
    }

    fn get(&self, position: u64) -> Option<&Record> {
        usize::try_from(position)
            .ok()
            .and_then(|i| self.records.get(i))
    }

    fn find(&self, field: &str, fingerprint: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.fingerprint(field) == Some(fingerprint))
    }
}

/// The ledger.
///
/// One instance holds exactly one chain. Construct it once at the
/// composition root and share it (see [`crate::global`] for the process-wide
/// handle).
pub struct Ledger {
    config: LedgerConfig,
    chain: RwLock<Chain>,
}

impl Ledger {
    /// Create a ledger holding only its genesis record.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        let genesis = genesis_record(&config)?;
        info!(
            genesis = %genesis.content_hash,
            difficulty = config.difficulty.nibbles(),
            "ledger created"
        );
        Ok(Self {
            config,
            chain: RwLock::new(Chain::new(genesis)),
        })
    }

    /// Create a ledger with [`LedgerConfig::default`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(LedgerConfig::default())
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a record carrying `payload` and return it as stored.
    ///
    /// Accepts a [`Payload`] or anything convertible into one (such as a
    /// `serde_json::Value` object). Conversion failures are reported before
    /// the lock is taken. On any error the chain is unchanged.
    #[instrument(level = "debug", skip_all)]
    pub fn append<P>(&self, payload: P) -> Result<Record>
    where
        P: TryInto<Payload>,
        LedgerError: From<P::Error>,
    {
        let payload: Payload = payload.try_into()?;
        let field = &self.config.fingerprint_field;
        if self.config.require_fingerprint && payload.get_text(field).is_none() {
            return Err(LedgerError::MissingFingerprint {
                field: field.clone(),
            });
        }

        let mut chain = self.chain.write();
        let position = chain.len();
        let parent_hash = chain.tail().content_hash;
        debug!(position, parent = %parent_hash, "mining candidate");

        let mut candidate = Record::new(position, payload, parent_hash)?;
        let outcome = mine(
            &mut candidate,
            self.config.difficulty,
            self.config.max_mining_attempts,
        )?;
        debug!(
            position,
            attempts = outcome.attempts,
            expected = self.config.difficulty.expected_attempts(),
            search_counter = outcome.search_counter,
            "mining converged"
        );

        chain.records.push(candidate.clone());
        info!(
            position,
            hash = %candidate.content_hash,
            fingerprint = candidate.fingerprint(field).unwrap_or("-"),
            "record appended"
        );
        Ok(candidate)
    }

    /// Discard every record and start again from a fresh genesis record.
    ///
    /// Destructive; meant for test harnesses and privileged admin paths.
    #[instrument(level = "debug", skip_all)]
    pub fn reset(&self) -> Result<()> {
        let genesis = genesis_record(&self.config)?;
        let mut chain = self.chain.write();
        let discarded = chain.len() - 1;
        *chain = Chain::new(genesis);
        info!(discarded, "ledger reset to genesis");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The record at `position`, if `position < length()`.
    pub fn get(&self, position: u64) -> Option<Record> {
        self.chain.read().get(position).cloned()
    }

    /// The first record whose fingerprint field equals `fingerprint`.
    ///
    /// Linear scan over the whole chain.
    pub fn find_by_fingerprint(&self, fingerprint: &str) -> Option<Record> {
        self.chain
            .read()
            .find(&self.config.fingerprint_field, fingerprint)
            .cloned()
    }

    /// Number of records, genesis included.
    pub fn length(&self) -> u64 {
        self.chain.read().len()
    }

    /// The most recently appended record (genesis on a fresh ledger).
    pub fn tail(&self) -> Record {
        self.chain.read().tail().clone()
    }

    /// Copies of every record, in order.
    pub fn export_all(&self) -> Vec<Record> {
        self.chain.read().records.clone()
    }

    /// Explorer views of every record, in order.
    pub fn export_views(&self) -> Vec<RecordView> {
        self.chain.read().records.iter().map(Record::to_view).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Integrity
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether every record satisfies content integrity and chain linkage.
    pub fn validate(&self) -> bool {
        self.verify().is_ok()
    }

    /// Like [`validate`](Self::validate), but names the first violation.
    pub fn verify(&self) -> std::result::Result<(), IntegrityViolation> {
        let result = verify_chain(&self.chain.read().records);
        if let Err(violation) = &result {
            warn!(%violation, "chain integrity check failed");
        }
        result
    }

    /// Dashboard figures, taken from one consistent snapshot.
    pub fn summary(&self) -> LedgerSummary {
        let chain = self.chain.read();
        let tail = chain.tail();
        LedgerSummary {
            length: chain.len(),
            tail_position: tail.position,
            tail_hash: tail.content_hash,
            valid: verify_chain(&chain.records).is_ok(),
        }
    }

    /// Decide whether a document fingerprint is recorded in an intact chain.
    pub fn verify_fingerprint(&self, fingerprint: &str) -> Verification {
        let chain = self.chain.read();
        let Some(record) = chain.find(&self.config.fingerprint_field, fingerprint) else {
            return Verification::NotRecorded;
        };
        match verify_chain(&chain.records) {
            Ok(()) => Verification::Verified {
                record: record.clone(),
            },
            Err(violation) => {
                warn!(%violation, position = record.position, "fingerprint found in a damaged chain");
                Verification::Untrusted {
                    record: record.clone(),
                    violation,
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Test support
    // ─────────────────────────────────────────────────────────────────────────

    /// Mutate a stored record in place, bypassing every invariant.
    ///
    /// Returns `false` if there is no record at `position`.
    #[cfg(feature = "test-util")]
    pub fn tamper<F: FnOnce(&mut Record)>(&self, position: u64, f: F) -> bool {
        let mut chain = self.chain.write();
        let Some(record) = usize::try_from(position)
            .ok()
            .and_then(|i| chain.records.get_mut(i))
        else {
            return false;
        };
        f(record);
        true
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chain = self.chain.read();
        f.debug_struct("Ledger")
            .field("length", &chain.len())
            .field("tail", &chain.tail().content_hash)
            .field("config", &self.config)
            .finish()
    }
}

/// Snapshot figures for a status page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    pub length: u64,
    pub tail_position: u64,
    pub tail_hash: Hash256,
    pub valid: bool,
}

/// Outcome of checking a document fingerprint against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Recorded, and the chain verifies end to end.
    Verified { record: Record },
    /// Recorded, but the chain fails verification.
    Untrusted {
        record: Record,
        violation: IntegrityViolation,
    },
    /// No record carries this fingerprint.
    NotRecorded,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }

    /// The matching record, whether or not the chain verified.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Verification::Verified { record } | Verification::Untrusted { record, .. } => {
                Some(record)
            }
            Verification::NotRecorded => None,
        }
    }
}

/// Build the sentinel genesis payload for `config`.
pub fn genesis_payload(config: &LedgerConfig) -> Payload {
    Payload::new()
        .with(config.fingerprint_field.as_str(), GENESIS_FINGERPRINT)
        .with("subject_name", "Genesis")
        .with("subject_id", "0")
        .with("record_type", "genesis")
        .with("institution", config.genesis_institution.as_str())
}

fn genesis_record(config: &LedgerConfig) -> Result<Record> {
    Ok(Record::genesis(genesis_payload(config))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockverify_ledger_core::{CoreError, Difficulty};
    use serde_json::json;

    fn ledger() -> Ledger {
        Ledger::with_defaults().unwrap()
    }

    fn payload(fp: &str) -> Payload {
        Payload::new().with("fingerprint", fp).with("subject", "S1")
    }

    #[test]
    fn test_fresh_ledger_has_genesis() {
        let ledger = ledger();
        assert_eq!(ledger.length(), 1);

        let genesis = ledger.tail();
        assert_eq!(genesis.position, 0);
        assert_eq!(genesis.parent_hash, Hash256::ZERO);
        assert_eq!(genesis.fingerprint("fingerprint"), Some(GENESIS_FINGERPRINT));
        assert_eq!(genesis.payload.get_text("record_type"), Some("genesis"));
        assert!(ledger.validate());
    }

    #[test]
    fn test_append_links_to_tail() {
        let ledger = ledger();
        let genesis = ledger.tail();

        let r1 = ledger.append(payload("abc123")).unwrap();
        assert_eq!(r1.position, 1);
        assert_eq!(r1.parent_hash, genesis.content_hash);
        assert!(r1.content_hash.to_hex().starts_with('0'));

        let r2 = ledger.append(payload("def456")).unwrap();
        assert_eq!(r2.parent_hash, r1.content_hash);
        assert_eq!(ledger.length(), 3);
        assert_eq!(ledger.tail(), r2);
        assert!(ledger.validate());
    }

    #[test]
    fn test_get_bounds() {
        let ledger = ledger();
        ledger.append(payload("abc123")).unwrap();
        assert_eq!(ledger.get(0).unwrap().position, 0);
        assert_eq!(ledger.get(1).unwrap().position, 1);
        assert!(ledger.get(2).is_none());
        assert!(ledger.get(u64::MAX).is_none());
    }

    #[test]
    fn test_find_by_fingerprint_returns_first_match() {
        let ledger = ledger();
        let first = ledger.append(payload("dup")).unwrap();
        ledger.append(payload("dup")).unwrap();

        assert_eq!(ledger.find_by_fingerprint("dup"), Some(first));
        assert_eq!(ledger.find_by_fingerprint("missing"), None);
    }

    #[test]
    fn test_custom_fingerprint_field() {
        let config = LedgerConfig::default().fingerprint_field("certificate_hash");
        let ledger = Ledger::new(config).unwrap();

        let record = ledger
            .append(Payload::new().with("certificate_hash", "cafe"))
            .unwrap();
        assert_eq!(ledger.find_by_fingerprint("cafe"), Some(record));
        assert_eq!(
            ledger.get(0).unwrap().fingerprint("certificate_hash"),
            Some(GENESIS_FINGERPRINT)
        );
    }

    #[test]
    fn test_append_json_payload() {
        let ledger = ledger();
        let record = ledger
            .append(json!({"fingerprint": "abc123", "year": 2024}))
            .unwrap();
        assert_eq!(record.payload.get_text("fingerprint"), Some("abc123"));
    }

    #[test]
    fn test_malformed_payload_leaves_chain_unchanged() {
        let ledger = ledger();
        let err = ledger.append(json!({"fingerprint": "x", "gpa": 3.9})).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::UnsupportedValue { .. })
        ));
        assert_eq!(ledger.length(), 1);
    }

    #[test]
    fn test_require_fingerprint() {
        let ledger = Ledger::new(LedgerConfig::default().require_fingerprint(true)).unwrap();
        let err = ledger.append(Payload::new().with("subject", "S1")).unwrap_err();
        assert!(matches!(err, LedgerError::MissingFingerprint { .. }));

        let err = ledger.append(Payload::new().with("fingerprint", 42)).unwrap_err();
        assert!(matches!(err, LedgerError::MissingFingerprint { .. }));

        assert!(ledger.append(payload("ok")).is_ok());
        assert_eq!(ledger.length(), 2);
    }

    #[test]
    fn test_mining_exhaustion_leaves_chain_unchanged() {
        let config = LedgerConfig::default()
            .difficulty(Difficulty::new(64).unwrap())
            .max_mining_attempts(Some(8));
        let ledger = Ledger::new(config).unwrap();

        let err = ledger.append(payload("abc")).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::MiningExhausted { attempts: 8 })
        ));
        assert_eq!(ledger.length(), 1);
        assert!(ledger.validate());
    }

    #[test]
    fn test_reset() {
        let ledger = ledger();
        ledger.append(payload("a")).unwrap();
        ledger.append(payload("b")).unwrap();

        ledger.reset().unwrap();
        assert_eq!(ledger.length(), 1);
        let genesis = ledger.tail();
        assert!(genesis.is_genesis());
        assert_eq!(genesis.payload, genesis_payload(ledger.config()));
        assert!(ledger.find_by_fingerprint("a").is_none());
        assert!(ledger.validate());
    }

    #[test]
    fn test_export_all_is_a_copy() {
        let ledger = ledger();
        ledger.append(payload("a")).unwrap();

        let mut exported = ledger.export_all();
        exported[1].payload.insert("fingerprint", "forged");
        assert_eq!(ledger.find_by_fingerprint("a").unwrap().position, 1);
        assert!(ledger.validate());
    }

    #[test]
    fn test_summary() {
        let ledger = ledger();
        let record = ledger.append(payload("a")).unwrap();
        let summary = ledger.summary();
        assert_eq!(summary.length, 2);
        assert_eq!(summary.tail_position, 1);
        assert_eq!(summary.tail_hash, record.content_hash);
        assert!(summary.valid);
    }

    #[test]
    fn test_verify_fingerprint() {
        let ledger = ledger();
        let record = ledger.append(payload("abc123")).unwrap();

        let outcome = ledger.verify_fingerprint("abc123");
        assert!(outcome.is_verified());
        assert_eq!(outcome.record(), Some(&record));

        assert_eq!(ledger.verify_fingerprint("nope"), Verification::NotRecorded);
    }
}
