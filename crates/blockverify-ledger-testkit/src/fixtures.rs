//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use blockverify_ledger::{Ledger, LedgerConfig};
use blockverify_ledger_core::{fingerprint_text, Difficulty, Payload, Record};

/// A test fixture wrapping a ledger.
pub struct TestFixture {
    pub ledger: Ledger,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create a fixture whose ledger does not mine (difficulty 0).
    pub fn unmined() -> Self {
        Self::with_config(LedgerConfig::default().difficulty(Difficulty::NONE))
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            ledger: Ledger::new(config).expect("fixture config is valid"),
        }
    }

    /// Append a certificate record for `document`.
    pub fn append_certificate(&self, document: &str, subject_name: &str) -> Record {
        self.ledger
            .append(certificate_payload(document, subject_name))
            .expect("append succeeds")
    }

    /// Append `count` distinct certificate records.
    pub fn append_many(&self, count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| self.append_certificate(&format!("document-{i}"), &format!("Subject {i}")))
            .collect()
    }

    /// Overwrite one payload field of a stored record, leaving its hash alone.
    pub fn forge_field(&self, position: u64, key: &str, value: &str) -> bool {
        self.ledger.tamper(position, |record| {
            record.payload.insert(key, value);
        })
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A certificate payload whose fingerprint is the SHA-256 of `document`.
pub fn certificate_payload(document: &str, subject_name: &str) -> Payload {
    Payload::new()
        .with("fingerprint", fingerprint_text(document))
        .with("subject_name", subject_name)
        .with("subject_id", format!("id-{}", subject_name.to_lowercase().replace(' ', "-")))
        .with("record_type", "certificate")
        .with("institution", "Test University")
}

/// A minimal payload carrying only a fingerprint.
pub fn fingerprint_payload(fingerprint: &str) -> Payload {
    Payload::new().with("fingerprint", fingerprint)
}

/// Fixtures sharing one configuration.
pub fn ledger_fixtures(count: usize, config: &LedgerConfig) -> Vec<TestFixture> {
    (0..count)
        .map(|_| TestFixture::with_config(config.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_chain() {
        let fixture = TestFixture::new();
        let records = fixture.append_many(3);

        assert_eq!(fixture.ledger.length(), 4);
        assert_eq!(records[1].parent_hash, records[0].content_hash);
        assert_eq!(records[2].parent_hash, records[1].content_hash);
        assert!(fixture.ledger.validate());
    }

    #[test]
    fn test_certificate_fingerprint_is_document_hash() {
        let fixture = TestFixture::unmined();
        let record = fixture.append_certificate("diploma.pdf contents", "Ada Lovelace");

        let fp = fingerprint_text("diploma.pdf contents");
        assert_eq!(record.fingerprint("fingerprint"), Some(fp.as_str()));
        assert_eq!(record.payload.get_text("subject_id"), Some("id-ada-lovelace"));
        assert_eq!(fixture.ledger.find_by_fingerprint(&fp), Some(record));
    }

    #[test]
    fn test_forge_field_breaks_validation() {
        let fixture = TestFixture::new();
        fixture.append_many(2);

        assert!(fixture.forge_field(1, "subject_name", "Mallory"));
        assert!(!fixture.ledger.validate());
        assert!(!fixture.forge_field(99, "subject_name", "Mallory"));
    }

    #[test]
    fn test_fixtures_are_independent() {
        let fixtures = ledger_fixtures(2, &LedgerConfig::default());
        fixtures[0].append_certificate("a", "A");

        assert_eq!(fixtures[0].ledger.length(), 2);
        assert_eq!(fixtures[1].ledger.length(), 1);
    }
}
