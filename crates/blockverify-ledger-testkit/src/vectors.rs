//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical record encoding and the content hash.
//! Any other implementation that hashes the same fields the same way must
//! reproduce `expected_hash` and `expected_counter` exactly.

use blockverify_ledger_core::{
    canonical_record_bytes, mine, Difficulty, Hash256, Payload, Record,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Chain position.
    pub position: u64,
    /// Creation time (Unix milliseconds).
    pub created_at: i64,
    /// Payload as a JSON object.
    pub payload_json: &'static str,
    /// Every byte of the parent hash.
    pub parent_fill: u8,
    /// Search counter before mining.
    pub search_counter: u64,
    /// Expected content hash (hex) at `search_counter`.
    pub expected_hash: &'static str,
    /// Smallest counter satisfying the default difficulty.
    pub expected_counter: u64,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "certificate abc123",
            position: 1,
            created_at: 1736870400000, // 2025-01-14T16:00:00Z
            payload_json: r#"{"fingerprint":"abc123","record_type":"certificate","subject_name":"Alice"}"#,
            parent_fill: 0x00,
            search_counter: 0,
            expected_hash: "28fc0f02106c02f03cc1eba171a3b3a4395a247ed827009822971e97fd701a40",
            expected_counter: 4,
        },
        GoldenVector {
            name: "default genesis at epoch",
            position: 0,
            created_at: 0,
            payload_json: r#"{"fingerprint":"0000000000000000000000000000000000000000000000000000000000000000","subject_name":"Genesis","subject_id":"0","record_type":"genesis","institution":"BlockVerify System"}"#,
            parent_fill: 0x00,
            search_counter: 0,
            expected_hash: "94c8230a6383b6318109ea7a1e17c4d2fa6d78ec318555c1928131abedbf0189",
            expected_counter: 8,
        },
        GoldenVector {
            name: "non-text scalars",
            position: 300,
            created_at: 1736870401000,
            payload_json: r#"{"delta":-5,"honours":true,"note":null,"year":2024}"#,
            parent_fill: 0xAA,
            search_counter: 17,
            expected_hash: "dc46be8df2d3fb4bbec1c5fe5147a71c5c092d00ab1591422e70000e5ad3f5f8",
            expected_counter: 20,
        },
        GoldenVector {
            name: "empty payload",
            position: 0,
            created_at: 0,
            payload_json: "{}",
            parent_fill: 0x00,
            search_counter: 0,
            expected_hash: "2f399e78bce219d8783c8509e3404c3fd3132168101cfe1e18a02eee50c841f0",
            expected_counter: 5,
        },
    ]
}

/// Canonical bytes of the "empty payload" vector.
pub const EMPTY_PAYLOAD_RECORD_BYTES: &str = "a5677061796c6f6164a068706f736974696f6e006a637265617465645f6174006b706172656e745f68617368582000000000000000000000000000000000000000000000000000000000000000006e7365617263685f636f756e74657200";

/// Parse a vector's payload.
pub fn vector_payload(vector: &GoldenVector) -> Payload {
    let value: serde_json::Value =
        serde_json::from_str(vector.payload_json).expect("vector payload is valid JSON");
    Payload::try_from(value).expect("vector payload has only scalars")
}

/// Build the (unmined) record described by a vector.
pub fn record_from_vector(vector: &GoldenVector) -> Record {
    let mut record = Record::with_timestamp(
        vector.position,
        vector.created_at,
        vector_payload(vector),
        Hash256::from_bytes([vector.parent_fill; 32]),
    )
    .expect("vector record encodes");
    record.search_counter = vector.search_counter;
    record.reseal().expect("vector record encodes");
    record
}

/// Check every vector; returns `(name, matches, actual_hash)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hex = record_from_vector(v).content_hash.to_hex();
            (v.name.to_string(), hex == v.expected_hash, hex)
        })
        .collect()
}

/// Canonical bytes of a vector's record, as hex.
pub fn vector_bytes_hex(vector: &GoldenVector) -> String {
    let record = record_from_vector(vector);
    let bytes = canonical_record_bytes(
        record.position,
        record.created_at,
        &record.payload,
        &record.parent_hash,
        record.search_counter,
    )
    .expect("vector record encodes");
    hex::encode(bytes)
}

/// Mine a vector's record at the default difficulty.
pub fn mine_vector(vector: &GoldenVector) -> Record {
    let mut record = record_from_vector(vector);
    mine(&mut record, Difficulty::DEFAULT, None).expect("default difficulty converges");
    record
}
