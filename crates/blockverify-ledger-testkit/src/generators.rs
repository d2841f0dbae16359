//! Proptest generators for property-based testing.

use proptest::prelude::*;

use blockverify_ledger_core::{Hash256, Payload, PayloadValue, Record};

/// Generate a random Hash256.
pub fn hash256() -> impl Strategy<Value = Hash256> {
    any::<[u8; 32]>().prop_map(Hash256::from_bytes)
}

/// Generate a document fingerprint (64 lowercase hex chars).
pub fn fingerprint() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}".prop_map(String::from)
}

/// Generate a payload key.
pub fn payload_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a scalar payload value.
pub fn payload_value() -> impl Strategy<Value = PayloadValue> {
    prop_oneof![
        Just(PayloadValue::Null),
        any::<bool>().prop_map(PayloadValue::Bool),
        any::<i64>().prop_map(PayloadValue::Integer),
        "[ -~]{0,32}".prop_map(PayloadValue::Text),
    ]
}

/// Generate a payload with up to `max_fields` extra fields and a fingerprint.
pub fn payload(max_fields: usize) -> impl Strategy<Value = Payload> {
    (
        fingerprint(),
        prop::collection::btree_map(payload_key(), payload_value(), 0..=max_fields),
    )
        .prop_map(|(fp, fields)| {
            let mut payload: Payload = fields.into_iter().collect();
            payload.insert("fingerprint", fp);
            payload
        })
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800_000i64 // up to 2100-01-01
}

/// Parameters for generating a record.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub position: u64,
    pub created_at: i64,
    pub payload: Payload,
    pub parent_hash: Hash256,
    pub search_counter: u64,
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            0u64..=100_000u64, // position
            timestamp(),
            payload(8),
            hash256(),
            0u64..=1_000u64, // search_counter
        )
            .prop_map(
                |(position, created_at, payload, parent_hash, search_counter)| RecordParams {
                    position,
                    created_at,
                    payload,
                    parent_hash,
                    search_counter,
                },
            )
            .boxed()
    }
}

/// Generate a sealed record from parameters.
pub fn record_from_params(params: &RecordParams) -> Record {
    let mut record = Record::with_timestamp(
        params.position,
        params.created_at,
        params.payload.clone(),
        params.parent_hash,
    )
    .expect("generated payloads contain only scalars");
    record.search_counter = params.search_counter;
    record.reseal().expect("generated payloads contain only scalars");
    record
}
