//! Canonical CBOR encoding for deterministic record hashing.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 milliseconds)
//!
//! **CRITICAL**: a record's content hash is SHA-256 over
//! `RECORD_DOMAIN || canonical_record_bytes(..)`. Changing this encoding
//! invalidates every hash already in a chain.

use ciborium::value::Value;

use crate::digest::Hash256;
use crate::error::CoreError;
use crate::payload::{Payload, PayloadValue};

/// Domain separation prefix for record content hashes.
pub const RECORD_DOMAIN: &[u8] = b"blockverify/record/v1";

/// Record field keys.
mod keys {
    pub const POSITION: &str = "position";
    pub const CREATED_AT: &str = "created_at";
    pub const PAYLOAD: &str = "payload";
    pub const PARENT_HASH: &str = "parent_hash";
    pub const SEARCH_COUNTER: &str = "search_counter";
}

/// Encode the hashed fields of a record to canonical CBOR bytes.
///
/// Encodes `{ "payload": {..}, "position": u, "created_at": i,
/// "parent_hash": bytes, "search_counter": u }` with keys in canonical order.
pub fn canonical_record_bytes(
    position: u64,
    created_at: i64,
    payload: &Payload,
    parent_hash: &Hash256,
    search_counter: u64,
) -> Result<Vec<u8>, CoreError> {
    let entries = vec![
        (
            Value::Text(keys::POSITION.to_string()),
            Value::Integer(position.into()),
        ),
        (
            Value::Text(keys::CREATED_AT.to_string()),
            Value::Integer(created_at.into()),
        ),
        (Value::Text(keys::PAYLOAD.to_string()), payload_to_cbor_value(payload)),
        (
            Value::Text(keys::PARENT_HASH.to_string()),
            Value::Bytes(parent_hash.0.to_vec()),
        ),
        (
            Value::Text(keys::SEARCH_COUNTER.to_string()),
            Value::Integer(search_counter.into()),
        ),
    ];

    encode_canonical(&Value::Map(entries))
}

/// Encode a payload alone to canonical CBOR bytes.
pub fn canonical_payload_bytes(payload: &Payload) -> Result<Vec<u8>, CoreError> {
    encode_canonical(&payload_to_cbor_value(payload))
}

/// Hash the canonical form of a record's fields.
pub fn record_hash(
    position: u64,
    created_at: i64,
    payload: &Payload,
    parent_hash: &Hash256,
    search_counter: u64,
) -> Result<Hash256, CoreError> {
    let bytes = canonical_record_bytes(position, created_at, payload, parent_hash, search_counter)?;
    Ok(Hash256::hash_parts(&[RECORD_DOMAIN, &bytes]))
}

fn payload_to_cbor_value(payload: &Payload) -> Value {
    let entries = payload
        .iter()
        .map(|(k, v)| (Value::Text(k.to_string()), payload_value_to_cbor(v)))
        .collect();
    Value::Map(entries)
}

fn payload_value_to_cbor(value: &PayloadValue) -> Value {
    match value {
        PayloadValue::Null => Value::Null,
        PayloadValue::Bool(b) => Value::Bool(*b),
        PayloadValue::Integer(i) => Value::Integer((*i).into()),
        PayloadValue::Text(s) => Value::Text(s.clone()),
    }
}

/// Encode an arbitrary CBOR value canonically.
///
/// Fails on floats, tags and any other value outside the deterministic
/// subset used by records.
pub fn encode_canonical(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::EncodingError(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => return Err(CoreError::EncodingError("unsupported CBOR value type".into())),
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<(), CoreError> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison. Duplicate keys are
/// rejected.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs: Vec<(Vec<u8>, &Value)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    if pairs.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(CoreError::EncodingError("duplicate map key".into()));
    }

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
