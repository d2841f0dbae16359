//! Document fingerprinting.
//!
//! Callers hash the content they record or check before talking to the
//! ledger. Fingerprints are lowercase hex SHA-256 strings.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

const CHUNK_SIZE: usize = 8192;

/// Fingerprint an in-memory byte slice.
pub fn fingerprint_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Fingerprint UTF-8 text (e.g. text extracted from a scanned document).
pub fn fingerprint_text(text: &str) -> String {
    fingerprint_bytes(text.as_bytes())
}

/// Fingerprint everything readable from `reader`, in fixed-size chunks.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint the contents of a file.
pub fn fingerprint_file(path: impl AsRef<Path>) -> Result<String> {
    let file = File::open(path)?;
    fingerprint_reader(file)
}
