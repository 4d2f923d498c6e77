//! Deterministic wire encoding.
//!
//! All frame payloads use a single bincode configuration: fixed-size integer
//! encoding, little-endian byte order, trailing bytes rejected. Identical
//! values encode to identical bytes on every platform.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::WireError;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Encode a value to bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    options()
        .serialize(value)
        .map_err(|e| WireError::Encode(e.to_string()))
}

/// Decode a value from bytes.
///
/// Returns an error on malformed input, on a type mismatch, and on trailing
/// bytes after the value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    options()
        .deserialize(bytes)
        .map_err(|e| WireError::Decode(e.to_string()))
}
