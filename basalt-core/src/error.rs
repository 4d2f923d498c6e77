//! Error types for the Basalt core crate.

use std::fmt;

/// Errors produced while encoding or decoding wire data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireError {
    /// Failed to encode a value to bytes.
    Encode(String),
    /// Failed to decode a value from bytes.
    Decode(String),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Encode(msg) => write!(f, "encode failed: {}", msg),
            WireError::Decode(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for WireError {}
