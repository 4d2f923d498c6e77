//! Client error types.

use std::io;
use thiserror::Error;

use basalt_core::WireError;

use crate::registry::RegistryError;

/// Errors surfaced by the Basalt client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error while dialing or talking to a storage node.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TCP connect timed out.
    #[error("Connect timeout to {addr}")]
    ConnectTimeout { addr: String },

    /// Validation was rejected by the node or violated the protocol.
    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    /// Validation exchange timed out.
    #[error("Handshake timeout")]
    HandshakeTimeout,

    /// Frame exceeds maximum allowed size.
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// Invalid network magic bytes.
    #[error("Invalid network magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Failed to encode or decode a frame payload.
    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    /// Node is at its connection cap and no idle connection is available.
    #[error("Connection cap reached: {max}")]
    CapacityExceeded { max: usize },

    /// First-contact baseline registration failed.
    #[error("Baseline registration failed: {0}")]
    Registration(String),

    /// Operation attempted on a connection that is no longer open.
    #[error("Connection closed")]
    ConnectionClosed,
}

impl From<RegistryError> for ClientError {
    fn from(err: RegistryError) -> Self {
        ClientError::Registration(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
