//! Client side of the Basalt wire protocol.
//!
//! This module contains:
//! - Length-prefixed framing codec
//! - Connection validation handshake

pub mod framing;
pub mod handshake;

// Re-export main types
pub use framing::FrameCodec;
pub use handshake::HandshakeOutcome;
