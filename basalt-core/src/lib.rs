//! Core building blocks shared by Basalt clients and storage nodes.
//!
//! This crate carries the pieces both sides of the wire must agree on:
//!
//! - Deterministic serialization helpers used for all frame payloads
//! - The connection-validation messages exchanged when a client opens a
//!   transport connection to a storage node

pub mod error;
pub mod message;
pub mod wire;

// Re-export main types
pub use error::WireError;
pub use message::{Frame, ValidateAckMessage, ValidateMessage};
