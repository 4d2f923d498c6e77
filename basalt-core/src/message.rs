//! Frames exchanged between a client and a storage node.
//!
//! A new connection carries exactly one validation exchange before anything
//! else: the client proves cluster membership with the shared secret, the
//! node answers with a session identifier. After validation, application
//! traffic flows as opaque payload frames whose meaning is up to the caller.

use serde::{Deserialize, Serialize};

/// Validation request sent by a client on a freshly opened connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateMessage {
    /// Shared secret proving the client belongs to this cluster.
    pub secret: String,
    /// Client agent string, for operator-facing diagnostics.
    pub agent: String,
}

/// Validation response issued by a storage node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateAckMessage {
    /// Whether the node accepted the validation request.
    pub accepted: bool,
    /// Session identifier assigned by the node. Empty on rejection.
    pub session_id: String,
    /// True when the node minted this session identifier just now, i.e. it
    /// has never seen this client identity before.
    pub new_session: bool,
}

/// All frames understood at the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Frame {
    /// Validation request, client to node.
    Validate(ValidateMessage),
    /// Validation response, node to client.
    ValidateAck(ValidateAckMessage),
    /// Opaque application payload relayed after validation. The transport
    /// layer never interprets payload bytes.
    Payload(Vec<u8>),
}

impl Frame {
    /// Get a human-readable name for the frame type.
    pub fn name(&self) -> &'static str {
        match self {
            Frame::Validate(_) => "validate",
            Frame::ValidateAck(_) => "validate_ack",
            Frame::Payload(_) => "payload",
        }
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // The secret never appears in log output
            Frame::Validate(v) => write!(f, "Validate(agent={})", v.agent),
            Frame::ValidateAck(a) => write!(
                f,
                "ValidateAck(accepted={}, session={}, new={})",
                a.accepted, a.session_id, a.new_session
            ),
            Frame::Payload(p) => write!(f, "Payload({} bytes)", p.len()),
        }
    }
}
