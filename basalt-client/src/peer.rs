//! Storage node identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a storage node, as reported by service discovery.
///
/// Two identities are equal iff all four fields are equal; the pool keys all
/// per-node state on this equality. The struct carries no connection state of
/// its own and is cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerIdentity {
    /// Advertised address, hostname or IP.
    pub addr: String,
    /// TCP port.
    pub port: u16,
    /// Replication group the node belongs to.
    pub group: String,
    /// Instance identifier distinguishing nodes within a group.
    pub instance_id: String,
}

impl PeerIdentity {
    /// Create a new identity.
    pub fn new(
        addr: impl Into<String>,
        port: u16,
        group: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            addr: addr.into(),
            port,
            group: group.into(),
            instance_id: instance_id.into(),
        }
    }

    /// Get the dial target in `addr:port` form.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.addr, self.port, self.group, self.instance_id)
    }
}
