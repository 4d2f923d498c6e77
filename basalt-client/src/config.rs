//! Pool configuration.

use std::time::Duration;

/// Network magic bytes identifying the Basalt protocol.
pub const NETWORK_MAGIC: [u8; 4] = [0x42, 0x53, 0x4C, 0x54]; // "BSLT"

/// Maximum frame size in bytes (1 MB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Default maximum active connections per storage node.
pub const DEFAULT_MAX_PER_PEER: usize = 10;

/// Sanity bound on the per-node cap; values above this fall back to the default.
pub const MAX_PER_PEER_LIMIT: usize = 100;

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default handshake timeout.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default agent string sent in validation requests.
pub const DEFAULT_AGENT: &str = "basalt-client/0.1.0";

/// Configuration for a [`ConnectionPool`](crate::pool::ConnectionPool).
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum active connections per storage node. Zero or anything above
    /// [`MAX_PER_PEER_LIMIT`] is treated as [`DEFAULT_MAX_PER_PEER`].
    pub max_per_peer: usize,

    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Duration,

    /// Timeout for completing the validation handshake.
    pub handshake_timeout: Duration,

    /// Shared secret sent in validation requests.
    pub secret: String,

    /// Register a baseline position with the coordination service whenever a
    /// node mints a new session identifier for this client.
    pub track_first_contact: bool,

    /// Agent string sent in validation requests.
    pub agent: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_per_peer: DEFAULT_MAX_PER_PEER,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            secret: String::new(),
            track_first_contact: false,
            agent: DEFAULT_AGENT.to_string(),
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with the given cluster secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set the maximum active connections per node.
    pub fn with_max_per_peer(mut self, max: usize) -> Self {
        self.max_per_peer = max;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the handshake timeout.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Enable or disable first-contact baseline registration.
    pub fn with_track_first_contact(mut self, track: bool) -> Self {
        self.track_first_contact = track;
        self
    }

    /// Set the agent string.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    /// Get the per-node cap actually enforced, with out-of-range values
    /// clamped to the default.
    pub fn effective_max_per_peer(&self) -> usize {
        if self.max_per_peer == 0 || self.max_per_peer > MAX_PER_PEER_LIMIT {
            DEFAULT_MAX_PER_PEER
        } else {
            self.max_per_peer
        }
    }
}
