//! Client-side connection pooling for Basalt storage nodes.
//!
//! This crate provides the connection layer of the Basalt client:
//!
//! - Per-node caching of idle, validated connections
//! - A per-node cap on concurrently active connections
//! - A one-time validation handshake on every new connection
//! - First-contact baseline registration against an injected
//!   coordination-service capability
//!
//! # Architecture
//!
//! ```text
//! caller ──acquire()──► ConnectionPool ──cache miss──► dial + validate
//!    │                        ▲                              │
//!    │                        │                    new session? register
//!    └──release()/discard()───┘                    baseline with tracker
//! ```
//!
//! Acquired connections are exclusively owned by the caller until returned.
//! Healthy connections go back to the idle cache; broken ones are closed and
//! their cap slot freed.
//!
//! # Usage
//!
//! ```ignore
//! use basalt_client::{ConnectionPool, PeerIdentity, PoolConfig};
//!
//! let config = PoolConfig::new("cluster-secret").with_max_per_peer(25);
//! let pool = ConnectionPool::new(config);
//!
//! let peer = PeerIdentity::new("10.0.0.7", 9920, "g01", "n1");
//! let conn = pool.acquire(&peer).await?;
//! // ... talk to the node ...
//! pool.release(&peer, conn).await;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod peer;
pub mod pool;
pub mod protocol;
pub mod registry;

// Re-export main types
pub use config::{PoolConfig, MAX_FRAME_SIZE, NETWORK_MAGIC};
pub use connection::Connection;
pub use error::{ClientError, ClientResult};
pub use peer::PeerIdentity;
pub use pool::{ConnectionPool, PoolStats};
pub use protocol::FrameCodec;
pub use registry::{BaselineRegistry, NoopRegistry, RegistryError};
