//! Client-side connection pool.
//!
//! Caches idle validated connections per storage node, enforces a per-node
//! cap on concurrently active connections, and takes connections back (or
//! disposes of them) after use. One pool instance serves every node the
//! client talks to.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::PoolConfig;
use crate::connection::{dial_and_validate, Connection};
use crate::error::{ClientError, ClientResult};
use crate::peer::PeerIdentity;
use crate::registry::{BaselineRegistry, NoopRegistry};

/// Snapshot of pool-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Connections currently counted against any node's cap.
    pub total_active: usize,
    /// Connections sitting idle in the cache.
    pub idle: usize,
    /// Dials currently in flight.
    pub dialing: usize,
    /// Nodes with at least one active connection.
    pub peers: usize,
}

/// Mutable pool state.
///
/// Everything lives behind one mutex so queue and counter mutations are
/// always observed atomically together.
#[derive(Debug, Default)]
struct PoolState {
    /// Idle connections per node, reused oldest-first.
    idle: HashMap<PeerIdentity, VecDeque<Connection>>,
    /// Active connections per node: idle-cached plus checked out.
    active: HashMap<PeerIdentity, usize>,
    /// In-flight dial reservations per node.
    dialing: HashMap<PeerIdentity, usize>,
    /// Sum of all per-node active counters.
    total_active: usize,
}

impl PoolState {
    /// Apply `delta` to a node's active counter and to the total, returning
    /// the new per-node value. Every counter mutation flows through here;
    /// saturation keeps the counters from ever going negative.
    fn adjust_active(&mut self, peer: &PeerIdentity, delta: isize) -> usize {
        let count = self.active.entry(peer.clone()).or_insert(0);
        *count = count.saturating_add_signed(delta);
        self.total_active = self.total_active.saturating_add_signed(delta);
        *count
    }

    fn dialing_count(&self, peer: &PeerIdentity) -> usize {
        self.dialing.get(peer).copied().unwrap_or(0)
    }

    /// Reserve a dial slot for a node.
    fn start_dialing(&mut self, peer: &PeerIdentity) {
        *self.dialing.entry(peer.clone()).or_insert(0) += 1;
    }

    /// Release a node's dial reservation.
    fn finish_dialing(&mut self, peer: &PeerIdentity) {
        if let Some(count) = self.dialing.get_mut(peer) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.dialing.remove(peer);
            }
        }
    }

    fn pop_idle(&mut self, peer: &PeerIdentity) -> Option<Connection> {
        self.idle.get_mut(peer).and_then(VecDeque::pop_front)
    }

    fn push_idle(&mut self, peer: &PeerIdentity, conn: Connection) -> usize {
        let queue = self.idle.entry(peer.clone()).or_default();
        queue.push_back(conn);
        queue.len()
    }
}

/// Connection pool for a set of storage nodes.
///
/// Acquired connections are exclusively owned by the caller until given back
/// via [`release`](ConnectionPool::release) or
/// [`discard`](ConnectionPool::discard). Dropping the pool drops every idle
/// connection with it.
pub struct ConnectionPool {
    config: PoolConfig,
    /// Per-node cap after clamping.
    max_per_peer: usize,
    registry: Arc<dyn BaselineRegistry>,
    state: Mutex<PoolState>,
}

impl ConnectionPool {
    /// Create a pool that does not track first contact.
    pub fn new(config: PoolConfig) -> Self {
        Self::with_registry(config, Arc::new(NoopRegistry))
    }

    /// Create a pool with an injected baseline registry.
    ///
    /// An out-of-range cap in the configuration (zero, or above the sanity
    /// bound) falls back to the default.
    pub fn with_registry(config: PoolConfig, registry: Arc<dyn BaselineRegistry>) -> Self {
        let max_per_peer = config.effective_max_per_peer();
        Self {
            config,
            max_per_peer,
            registry,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Get the per-node connection cap actually enforced.
    pub fn max_per_peer(&self) -> usize {
        self.max_per_peer
    }

    /// Acquire a connection to a node.
    ///
    /// Returns the oldest cached idle connection when one exists; no dial
    /// occurs and counters are untouched. Otherwise dials and validates a new
    /// connection, provided the node is under its cap. Admission counts
    /// in-flight dials, so concurrent acquires can never over-dial a node;
    /// the dial itself runs with the pool lock released.
    pub async fn acquire(&self, peer: &PeerIdentity) -> ClientResult<Connection> {
        {
            let mut state = self.state.lock().await;

            if let Some(conn) = state.pop_idle(peer) {
                tracing::debug!(peer = %peer, session = %conn.session_id(), "Reusing idle connection");
                return Ok(conn);
            }

            let active = state.adjust_active(peer, 0);
            if active + state.dialing_count(peer) >= self.max_per_peer {
                return Err(ClientError::CapacityExceeded {
                    max: self.max_per_peer,
                });
            }

            state.start_dialing(peer);
        }

        let result = dial_and_validate(peer, &self.config, self.registry.as_ref()).await;

        let mut state = self.state.lock().await;
        state.finish_dialing(peer);
        match result {
            Ok(conn) => {
                state.adjust_active(peer, 1);
                Ok(conn)
            }
            Err(e) => Err(e),
        }
    }

    /// Return a healthy connection to the idle cache.
    ///
    /// The connection must have been acquired from this pool for this node.
    /// Counters are untouched; the connection stays active while idle.
    pub async fn release(&self, peer: &PeerIdentity, conn: Connection) {
        debug_assert!(conn.is_open(), "released connection must be open");

        let mut state = self.state.lock().await;
        let idle = state.push_idle(peer, conn);
        tracing::debug!(peer = %peer, idle, "Returned connection to pool");
    }

    /// Dispose of a broken connection, freeing its slot.
    ///
    /// The transport is closed best-effort and the node's active counter
    /// drops by one. The connection is never cached.
    pub async fn discard(&self, peer: &PeerIdentity, mut conn: Connection) {
        conn.close().await;

        let mut state = self.state.lock().await;
        let active = state.adjust_active(peer, -1);
        tracing::debug!(peer = %peer, active, "Discarded broken connection");
    }

    /// Get the total number of connections counted against any node's cap.
    pub async fn total_active(&self) -> usize {
        self.state.lock().await.total_active
    }

    /// Get a snapshot of the pool counters.
    pub async fn stats(&self) -> PoolStats {
        let state = self.state.lock().await;
        PoolStats {
            total_active: state.total_active,
            idle: state.idle.values().map(VecDeque::len).sum(),
            dialing: state.dialing.values().sum(),
            peers: state.active.values().filter(|&&n| n > 0).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(n: u16) -> PeerIdentity {
        PeerIdentity::new("127.0.0.1", 9000 + n, "g01", format!("n{}", n))
    }

    #[test]
    fn test_adjust_active_pairing() {
        let mut state = PoolState::default();
        let p = peer(1);

        // Reading through the choke point leaves everything untouched
        assert_eq!(state.adjust_active(&p, 0), 0);
        assert_eq!(state.total_active, 0);

        assert_eq!(state.adjust_active(&p, 1), 1);
        assert_eq!(state.adjust_active(&p, 1), 2);
        assert_eq!(state.total_active, 2);

        assert_eq!(state.adjust_active(&p, -1), 1);
        assert_eq!(state.adjust_active(&p, -1), 0);
        assert_eq!(state.total_active, 0);
    }

    #[test]
    fn test_adjust_active_never_negative() {
        let mut state = PoolState::default();
        let p = peer(1);

        assert_eq!(state.adjust_active(&p, -1), 0);
        assert_eq!(state.total_active, 0);
    }

    #[test]
    fn test_counters_independent_per_node() {
        let mut state = PoolState::default();
        let a = peer(1);
        let b = peer(2);

        state.adjust_active(&a, 1);
        state.adjust_active(&b, 1);
        state.adjust_active(&b, 1);

        assert_eq!(state.adjust_active(&a, 0), 1);
        assert_eq!(state.adjust_active(&b, 0), 2);
        assert_eq!(state.total_active, 3);
    }

    #[test]
    fn test_dial_reservations() {
        let mut state = PoolState::default();
        let p = peer(1);

        assert_eq!(state.dialing_count(&p), 0);

        state.start_dialing(&p);
        state.start_dialing(&p);
        assert_eq!(state.dialing_count(&p), 2);

        state.finish_dialing(&p);
        assert_eq!(state.dialing_count(&p), 1);

        state.finish_dialing(&p);
        assert_eq!(state.dialing_count(&p), 0);
        assert!(state.dialing.is_empty());

        // Releasing with no reservation held is a no-op
        state.finish_dialing(&p);
        assert_eq!(state.dialing_count(&p), 0);
    }

    #[test]
    fn test_cap_clamped_at_construction() {
        let pool = ConnectionPool::new(PoolConfig::new("s").with_max_per_peer(0));
        assert_eq!(pool.max_per_peer(), 10);

        let pool = ConnectionPool::new(PoolConfig::new("s").with_max_per_peer(1000));
        assert_eq!(pool.max_per_peer(), 10);

        let pool = ConnectionPool::new(PoolConfig::new("s").with_max_per_peer(25));
        assert_eq!(pool.max_per_peer(), 25);
    }
}
