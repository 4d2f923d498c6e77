//! Validated connections and the dial path.

use std::fmt;

use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;

use basalt_core::Frame;

use crate::config::PoolConfig;
use crate::error::{ClientError, ClientResult};
use crate::peer::PeerIdentity;
use crate::protocol::{handshake, FrameCodec};
use crate::registry::BaselineRegistry;

/// A transport connection that has passed validation.
///
/// Exclusively owned by its current holder: either the pool's idle cache or
/// the caller that acquired it. Once closed, a connection must never be used
/// or returned to any cache again.
pub struct Connection {
    framed: Framed<TcpStream, FrameCodec>,
    session_id: String,
    new_session: bool,
    open: bool,
}

impl Connection {
    /// Get the session identifier issued by the node during validation.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether the node minted the session identifier on this connection.
    pub fn new_session(&self) -> bool {
        self.new_session
    }

    /// Whether the transport is still open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Send a frame to the node.
    pub async fn send(&mut self, frame: Frame) -> ClientResult<()> {
        if !self.open {
            return Err(ClientError::ConnectionClosed);
        }
        self.framed.send(frame).await
    }

    /// Receive the next frame from the node.
    ///
    /// Returns `Ok(None)` when the node closes its end of the stream.
    pub async fn recv(&mut self) -> ClientResult<Option<Frame>> {
        if !self.open {
            return Err(ClientError::ConnectionClosed);
        }
        match self.framed.next().await {
            Some(frame) => Ok(Some(frame?)),
            None => Ok(None),
        }
    }

    /// Close the transport. Best-effort; the connection is unusable afterward.
    pub async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = self.framed.get_mut().shutdown().await {
            tracing::debug!(session = %self.session_id, error = %e, "Error shutting down connection");
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("new_session", &self.new_session)
            .field("open", &self.open)
            .finish()
    }
}

/// Dial a storage node and run the validation handshake.
///
/// Any failure after the TCP connect closes the socket before the error is
/// returned; a half-validated or half-registered connection never escapes.
pub(crate) async fn dial_and_validate(
    peer: &PeerIdentity,
    config: &PoolConfig,
    registry: &dyn BaselineRegistry,
) -> ClientResult<Connection> {
    let endpoint = peer.endpoint();
    tracing::debug!(peer = %peer, "Connecting to storage node");

    let stream = match timeout(config.connect_timeout, TcpStream::connect(&endpoint)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(ClientError::Io(e)),
        Err(_) => return Err(ClientError::ConnectTimeout { addr: endpoint }),
    };

    if let Err(e) = stream.set_nodelay(true) {
        tracing::warn!(peer = %peer, error = %e, "Failed to set TCP_NODELAY");
    }

    let mut framed = Framed::new(stream, FrameCodec::new());

    let outcome = match handshake::run(&mut framed, config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            shutdown_quietly(&mut framed).await;
            return Err(e);
        }
    };

    let mut conn = Connection {
        framed,
        session_id: outcome.session_id,
        new_session: outcome.new_session,
        open: true,
    };

    if conn.new_session && config.track_first_contact {
        tracing::info!(peer = %peer, session = %conn.session_id, "New session, registering baseline");
        if let Err(e) = registry.register_baseline(&conn.session_id, 0).await {
            conn.close().await;
            return Err(ClientError::from(e));
        }
    }

    tracing::debug!(peer = %peer, session = %conn.session_id, "Connection validated");
    Ok(conn)
}

async fn shutdown_quietly(framed: &mut Framed<TcpStream, FrameCodec>) {
    if let Err(e) = framed.get_mut().shutdown().await {
        tracing::debug!(error = %e, "Error closing unvalidated connection");
    }
}

// Dial, handshake, and registration paths are exercised end to end in the
// acceptance tests against in-process mock nodes.
