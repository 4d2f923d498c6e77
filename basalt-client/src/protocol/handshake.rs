//! Connection validation handshake.
//!
//! The handshake protocol:
//! 1. Client sends Validate with the cluster secret
//! 2. Node answers with ValidateAck carrying a session identifier and
//!    whether that identifier was newly minted
//!
//! One exchange per connection, before any application traffic.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;

use basalt_core::{Frame, ValidateAckMessage, ValidateMessage};

use crate::config::PoolConfig;
use crate::error::{ClientError, ClientResult};
use crate::protocol::FrameCodec;

/// Result of a successful validation exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeOutcome {
    /// Session identifier issued by the node.
    pub session_id: String,
    /// True when the node saw this client identity for the first time.
    pub new_session: bool,
}

/// Create the validation request for this client.
pub fn create_validate_message(config: &PoolConfig) -> ValidateMessage {
    ValidateMessage {
        secret: config.secret.clone(),
        agent: config.agent.clone(),
    }
}

/// Interpret the node's reply to a validation request.
pub fn interpret_ack(frame: Frame) -> ClientResult<HandshakeOutcome> {
    match frame {
        Frame::ValidateAck(ValidateAckMessage {
            accepted: true,
            session_id,
            new_session,
        }) => Ok(HandshakeOutcome {
            session_id,
            new_session,
        }),
        Frame::ValidateAck(_) => Err(ClientError::HandshakeFailed(
            "validation rejected by node".to_string(),
        )),
        other => Err(ClientError::HandshakeFailed(format!(
            "unexpected {} frame during validation",
            other.name()
        ))),
    }
}

/// Run the validation exchange over a freshly framed stream.
///
/// The whole exchange is bounded by the configured handshake timeout. On
/// failure the stream is left as-is; the caller is responsible for closing it.
pub(crate) async fn run(
    framed: &mut Framed<TcpStream, FrameCodec>,
    config: &PoolConfig,
) -> ClientResult<HandshakeOutcome> {
    let exchange = async {
        framed
            .send(Frame::Validate(create_validate_message(config)))
            .await?;

        match framed.next().await {
            Some(reply) => interpret_ack(reply?),
            None => Err(ClientError::HandshakeFailed(
                "node closed the connection during validation".to_string(),
            )),
        }
    };

    match timeout(config.handshake_timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::HandshakeTimeout),
    }
}
