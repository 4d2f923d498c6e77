//! Length-prefixed frame codec.
//!
//! Frames are laid out as:
//! - 4 bytes: network magic
//! - 4 bytes: big-endian payload length
//! - N bytes: bincode-encoded Frame

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use basalt_core::{wire, Frame};

use crate::config::{MAX_FRAME_SIZE, NETWORK_MAGIC};
use crate::error::{ClientError, ClientResult};

/// Header size: 4 bytes magic + 4 bytes length.
const HEADER_SIZE: usize = 8;

/// Codec turning a byte stream into [`Frame`]s and back.
#[derive(Debug, Default)]
pub struct FrameCodec {
    /// Payload length of the frame being decoded, once its header is in.
    pending_length: Option<usize>,
}

impl FrameCodec {
    /// Create a new frame codec.
    pub fn new() -> Self {
        Self {
            pending_length: None,
        }
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = ClientError;

    fn decode(&mut self, src: &mut BytesMut) -> ClientResult<Option<Frame>> {
        // Read the header first, if we haven't yet
        if self.pending_length.is_none() {
            if src.len() < HEADER_SIZE {
                return Ok(None);
            }

            let magic: [u8; 4] = src[0..4].try_into().unwrap();
            if magic != NETWORK_MAGIC {
                return Err(ClientError::InvalidMagic {
                    expected: NETWORK_MAGIC,
                    actual: magic,
                });
            }

            let length = u32::from_be_bytes(src[4..8].try_into().unwrap()) as usize;
            if length > MAX_FRAME_SIZE {
                return Err(ClientError::FrameTooLarge {
                    size: length,
                    max: MAX_FRAME_SIZE,
                });
            }

            self.pending_length = Some(length);
        }

        let length = self.pending_length.unwrap();

        // Wait for the full payload before decoding
        if src.len() < HEADER_SIZE + length {
            src.reserve(HEADER_SIZE + length - src.len());
            return Ok(None);
        }

        src.advance(HEADER_SIZE);
        let payload = src.split_to(length);
        self.pending_length = None;

        let frame: Frame = wire::decode(&payload)?;
        Ok(Some(frame))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = ClientError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> ClientResult<()> {
        let payload = wire::encode(&frame)?;
        let length = payload.len();

        if length > MAX_FRAME_SIZE {
            return Err(ClientError::FrameTooLarge {
                size: length,
                max: MAX_FRAME_SIZE,
            });
        }

        dst.reserve(HEADER_SIZE + length);
        dst.put_slice(&NETWORK_MAGIC);
        dst.put_u32(length as u32);
        dst.put_slice(&payload);

        Ok(())
    }
}
