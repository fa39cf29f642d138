//! `tokio_util` codec over the byte-at-a-time parser.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::encode_message;
use crate::error::FrameError;
use crate::message::Message;
use crate::parser::{ChannelParser, ChannelStats};

/// Decodes telemetry messages out of an async byte stream and encodes
/// finalized messages into one.
///
/// Use with `FramedRead`/`FramedWrite`/`Framed` over any tokio
/// `AsyncRead`/`AsyncWrite`.
#[derive(Debug, Default)]
pub struct TelemetryCodec {
    parser: ChannelParser,
}

impl TelemetryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters of the underlying parser.
    pub fn stats(&self) -> ChannelStats {
        self.parser.stats()
    }
}

impl Decoder for TelemetryCodec {
    type Item = Message;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, FrameError> {
        while src.has_remaining() {
            if let Some(msg) = self.parser.parse_byte(src.get_u8()) {
                return Ok(Some(msg));
            }
        }
        Ok(None)
    }
}

impl Encoder<Message> for TelemetryCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode_message(&item, dst);
        Ok(())
    }
}
