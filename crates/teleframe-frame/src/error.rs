use crate::channel::ChannelId;

/// Errors that can occur while building, encoding or reading frames.
///
/// Corrupt input on the wire is never reported here: the parser drops bad
/// frames silently and records them in [`ChannelStats`](crate::ChannelStats).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A payload write would run past the payload capacity.
    #[error("payload overflow (writing {len} bytes at offset {offset}, capacity {capacity})")]
    PayloadOverflow {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// A payload read would run past the message length.
    #[error("payload underflow (reading {len} bytes at offset {offset}, length {available})")]
    PayloadUnderflow {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// The payload is larger than a single frame can carry.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A message was decoded as a kind it does not carry.
    #[error("message kind mismatch (expected {expected}, got {actual})")]
    KindMismatch { expected: u8, actual: u8 },

    /// Tracking another channel would exceed the configured bound.
    #[error("channel {channel} rejected: {max} channels already tracked")]
    ChannelLimit { channel: ChannelId, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source ended or the sink stopped accepting bytes.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
