//! Checksummed byte-stream framing for serial and radio telemetry links.
//!
//! This is the protocol layer of teleframe. Every message travels as:
//! - A 1-byte start delimiter (`0x55`)
//! - A 5-byte header: payload length, sequence, system id, component id, kind
//! - Up to 255 payload bytes, fields packed big-endian
//! - A 2-byte CRC-16/MCRF4XX checksum over header and payload
//!
//! Receiving is byte-at-a-time: [`ChannelParser`] resynchronizes on its own
//! after noise or corruption and counts lost frames from sequence gaps.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod channel;
pub mod checksum;
pub mod codec;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod pack;
pub mod parser;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::TelemetryCodec;
pub use channel::{ChannelId, ChannelRegistry};
pub use checksum::Checksum;
pub use codec::{encode_message, required_length, write_message};
pub use config::{FrameConfig, RegistryConfig};
pub use endpoint::{finalize, Endpoint, SequenceCounter};
pub use error::{FrameError, Result};
pub use message::{Message, MessageKind, FRAME_OVERHEAD, MAX_PAYLOAD_LEN, STX};
pub use pack::{PayloadReader, PayloadWriter};
pub use parser::{ChannelParser, ChannelStats, ParseState};
pub use reader::FrameReader;
pub use writer::FrameWriter;
