use std::fmt;

use crate::checksum::Checksum;
use crate::error::{FrameError, Result};
use crate::pack::{PayloadReader, PayloadWriter};

/// Start-of-frame delimiter ('U').
pub const STX: u8 = 0x55;

/// Largest payload a frame can describe (the length field is one byte).
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Header bytes covered by the checksum: length, sequence, system, component, kind.
pub const CORE_HEADER_LEN: usize = 5;

/// Bytes on the wire besides the payload: delimiter + core header + 2 checksum bytes.
pub const FRAME_OVERHEAD: usize = 1 + CORE_HEADER_LEN + 2;

/// One telemetry message.
///
/// The payload buffer always has room for [`MAX_PAYLOAD_LEN`] bytes but only
/// the first `length` of them carry data; accessors never expose the rest.
#[derive(Clone)]
pub struct Message {
    /// Number of meaningful payload bytes.
    pub length: u8,
    /// Wrapping per-sender sequence number.
    pub sequence: u8,
    /// Sending system.
    pub system_id: u8,
    /// Sending component within the system.
    pub component_id: u8,
    /// Payload schema identifier, opaque to the framing layer.
    pub kind: u8,
    payload: [u8; MAX_PAYLOAD_LEN],
    checksum: u16,
}

impl Message {
    /// An empty draft of the given kind, ready to be packed and finalized.
    pub fn new(kind: u8) -> Self {
        Self {
            length: 0,
            sequence: 0,
            system_id: 0,
            component_id: 0,
            kind,
            payload: [0; MAX_PAYLOAD_LEN],
            checksum: 0,
        }
    }

    /// A draft whose payload is a copy of `payload`.
    pub fn with_payload(kind: u8, payload: &[u8]) -> Result<Self> {
        let mut msg = Self::new(kind);
        msg.set_payload(payload)?;
        Ok(msg)
    }

    /// The meaningful payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..usize::from(self.length)]
    }

    /// The whole payload buffer, for packing fields before finalizing.
    pub fn payload_buf_mut(&mut self) -> &mut [u8; MAX_PAYLOAD_LEN] {
        &mut self.payload
    }

    /// Replace the payload and its length.
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        self.payload[..payload.len()].copy_from_slice(payload);
        self.length = payload.len() as u8;
        Ok(())
    }

    /// A cursor over the payload buffer.
    pub fn writer(&mut self) -> PayloadWriter<'_> {
        PayloadWriter::new(&mut self.payload)
    }

    /// A cursor over the meaningful payload bytes.
    pub fn reader(&self) -> PayloadReader<'_> {
        PayloadReader::new(self.payload())
    }

    pub(crate) fn payload_slot(&mut self, index: usize) -> &mut u8 {
        &mut self.payload[index]
    }

    /// Core header in wire order.
    pub fn header_bytes(&self) -> [u8; CORE_HEADER_LEN] {
        [
            self.length,
            self.sequence,
            self.system_id,
            self.component_id,
            self.kind,
        ]
    }

    /// Checksum over the core header and payload as currently set.
    pub fn compute_checksum(&self) -> Checksum {
        let mut crc = Checksum::new();
        crc.accumulate_slice(&self.header_bytes());
        crc.accumulate_slice(self.payload());
        crc
    }

    /// The stored checksum. Only meaningful after finalizing or decoding.
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Stored checksum trailer bytes in wire order.
    pub fn checksum_bytes(&self) -> [u8; 2] {
        self.checksum.to_le_bytes()
    }

    pub(crate) fn set_checksum(&mut self, checksum: Checksum) {
        self.checksum = checksum.value();
    }

    /// True when the stored checksum matches the header and payload.
    pub fn is_checksum_valid(&self) -> bool {
        self.compute_checksum().value() == self.checksum
    }

    /// Total bytes this message occupies on the wire.
    pub fn wire_size(&self) -> usize {
        usize::from(self.length) + FRAME_OVERHEAD
    }

    /// Decode the payload as a typed message, checking its kind first.
    pub fn decode_as<T: MessageKind>(&self) -> Result<T> {
        if self.kind != T::KIND {
            return Err(FrameError::KindMismatch {
                expected: T::KIND,
                actual: self.kind,
            });
        }
        T::decode(&mut self.reader())
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.header_bytes() == other.header_bytes()
            && self.payload() == other.payload()
            && self.checksum == other.checksum
    }
}

impl Eq for Message {}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("length", &self.length)
            .field("sequence", &self.sequence)
            .field("system_id", &self.system_id)
            .field("component_id", &self.component_id)
            .field("kind", &self.kind)
            .field("payload", &self.payload())
            .field("checksum", &format_args!("{:#06x}", self.checksum))
            .finish()
    }
}

/// A payload schema: how one message kind packs into and out of a payload.
pub trait MessageKind: Sized {
    /// Identifier carried in the frame header.
    const KIND: u8;

    /// Pack the fields of `self` into the payload.
    fn encode(&self, writer: &mut PayloadWriter<'_>) -> Result<()>;

    /// Unpack a value from a payload of this kind.
    fn decode(reader: &mut PayloadReader<'_>) -> Result<Self>;
}
