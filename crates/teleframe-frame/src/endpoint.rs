//! Sending side: sequence numbering and frame finalization.

use tracing::trace;

use crate::error::Result;
use crate::message::{Message, MessageKind, FRAME_OVERHEAD};

/// Wrapping 8-bit sequence source for one logical sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceCounter(u8);

impl SequenceCounter {
    /// Start counting at `start`.
    pub const fn starting_at(start: u8) -> Self {
        Self(start)
    }

    /// The number the next frame will carry.
    pub const fn peek(self) -> u8 {
        self.0
    }

    /// Hand out the current number and advance, wrapping after 255.
    pub fn next_sequence(&mut self) -> u8 {
        let seq = self.0;
        self.0 = self.0.wrapping_add(1);
        seq
    }
}

/// Stamp the header of a packed draft and compute its checksum.
///
/// Returns the number of bytes the frame occupies on the wire.
pub fn finalize(
    msg: &mut Message,
    system_id: u8,
    component_id: u8,
    length: u8,
    sequence: &mut SequenceCounter,
) -> usize {
    msg.length = length;
    msg.system_id = system_id;
    msg.component_id = component_id;
    msg.sequence = sequence.next_sequence();
    let checksum = msg.compute_checksum();
    msg.set_checksum(checksum);
    trace!(
        seq = msg.sequence,
        kind = msg.kind,
        len = length,
        checksum = checksum.value(),
        "finalized message"
    );
    usize::from(length) + FRAME_OVERHEAD
}

/// A sending system/component pair and the sequence counter its frames share.
#[derive(Debug, Clone)]
pub struct Endpoint {
    system_id: u8,
    component_id: u8,
    sequence: SequenceCounter,
}

impl Endpoint {
    pub fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            system_id,
            component_id,
            sequence: SequenceCounter::default(),
        }
    }

    /// Continue numbering from `sequence` instead of zero.
    pub fn with_sequence(mut self, sequence: u8) -> Self {
        self.sequence = SequenceCounter::starting_at(sequence);
        self
    }

    pub fn system_id(&self) -> u8 {
        self.system_id
    }

    pub fn component_id(&self) -> u8 {
        self.component_id
    }

    /// Sequence number the next finalized frame will carry.
    pub fn next_sequence(&self) -> u8 {
        self.sequence.peek()
    }

    /// Finalize `msg` as coming from this endpoint.
    pub fn finalize(&mut self, msg: &mut Message, length: u8) -> usize {
        finalize(
            msg,
            self.system_id,
            self.component_id,
            length,
            &mut self.sequence,
        )
    }

    /// Finalize `msg` using the length already set on it.
    pub fn seal(&mut self, msg: &mut Message) -> usize {
        let length = msg.length;
        self.finalize(msg, length)
    }

    /// Encode a typed message and finalize it.
    ///
    /// The sequence counter only advances when encoding succeeds.
    pub fn pack<T: MessageKind>(&mut self, value: &T) -> Result<Message> {
        let mut msg = Message::new(T::KIND);
        let mut writer = msg.writer();
        value.encode(&mut writer)?;
        let length = writer.position() as u8;
        self.finalize(&mut msg, length);
        Ok(msg)
    }
}
