//! Byte-at-a-time frame parser for one logical channel.
//!
//! Every state has a defined successor for every input byte, so the parser
//! never wedges: noise between frames is skipped, and a frame that fails its
//! checksum is dropped and the parser goes back to hunting for a delimiter.

use tracing::{debug, trace};

use crate::checksum::Checksum;
use crate::message::{Message, STX};

/// Position of the parser within a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    /// Never fed a byte.
    #[default]
    Uninit,
    /// Waiting for a delimiter.
    Idle,
    GotStx,
    GotLength,
    GotSeq,
    GotSysId,
    GotCompId,
    /// Accumulating payload bytes.
    GotMsgId,
    /// Payload complete, expecting the low checksum byte.
    GotPayload,
    /// Expecting the high checksum byte.
    GotCrc1,
}

/// Counters describing what a channel has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Frames accepted.
    pub received: u64,
    /// Frames estimated lost from gaps in sequence numbers.
    pub dropped: u64,
    /// Frames rejected for a checksum mismatch or an overrun.
    pub errors: u64,
    /// Frames rejected because a decoded message was never taken.
    pub overruns: u64,
    /// Sequence number of the last accepted frame.
    pub last_sequence: Option<u8>,
}

impl ChannelStats {
    /// Sequence number expected next, once a baseline exists.
    pub fn expected_sequence(&self) -> Option<u8> {
        self.last_sequence.map(|seq| seq.wrapping_add(1))
    }
}

/// Parse state and loss accounting for one channel.
#[derive(Debug, Clone)]
pub struct ChannelParser {
    state: ParseState,
    partial: Message,
    payload_index: usize,
    checksum: Checksum,
    pending: Option<Message>,
    stats: ChannelStats,
}

impl ChannelParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Uninit,
            partial: Message::new(0),
            payload_index: 0,
            checksum: Checksum::new(),
            pending: None,
            stats: ChannelStats::default(),
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Snapshot of the channel counters.
    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    /// Feed one byte and return the message it completes, if any.
    pub fn parse_byte(&mut self, byte: u8) -> Option<Message> {
        if self.push_byte(byte) {
            self.take_message()
        } else {
            None
        }
    }

    /// Feed every byte of `bytes`, collecting the completed messages.
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Vec<Message> {
        bytes.iter().filter_map(|&b| self.parse_byte(b)).collect()
    }

    /// Decoded message waiting to be taken, if any.
    pub fn take_message(&mut self) -> Option<Message> {
        self.pending.take()
    }

    /// Feed one byte, leaving a completed message pending.
    ///
    /// Returns true when this byte completed a frame. The message stays
    /// available through [`take_message`](Self::take_message); if another
    /// frame starts before it is taken, the new frame is dropped as an
    /// overrun and the pending message is kept.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        match self.state {
            ParseState::Uninit | ParseState::Idle => {
                if byte == STX {
                    self.state = ParseState::GotStx;
                    self.checksum = Checksum::new();
                }
            }
            ParseState::GotStx => {
                if self.pending.is_some() {
                    self.stats.overruns += 1;
                    self.stats.errors += 1;
                    self.state = ParseState::Idle;
                    debug!(
                        overruns = self.stats.overruns,
                        "decoded message was not taken before next frame"
                    );
                } else {
                    self.partial.length = byte;
                    self.payload_index = 0;
                    self.checksum.accumulate(byte);
                    self.state = ParseState::GotLength;
                }
            }
            ParseState::GotLength => {
                self.partial.sequence = byte;
                self.checksum.accumulate(byte);
                self.state = ParseState::GotSeq;
            }
            ParseState::GotSeq => {
                self.partial.system_id = byte;
                self.checksum.accumulate(byte);
                self.state = ParseState::GotSysId;
            }
            ParseState::GotSysId => {
                self.partial.component_id = byte;
                self.checksum.accumulate(byte);
                self.state = ParseState::GotCompId;
            }
            ParseState::GotCompId => {
                self.partial.kind = byte;
                self.checksum.accumulate(byte);
                self.state = if self.partial.length == 0 {
                    ParseState::GotPayload
                } else {
                    ParseState::GotMsgId
                };
            }
            ParseState::GotMsgId => {
                *self.partial.payload_slot(self.payload_index) = byte;
                self.payload_index += 1;
                self.checksum.accumulate(byte);
                if self.payload_index == usize::from(self.partial.length) {
                    self.state = ParseState::GotPayload;
                }
            }
            ParseState::GotPayload => {
                if byte == self.checksum.low() {
                    self.state = ParseState::GotCrc1;
                } else {
                    self.reject(byte, self.checksum.low());
                }
            }
            ParseState::GotCrc1 => {
                if byte == self.checksum.high() {
                    self.accept();
                    return true;
                }
                self.reject(byte, self.checksum.high());
            }
        }
        false
    }

    fn reject(&mut self, got: u8, expected: u8) {
        self.stats.errors += 1;
        self.state = ParseState::Idle;
        trace!(
            got,
            expected,
            kind = self.partial.kind,
            seq = self.partial.sequence,
            errors = self.stats.errors,
            "checksum mismatch, frame dropped"
        );
    }

    fn accept(&mut self) {
        self.state = ParseState::Idle;
        self.partial.set_checksum(self.checksum);

        let seq = self.partial.sequence;
        if let Some(last) = self.stats.last_sequence {
            let gap = seq.wrapping_sub(last).wrapping_sub(1);
            if gap > 0 {
                self.stats.dropped += u64::from(gap);
                debug!(last, seq, gap, "sequence gap");
            }
        }
        self.stats.last_sequence = Some(seq);
        self.stats.received += 1;

        self.pending = Some(self.partial.clone());
    }
}

impl Default for ChannelParser {
    fn default() -> Self {
        Self::new()
    }
}
