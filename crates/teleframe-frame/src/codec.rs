use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::message::{Message, STX};

/// Bytes needed to transmit `msg`, for pre-allocating send buffers.
pub fn required_length(msg: &Message) -> usize {
    msg.wire_size()
}

/// Append the wire form of a finalized message to `dst`.
///
/// Wire format:
/// ```text
/// ┌──────┬─────┬─────┬───────┬────────┬──────┬──────────────┬──────┬──────┐
/// │ STX  │ LEN │ SEQ │ SYSID │ COMPID │ KIND │ Payload      │ CK_A │ CK_B │
/// │ 0x55 │ 1B  │ 1B  │ 1B    │ 1B     │ 1B   │ (LEN bytes)  │ low  │ high │
/// └──────┴─────┴─────┴───────┴────────┴──────┴──────────────┴──────┴──────┘
/// ```
///
/// Returns the number of bytes appended.
pub fn encode_message(msg: &Message, dst: &mut BytesMut) -> usize {
    let size = required_length(msg);
    dst.reserve(size);
    dst.put_u8(STX);
    dst.put_slice(&msg.header_bytes());
    dst.put_slice(msg.payload());
    dst.put_slice(&msg.checksum_bytes());
    size
}

/// Stream a finalized message byte by byte into `sink`.
///
/// Suited to sinks that transmit as they go, such as a UART register wrapper.
pub fn write_message<W: Write>(msg: &Message, sink: &mut W) -> Result<usize> {
    sink.write_all(&[STX])?;
    sink.write_all(&msg.header_bytes())?;
    sink.write_all(msg.payload())?;
    sink.write_all(&msg.checksum_bytes())?;
    Ok(required_length(msg))
}

impl Message {
    /// A transmit-ready copy of this message, delimiter included.
    pub fn to_send_buffer(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(required_length(self));
        encode_message(self, &mut buf);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use crate::message::{FRAME_OVERHEAD, MAX_PAYLOAD_LEN};

    fn sample() -> Message {
        let mut msg = Message::with_payload(0, &[0x01, 0x02, 0x03, 0x04]).unwrap();
        Endpoint::new(1, 1).seal(&mut msg);
        msg
    }

    #[test]
    fn send_buffer_layout() {
        let msg = sample();
        let wire = msg.to_send_buffer();
        let [ck_a, ck_b] = msg.checksum_bytes();

        assert_eq!(
            wire.as_ref(),
            &[STX, 4, 0, 1, 1, 0, 1, 2, 3, 4, ck_a, ck_b]
        );
        assert_eq!(wire.len(), required_length(&msg));
    }

    #[test]
    fn empty_payload_is_overhead_only() {
        let mut msg = Message::new(42);
        Endpoint::new(1, 1).seal(&mut msg);
        let wire = msg.to_send_buffer();
        assert_eq!(wire.len(), FRAME_OVERHEAD);
        assert_eq!(wire[1], 0);
        assert_eq!(wire[5], 42);
    }

    #[test]
    fn max_payload_frame() {
        let mut msg = Message::with_payload(1, &[0xA5; MAX_PAYLOAD_LEN]).unwrap();
        Endpoint::new(1, 1).seal(&mut msg);
        assert_eq!(required_length(&msg), 263);
        assert_eq!(msg.to_send_buffer().len(), 263);
    }

    #[test]
    fn encode_appends_to_existing_buffer() {
        let msg = sample();
        let mut buf = BytesMut::new();
        let first = encode_message(&msg, &mut buf);
        let second = encode_message(&msg, &mut buf);
        assert_eq!(first + second, buf.len());
        assert_eq!(buf[..first], buf[first..]);
    }

    #[test]
    fn streamed_bytes_match_buffer() {
        let msg = sample();
        let mut sink = Vec::new();
        let written = write_message(&msg, &mut sink).unwrap();
        assert_eq!(written, sink.len());
        assert_eq!(sink.as_slice(), msg.to_send_buffer().as_ref());
    }
}
