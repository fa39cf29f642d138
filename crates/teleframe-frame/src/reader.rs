use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::message::Message;
use crate::parser::{ChannelParser, ChannelStats};

/// Reads decoded messages from any `Read` byte source.
///
/// Bytes are pulled in chunks and pushed through a [`ChannelParser`], so
/// noise and corrupt frames are skipped the same way as on a live link.
pub struct FrameReader<T> {
    inner: T,
    parser: ChannelParser,
    ready: VecDeque<Message>,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            parser: ChannelParser::new(),
            ready: VecDeque::new(),
            config,
        }
    }

    /// Read the next decoded message (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when the source is
    /// exhausted, including when it ends partway through a frame.
    pub fn read_message(&mut self) -> Result<Message> {
        let mut chunk = vec![0u8; self.config.read_chunk_size.max(1)];
        loop {
            if let Some(msg) = self.ready.pop_front() {
                return Ok(msg);
            }

            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.ready.extend(self.parser.parse_bytes(&chunk[..read]));
        }
    }

    /// Counters of the underlying parser.
    pub fn stats(&self) -> ChannelStats {
        self.parser.stats()
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Message>;

    /// Yields messages until the source is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_message() {
            Err(FrameError::ConnectionClosed) => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::endpoint::Endpoint;

    fn wire(ep: &mut Endpoint, kind: u8, payload: &[u8]) -> Vec<u8> {
        let mut msg = Message::with_payload(kind, payload).unwrap();
        ep.seal(&mut msg);
        msg.to_send_buffer().to_vec()
    }

    #[test]
    fn read_single_message() {
        let bytes = wire(&mut Endpoint::new(1, 1), 1, b"hello");
        let mut reader = FrameReader::new(Cursor::new(bytes));
        let msg = reader.read_message().unwrap();

        assert_eq!(msg.kind, 1);
        assert_eq!(msg.payload(), b"hello");
    }

    #[test]
    fn read_multiple_messages_from_one_chunk() {
        let mut ep = Endpoint::new(1, 1);
        let mut bytes = wire(&mut ep, 1, b"one");
        bytes.extend(wire(&mut ep, 2, b"two"));
        bytes.extend(wire(&mut ep, 3, b"three"));

        let reader = FrameReader::new(Cursor::new(bytes));
        let msgs: Vec<_> = reader.map(|m| m.unwrap()).collect();

        assert_eq!(msgs.len(), 3);
        assert_eq!((msgs[0].kind, msgs[0].payload()), (1, b"one".as_ref()));
        assert_eq!((msgs[1].kind, msgs[1].payload()), (2, b"two".as_ref()));
        assert_eq!((msgs[2].kind, msgs[2].payload()), (3, b"three".as_ref()));
    }

    #[test]
    fn partial_read_handling() {
        let bytes = wire(&mut Endpoint::new(1, 1), 4, b"slow");
        let mut reader = FrameReader::new(ByteByByteReader { bytes, pos: 0 });

        let msg = reader.read_message().unwrap();
        assert_eq!(msg.kind, 4);
        assert_eq!(msg.payload(), b"slow");
    }

    #[test]
    fn small_chunks_split_frames() {
        let mut ep = Endpoint::new(1, 1);
        let mut bytes = wire(&mut ep, 1, &[0xAA; 40]);
        bytes.extend(wire(&mut ep, 1, &[0xBB; 40]));

        let cfg = FrameConfig { read_chunk_size: 7 };
        let mut reader = FrameReader::with_config(Cursor::new(bytes), cfg);
        assert_eq!(reader.read_message().unwrap().payload(), &[0xAA; 40]);
        assert_eq!(reader.read_message().unwrap().payload(), &[0xBB; 40]);
        assert_eq!(reader.stats().received, 2);
    }

    #[test]
    fn corrupt_frames_are_skipped() {
        let mut ep = Endpoint::new(1, 1);
        let mut bytes = wire(&mut ep, 1, b"bad");
        bytes[6] ^= 0x80;
        bytes.extend(wire(&mut ep, 1, b"good"));

        let mut reader = FrameReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_message().unwrap().payload(), b"good");
        assert_eq!(reader.stats().errors, 1);
        assert!(matches!(
            reader.read_message(),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let bytes = wire(&mut Endpoint::new(1, 1), 2, b"only-part");
        let mut reader = FrameReader::new(Cursor::new(bytes[..8].to_vec()));
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = FrameReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        assert_eq!(reader.config(), &FrameConfig::default());
        let _inner = reader.into_inner();
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = FailOnceThenData {
            kind: ErrorKind::WouldBlock,
            failed: false,
            bytes: wire(&mut Endpoint::new(1, 1), 7, b"ok"),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let err = framed.read_message().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = FailOnceThenData {
            kind: ErrorKind::Interrupted,
            failed: false,
            bytes: wire(&mut Endpoint::new(1, 1), 8, b"ok"),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let msg = framed.read_message().unwrap();

        assert_eq!(msg.kind, 8);
        assert_eq!(msg.payload(), b"ok");
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct FailOnceThenData {
        kind: ErrorKind,
        failed: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for FailOnceThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::from(self.kind));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
