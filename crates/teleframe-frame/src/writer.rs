use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::encode_message;
use crate::endpoint::Endpoint;
use crate::error::{FrameError, Result};
use crate::message::{Message, MessageKind, FRAME_OVERHEAD, MAX_PAYLOAD_LEN};

/// Finalizes and writes messages to any `Write` byte sink.
///
/// Every message sent through [`send`](Self::send) or
/// [`send_kind`](Self::send_kind) takes the next sequence number of the
/// writer's [`Endpoint`].
pub struct FrameWriter<T> {
    inner: T,
    endpoint: Endpoint,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a writer sending as `endpoint`.
    pub fn new(inner: T, endpoint: Endpoint) -> Self {
        Self {
            inner,
            endpoint,
            buf: BytesMut::with_capacity(MAX_PAYLOAD_LEN + FRAME_OVERHEAD),
        }
    }

    /// Finalize a raw payload of the given kind and write it.
    ///
    /// Returns the finalized message.
    pub fn send(&mut self, kind: u8, payload: &[u8]) -> Result<Message> {
        let mut msg = Message::with_payload(kind, payload)?;
        self.endpoint.seal(&mut msg);
        self.write_message(&msg)?;
        Ok(msg)
    }

    /// Encode a typed message, finalize it and write it.
    pub fn send_kind<M: MessageKind>(&mut self, value: &M) -> Result<Message> {
        let msg = self.endpoint.pack(value)?;
        self.write_message(&msg)?;
        Ok(msg)
    }

    /// Write an already-finalized message as is.
    pub fn write_message(&mut self, msg: &Message) -> Result<()> {
        self.buf.clear();
        encode_message(msg, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// The sending identity and its sequence counter.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
