use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tagwire_codec::{Codec, Value};
use tracing::trace;

use crate::codec::{encode_message, Compression, MessageConfig};
use crate::error::{stalled, CodecError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete messages to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    config: MessageConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, MessageConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: MessageConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Frame and send a payload as-is (blocking).
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.write(payload, Compression::None)
    }

    /// Strip the payload's leading zero bytes, then frame and send it.
    pub fn send_compressed(&mut self, payload: &[u8]) -> Result<()> {
        self.write(payload, Compression::StripLeadingZeros)
    }

    /// Apply `compression`, then frame and send the payload.
    pub fn write(&mut self, payload: &[u8], compression: Compression) -> Result<()> {
        let payload = compression.apply(payload);
        if payload.len() > self.config.max_payload_size {
            return Err(CodecError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_message(payload, &mut self.buf);
        write_all(&mut self.inner, &self.buf)?;
        flush(&mut self.inner)?;

        trace!(len = payload.len(), ?compression, "message written");
        Ok(())
    }

    /// Encode `value` as a `type_name` and send it as one message.
    pub fn send_value(&mut self, codec: &Codec<'_>, type_name: &str, value: &Value) -> Result<()> {
        let encoded = codec.encode(type_name, value)?;
        self.send(&encoded)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        flush(&mut self.inner)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent writes.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current message writer configuration.
    pub fn config(&self) -> &MessageConfig {
        &self.config
    }
}

/// Frame `payload` uncompressed and write it to `writer`.
pub fn write_message<W: Write + ?Sized>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let max = MessageConfig::default().max_payload_size;
    if payload.len() > max {
        return Err(CodecError::PayloadTooLarge {
            size: payload.len(),
            max,
        });
    }

    let mut buf = BytesMut::with_capacity(payload.len() + 9);
    encode_message(payload, &mut buf);
    write_all(writer, &buf)?;
    flush(writer)
}

/// Encode `value` and write it to `writer` as one message.
pub fn send_value<W: Write + ?Sized>(
    writer: &mut W,
    codec: &Codec<'_>,
    type_name: &str,
    value: &Value,
) -> Result<()> {
    let encoded = codec.encode(type_name, value)?;
    write_message(writer, &encoded)
}

fn write_all<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match writer.write(&bytes[offset..]) {
            Ok(0) => return Err(stalled()),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(CodecError::WriteFailed(err)),
        }
    }
    Ok(())
}

fn flush<W: Write + ?Sized>(writer: &mut W) -> Result<()> {
    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(CodecError::WriteFailed(err)),
        }
    }
}
