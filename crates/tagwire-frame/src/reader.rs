use std::io::{ErrorKind, Read};

use bytes::Bytes;
use tagwire_codec::{Codec, Value};
use tracing::trace;

use crate::codec::{
    check_metacount, check_size, count_from_be, Compression, MessageConfig, COUNT_WIDTH,
};
use crate::error::{closed, CodecError, Result};

/// Reads complete messages from any `Read` stream.
///
/// Each read consumes exactly one message and nothing past it, so the
/// stream can be handed to other code between messages. A stream that ends
/// at any framing stage fails the whole read with `ReadFailed`.
pub struct MessageReader<T> {
    inner: T,
    config: MessageConfig,
}

impl<T: Read> MessageReader<T> {
    /// Create a new message reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, MessageConfig::default())
    }

    /// Create a new message reader with explicit configuration.
    pub fn with_config(inner: T, config: MessageConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next message payload (blocking).
    pub fn read_message(&mut self) -> Result<Bytes> {
        self.read(Compression::None)
    }

    /// Read the next message and re-pad its stripped leading zeros.
    pub fn read_compressed(&mut self) -> Result<Bytes> {
        self.read(Compression::StripLeadingZeros)
    }

    /// Read the next message, undoing `compression`.
    pub fn read(&mut self, compression: Compression) -> Result<Bytes> {
        let payload = read_framed(&mut self.inner, self.config.max_payload_size)?;
        trace!(len = payload.len(), ?compression, "message read");
        Ok(compression.restore(payload))
    }

    /// Read the next message and decode it as a value of `expected`.
    pub fn read_value(&mut self, codec: &Codec<'_>, expected: &str) -> Result<Value> {
        let payload = self.read_message()?;
        codec.decode(&payload, expected)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent reads.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current message reader configuration.
    pub fn config(&self) -> &MessageConfig {
        &self.config
    }
}

/// Read one uncompressed message from `reader` with the default size limit.
pub fn read_message<R: Read + ?Sized>(reader: &mut R) -> Result<Bytes> {
    read_framed(reader, MessageConfig::default().max_payload_size)
}

/// Read one message from `reader` and decode it as a value of `expected`.
pub fn read_value<R: Read + ?Sized>(
    reader: &mut R,
    codec: &Codec<'_>,
    expected: &str,
) -> Result<Value> {
    let payload = read_message(reader)?;
    codec.decode(&payload, expected)
}

fn read_framed<R: Read + ?Sized>(reader: &mut R, max_payload: usize) -> Result<Bytes> {
    let mut metacount = [0u8; 1];
    fill(reader, &mut metacount)?;
    let metacount = check_metacount(metacount[0])?;

    let mut count = [0u8; COUNT_WIDTH];
    fill(reader, &mut count[..metacount])?;
    let size = check_size(count_from_be(&count[..metacount]), max_payload)?;

    let mut payload = vec![0u8; size];
    fill(reader, &mut payload)?;
    Ok(Bytes::from(payload))
}

fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => closed(),
        _ => CodecError::ReadFailed(err),
    })
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use bytes::BytesMut;
    use tagwire_schema::{parse, Namespace};

    use super::*;
    use crate::codec::encode_message;

    fn wire(payloads: &[&[u8]]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for payload in payloads {
            encode_message(payload, &mut buf);
        }
        buf.to_vec()
    }

    #[test]
    fn read_single_message() {
        let mut reader = MessageReader::new(Cursor::new(wire(&[b"hello"])));
        assert_eq!(reader.read_message().unwrap().as_ref(), b"hello");
    }

    #[test]
    fn read_multiple_messages() {
        let mut reader = MessageReader::new(Cursor::new(wire(&[b"one", b"", b"three"])));
        assert_eq!(reader.read_message().unwrap().as_ref(), b"one");
        assert!(reader.read_message().unwrap().is_empty());
        assert_eq!(reader.read_message().unwrap().as_ref(), b"three");
    }

    #[test]
    fn read_consumes_exactly_one_message() {
        let mut bytes = wire(&[b"first"]);
        bytes.extend_from_slice(b"rest");

        let mut cursor = Cursor::new(bytes);
        assert_eq!(read_message(&mut cursor).unwrap().as_ref(), b"first");
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn read_large_message() {
        let payload = vec![0xAB; 64 * 1024];
        let mut reader = MessageReader::new(Cursor::new(wire(&[&payload])));
        assert_eq!(reader.read_message().unwrap().as_ref(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(&[b"slow"]),
            pos: 0,
        };
        let mut reader = MessageReader::new(byte_reader);
        assert_eq!(reader.read_message().unwrap().as_ref(), b"slow");
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let flaky = InterruptingReader {
            inner: Cursor::new(wire(&[b"again"])),
            interrupt_next: true,
        };
        let mut reader = MessageReader::new(flaky);
        assert_eq!(reader.read_message().unwrap().as_ref(), b"again");
    }

    #[test]
    fn short_read_at_every_stage_fails() {
        let full = wire(&[b"hello"]);
        for len in 0..full.len() {
            let mut reader = MessageReader::new(Cursor::new(full[..len].to_vec()));
            let err = reader.read_message().unwrap_err();
            assert!(
                matches!(&err, CodecError::ReadFailed(source) if source.kind() == ErrorKind::UnexpectedEof),
                "len {len}: {err:?}"
            );
        }
    }

    #[test]
    fn channel_error_is_read_failed() {
        let mut reader = MessageReader::new(BrokenReader);
        assert!(matches!(
            reader.read_message(),
            Err(CodecError::ReadFailed(source)) if source.kind() == ErrorKind::ConnectionReset
        ));
    }

    #[test]
    fn oversized_message_in_stream() {
        let cfg = MessageConfig {
            max_payload_size: 16,
        };
        let mut reader = MessageReader::with_config(Cursor::new(vec![0x02, 0x04, 0x00]), cfg);
        let err = reader.read_message().unwrap_err();
        assert!(matches!(
            err,
            CodecError::PayloadTooLarge {
                size: 1024,
                max: 16
            }
        ));
    }

    #[test]
    fn metacount_past_eight_fails() {
        let mut reader = MessageReader::new(Cursor::new(vec![0xFF]));
        assert!(matches!(
            reader.read_message(),
            Err(CodecError::CountTooBig { len: 255, .. })
        ));
    }

    #[test]
    fn compressed_read_repads_to_word() {
        let mut reader = MessageReader::new(Cursor::new(wire(&[&[0x2A], b""])));
        assert_eq!(
            reader.read_compressed().unwrap().as_ref(),
            &42u64.to_be_bytes()
        );
        assert_eq!(reader.read_compressed().unwrap().as_ref(), &[0u8; 8]);
    }

    #[test]
    fn read_value_decodes_payload() {
        let namespace = Namespace::build(parse("Flag: Builtin Bool\n").unwrap()).unwrap();
        let codec = Codec::new(&namespace);
        let encoded = codec.encode("Flag", &Value::bool(true)).unwrap();

        let mut reader = MessageReader::new(Cursor::new(wire(&[&encoded])));
        assert_eq!(
            reader.read_value(&codec, "Flag").unwrap(),
            Value::bool(true)
        );

        let mut cursor = Cursor::new(wire(&[b"\x01\x06\x07"]));
        assert!(matches!(
            read_value(&mut cursor, &codec, "Flag"),
            Err(CodecError::ConversionFailed { .. })
        ));
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptingReader {
        inner: Cursor<Vec<u8>>,
        interrupt_next: bool,
    }

    impl Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt_next = !self.interrupt_next;
            if !self.interrupt_next {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::ConnectionReset))
        }
    }

    #[cfg(unix)]
    #[test]
    fn roundtrip_over_socket_pair() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::MessageWriter::new(left);
        let mut reader = MessageReader::new(right);

        writer.send(b"ping").unwrap();
        writer.send_compressed(&7u64.to_be_bytes()).unwrap();

        assert_eq!(reader.read_message().unwrap().as_ref(), b"ping");
        assert_eq!(reader.read_compressed().unwrap().as_ref(), &7u64.to_be_bytes());
    }
}
