use bytes::{Buf, BufMut, Bytes, BytesMut};
use tagwire_codec::{strip_leading_zeros, CodecError, Result};

/// Width of the reconstructed big-endian count, and the alignment that
/// [`uncompress`] restores.
pub const COUNT_WIDTH: usize = 8;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Optional leading-zero stripping applied to a payload before it is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    /// Strip leading zero bytes on write, re-pad to an 8-byte boundary on read.
    StripLeadingZeros,
}

impl Compression {
    /// Payload bytes as they go on the wire.
    pub fn apply(self, payload: &[u8]) -> &[u8] {
        match self {
            Compression::None => payload,
            Compression::StripLeadingZeros => compress(payload),
        }
    }

    /// Payload bytes as the caller sees them after reading.
    pub fn restore(self, payload: Bytes) -> Bytes {
        match self {
            Compression::None => payload,
            Compression::StripLeadingZeros => uncompress(&payload),
        }
    }
}

/// Strip leading zero bytes.
pub fn compress(payload: &[u8]) -> &[u8] {
    strip_leading_zeros(payload)
}

/// Left-pad with zeros to a multiple of [`COUNT_WIDTH`].
///
/// An empty payload is a fully stripped zero and comes back as
/// `COUNT_WIDTH` zero bytes.
pub fn uncompress(payload: &[u8]) -> Bytes {
    if payload.is_empty() {
        return Bytes::from_static(&[0; COUNT_WIDTH]);
    }

    let gap = (COUNT_WIDTH - payload.len() % COUNT_WIDTH) % COUNT_WIDTH;
    let mut restored = BytesMut::with_capacity(gap + payload.len());
    restored.put_bytes(0, gap);
    restored.put_slice(payload);
    restored.freeze()
}

/// Encode one message into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────┬──────────────────────────┬─────────────────┐
/// │ Metacount (1B) │ Count                    │ Payload         │
/// │ 0..=8          │ (Metacount B, BE, no     │ (Count bytes)   │
/// │                │  leading zero bytes)     │                 │
/// └────────────────┴──────────────────────────┴─────────────────┘
/// ```
/// An empty payload is the single byte `0x00`.
pub fn encode_message(payload: &[u8], dst: &mut BytesMut) {
    let count = (payload.len() as u64).to_be_bytes();
    let count = compress(&count);

    dst.reserve(1 + count.len() + payload.len());
    dst.put_u8(count.len() as u8);
    dst.put_slice(count);
    dst.put_slice(payload);
}

/// Decode one message from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete message yet.
/// On success, consumes the message bytes from the buffer.
pub fn decode_message(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    let Some(&metacount) = src.first() else {
        return Ok(None);
    };
    let metacount = check_metacount(metacount)?;

    let header = 1 + metacount;
    if src.len() < header {
        return Ok(None);
    }
    let size = check_size(count_from_be(&src[1..header]), max_payload)?;

    if src.len() < header + size {
        return Ok(None);
    }
    src.advance(header);
    Ok(Some(src.split_to(size).freeze()))
}

/// Validate a metacount byte, returning it as a byte length.
pub(crate) fn check_metacount(metacount: u8) -> Result<usize> {
    let metacount = usize::from(metacount);
    if metacount > COUNT_WIDTH {
        return Err(CodecError::CountTooBig {
            len: metacount,
            max: COUNT_WIDTH,
        });
    }
    Ok(metacount)
}

/// Interpret up to [`COUNT_WIDTH`] big-endian bytes as a count.
pub(crate) fn count_from_be(bytes: &[u8]) -> u64 {
    let mut padded = [0u8; COUNT_WIDTH];
    padded[COUNT_WIDTH - bytes.len()..].copy_from_slice(bytes);
    u64::from_be_bytes(padded)
}

pub(crate) fn check_size(count: u64, max_payload: usize) -> Result<usize> {
    match usize::try_from(count) {
        Ok(size) if size <= max_payload => Ok(size),
        Ok(size) => Err(CodecError::PayloadTooLarge {
            size,
            max: max_payload,
        }),
        Err(_) => Err(CodecError::PayloadTooLarge {
            size: usize::MAX,
            max: max_payload,
        }),
    }
}

/// Configuration for framed message I/O.
#[derive(Debug, Clone)]
pub struct MessageConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
