use bytes::{BufMut, Bytes, BytesMut};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{CodecError, Result};

/// Longest representation a single length byte can describe.
pub const MAX_VARINT_LEN: usize = u8::MAX as usize;

const VARINT: &str = "Varint";

/// Minimal big-endian representation of `n`. Zero has no bytes.
pub fn minimal_be_bytes(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        Vec::new()
    } else {
        n.to_bytes_be()
    }
}

/// Strip leading zero bytes from a big-endian integer representation.
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&byte| byte != 0)
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Append the varint encoding of `n`.
///
/// Wire format:
/// ```text
/// ┌──────────┬─────────────────────────────┐
/// │ L (1B)   │ n, big-endian, minimal (L B) │
/// └──────────┴─────────────────────────────┘
/// ```
/// Zero is the single byte `0x00`. Readers reject any representation
/// with a leading zero byte, so each value has exactly one encoding.
pub fn put_varint(n: &BigUint, dst: &mut BytesMut) -> Result<()> {
    put_representation(&minimal_be_bytes(n), dst)
}

/// Append the varint encoding of a machine integer.
pub fn put_varint_u64(n: u64, dst: &mut BytesMut) {
    let bytes = n.to_be_bytes();
    let repr = strip_leading_zeros(&bytes);
    dst.reserve(1 + repr.len());
    dst.put_u8(repr.len() as u8);
    dst.put_slice(repr);
}

fn put_representation(repr: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u8::try_from(repr.len()).map_err(|_| CodecError::CountTooBig {
        len: repr.len(),
        max: MAX_VARINT_LEN,
    })?;
    dst.reserve(1 + repr.len());
    dst.put_u8(len);
    dst.put_slice(repr);
    Ok(())
}

/// Encode `n` as a standalone varint.
pub fn encode_varint(n: &BigUint) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    put_varint(n, &mut dst)?;
    Ok(dst.freeze())
}

/// Read one varint from the front of `src`, returning it with the remainder.
pub fn pop_varint(src: &[u8]) -> Result<(BigUint, &[u8])> {
    let (repr, rest) = pop_representation(src)?;
    Ok((BigUint::from_bytes_be(repr), rest))
}

/// Read one varint that must fit in 64 bits.
pub fn pop_varint_u64(src: &[u8]) -> Result<(u64, &[u8])> {
    let (repr, rest) = pop_representation(src)?;
    if repr.len() > 8 {
        return Err(CodecError::conversion(VARINT, "value exceeds 64 bits"));
    }

    let mut padded = [0u8; 8];
    padded[8 - repr.len()..].copy_from_slice(repr);
    Ok((u64::from_be_bytes(padded), rest))
}

fn pop_representation(src: &[u8]) -> Result<(&[u8], &[u8])> {
    let (&len, rest) = src
        .split_first()
        .ok_or_else(|| CodecError::conversion(VARINT, "missing length byte"))?;
    let len = usize::from(len);
    if rest.len() < len {
        return Err(CodecError::conversion(
            VARINT,
            format!("truncated: need {len} bytes, have {}", rest.len()),
        ));
    }
    let (repr, rest) = rest.split_at(len);
    if repr.first() == Some(&0) {
        return Err(CodecError::conversion(VARINT, "non-minimal encoding"));
    }
    Ok((repr, rest))
}

/// Read a varint and interpret it as a length.
pub fn pop_length(src: &[u8]) -> Result<(usize, &[u8])> {
    let (length, rest) = pop_varint_u64(src)?;
    let length = usize::try_from(length)
        .map_err(|_| CodecError::conversion(VARINT, "length exceeds address space"))?;
    Ok((length, rest))
}

/// Append `payload` prefixed with its own varint byte count.
pub fn put_length_prefixed(payload: &[u8], dst: &mut BytesMut) {
    put_varint_u64(payload.len() as u64, dst);
    dst.put_slice(payload);
}

/// `payload` prefixed with its own varint byte count.
pub fn push_length(payload: &[u8]) -> Bytes {
    let mut dst = BytesMut::with_capacity(payload.len() + 9);
    put_length_prefixed(payload, &mut dst);
    dst.freeze()
}

/// Split a length-prefixed payload off the front of `src`.
///
/// Returns `(payload, remainder)`.
pub fn pop_length_and_slice(src: &[u8]) -> Result<(&[u8], &[u8])> {
    let (length, rest) = pop_length(src)?;
    if length > rest.len() {
        return Err(CodecError::conversion(
            VARINT,
            format!(
                "length prefix {length} exceeds remaining {} bytes",
                rest.len()
            ),
        ));
    }
    Ok(rest.split_at(length))
}
