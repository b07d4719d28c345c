//! Byte-level codec for tagwire values.
//!
//! Two layers:
//! - [`varint`]: a length byte followed by a minimal big-endian integer, plus
//!   the length-prefix helpers built on it
//! - [`Codec`]: the composite encoding, where every value is written as its
//!   type identifier followed by a kind-specific payload
//!
//! Decoding is strict. Unknown identifiers, identifiers outside the expected
//! enum family, truncated input and trailing bytes all fail.

pub mod codec;
pub mod error;
pub mod value;
pub mod varint;

pub use codec::{Codec, CodecConfig, DEFAULT_MAX_DEPTH};
pub use error::{CodecError, Result};
pub use value::{Primitive, Value};
pub use varint::{
    encode_varint, pop_length, pop_length_and_slice, pop_varint, pop_varint_u64, push_length,
    put_length_prefixed, put_varint, put_varint_u64, strip_leading_zeros, MAX_VARINT_LEN,
};
