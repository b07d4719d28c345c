//! Message framing over blocking byte streams.
//!
//! Every message is framed with:
//! - A 1-byte metacount giving the width of the count field (0 to 8)
//! - The payload length, big-endian, with leading zero bytes stripped
//! - The payload
//!
//! Payloads may optionally have their leading zero bytes stripped before
//! framing; readers restore them by left-padding to an 8-byte boundary.
//! Calls on one stream must not interleave: each read or write moves one
//! whole message.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    compress, decode_message, encode_message, uncompress, Compression, MessageConfig,
    COUNT_WIDTH, DEFAULT_MAX_PAYLOAD,
};
pub use error::{CodecError, Result};
pub use reader::{read_message, read_value, MessageReader};
pub use writer::{send_value, write_message, MessageWriter};
