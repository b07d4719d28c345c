//! Framing shares the codec's error type: a message is either moved or it
//! fails with `ReadFailed`, `WriteFailed`, `CountTooBig` or `PayloadTooLarge`,
//! and typed messages add the codec's own conversion failures.

pub use tagwire_codec::error::{CodecError, Result};

use std::io::{Error, ErrorKind};

/// The error a reader reports when the channel ends mid-message.
pub(crate) fn closed() -> CodecError {
    CodecError::ReadFailed(Error::new(
        ErrorKind::UnexpectedEof,
        "channel closed before a complete message",
    ))
}

/// The error a writer reports when the channel stops accepting bytes.
pub(crate) fn stalled() -> CodecError {
    CodecError::WriteFailed(Error::from(ErrorKind::WriteZero))
}
