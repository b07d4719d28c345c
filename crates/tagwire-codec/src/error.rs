/// Errors that can occur while encoding, decoding, or moving values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Bytes could not be converted to or from a value of the named type.
    #[error("conversion failed for {type_name}: {reason}")]
    ConversionFailed { type_name: String, reason: String },

    /// The channel failed or ended before a complete message was read.
    #[error("read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// The channel failed while writing a message.
    #[error("write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// A length field needs more bytes than its single length byte allows.
    #[error("count too big ({len} bytes, max {max})")]
    CountTooBig { len: usize, max: usize },

    /// Encoding was requested for a type the namespace does not bind.
    #[error("type {0} is not bound in the namespace")]
    UnknownType(String),

    /// A message payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

impl CodecError {
    pub fn conversion(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::ConversionFailed {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
