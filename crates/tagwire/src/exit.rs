use std::fmt;
use std::io;

use tagwire::codec::CodecError;
use tagwire::{CompileError, JsonError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const NOT_FOUND: i32 = 51;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn compile_error(context: &str, err: CompileError) -> CliError {
    match err {
        CompileError::Read { source, .. } => io_error(context, source),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::ReadFailed(source) | CodecError::WriteFailed(source) => {
            io_error(context, source)
        }
        CodecError::UnknownType(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn json_error(context: &str, err: JsonError) -> CliError {
    match err {
        JsonError::UnknownType(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}
