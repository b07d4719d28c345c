use std::io;
use std::path::PathBuf;

use tagwire_schema::{NamespaceError, ParseError};

/// Errors from turning schema text into a ready-to-use [`Schema`](crate::Schema).
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),
}

/// Errors from mapping values to and from JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonError {
    #[error("type {0} is not bound in the namespace")]
    UnknownType(String),

    #[error("{type_name}: expected {expected}, found {found}")]
    Mismatch {
        type_name: String,
        expected: String,
        found: String,
    },

    #[error("{type_name}: {reason}")]
    Invalid { type_name: String, reason: String },
}

impl JsonError {
    pub(crate) fn mismatch(
        type_name: &str,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        JsonError::Mismatch {
            type_name: type_name.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn invalid(type_name: &str, reason: impl Into<String>) -> Self {
        JsonError::Invalid {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}
