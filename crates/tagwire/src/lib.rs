//! Schema-driven, identifier-tagged binary encoding.
//!
//! A schema is line-oriented text declaring named types of five kinds
//! (Singleton, Record, Enum, List, Builtin). Each bound type gets a stable
//! numeric identifier from its position in sorted-name order, and every
//! encoded value starts with that identifier, so the bytes are
//! self-describing against a shared schema.
//!
//! # Crate Structure
//!
//! - [`schema`]: parser, namespace, identifier table
//! - [`codec`]: varint and composite value encoding
//! - [`frame`]: message framing over blocking byte streams
//! - [`compile()`]: schema text to a ready-to-use [`Schema`]
//! - [`json`]: type-directed JSON mapping for values
//!
//! ```
//! use tagwire::codec::Value;
//!
//! let schema = tagwire::compile("X: Singleton\nY: Singleton\nPoint: Record X Y\n")?;
//! let codec = schema.codec();
//! let point = Value::Record(vec![Value::Singleton, Value::Singleton]);
//! let bytes = codec.encode("Point", &point)?;
//! assert_eq!(codec.decode(&bytes, "Point")?, point);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compile;
pub mod error;
pub mod json;

/// Re-export schema types.
pub mod schema {
    pub use tagwire_schema::*;
}

/// Re-export codec types.
pub mod codec {
    pub use tagwire_codec::*;
}

/// Re-export frame types.
pub mod frame {
    pub use tagwire_frame::*;
}

pub use compile::{compile, compile_file, Schema};
pub use error::{CompileError, JsonError};
