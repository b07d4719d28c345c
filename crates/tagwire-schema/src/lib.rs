//! Type-definition language and validated namespace.
//!
//! Schema text holds one definition per line:
//! - `Name: Singleton`: a zero-payload marker
//! - `Name: Record A B ...`: a positional tuple of fields
//! - `Name: Enum A B ...`: exactly one active case
//! - `Name: List A`: a homogeneous sequence
//! - `Name: Builtin Varint|Text|Bytes|Bool`: a primitive
//!
//! [`parse`] turns text into definitions, [`Namespace`] binds and validates
//! them, and [`IdentifierTable`] derives the wire-level type tags.

pub mod definition;
pub mod error;
pub mod identifier;
pub mod namespace;
pub mod parser;

pub use definition::{Arity, Kind, Representation, TypeDefinition, TypeRef, THIS};
pub use error::{NamespaceError, NamespaceResult, ParseError, ParseResult};
pub use identifier::{Identifier, IdentifierTable, FIRST_USER_IDENTIFIER, SINGLETON};
pub use namespace::Namespace;
pub use parser::{parse, parse_line, NAME_DELIMITER};
