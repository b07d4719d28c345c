use crate::definition::{Arity, Kind, TypeDefinition};

/// Errors produced while parsing schema text. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first token does not end with the `:` name delimiter, or the name is empty.
    #[error("line {line}: type name must be followed by ':'")]
    BadName { line: usize },

    /// The definition has the wrong number of arguments for its kind.
    #[error("line {line}: {kind} takes {expected}, found {found}")]
    BadArgumentCount {
        line: usize,
        kind: Kind,
        expected: Arity,
        found: usize,
    },

    /// The name is not followed by a kind keyword.
    #[error("line {line}: missing kind after type name")]
    MissingKind { line: usize },

    /// The kind keyword is not one of the known kinds.
    #[error("line {line}: unknown kind {kind:?}")]
    UnknownKind { line: usize, kind: String },

    /// A `Builtin` names a representation that does not exist.
    #[error("line {line}: unknown builtin representation {representation:?}")]
    UnknownRepresentation { line: usize, representation: String },
}

/// Errors produced while building or validating a namespace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    /// A second definition claimed an already-bound name.
    #[error("duplicate binding for {name}: `{new}` conflicts with `{old}`")]
    DuplicateBinding {
        name: String,
        new: Box<TypeDefinition>,
        old: Box<TypeDefinition>,
    },

    /// A referenced type name has no binding.
    #[error("undefined type: {0}")]
    UndefinedType(String),

    /// The name is reserved and cannot be bound.
    #[error("reserved name cannot be bound: {0}")]
    ReservedName(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

pub type NamespaceResult<T> = std::result::Result<T, NamespaceError>;
