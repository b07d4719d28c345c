use bytes::Bytes;
use num_bigint::BigUint;
use tagwire_schema::{Kind, Representation};

/// A runtime primitive held by a `Builtin` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Varint(BigUint),
    Text(String),
    Bytes(Bytes),
    Bool(bool),
}

impl Primitive {
    pub fn representation(&self) -> Representation {
        match self {
            Primitive::Varint(_) => Representation::Varint,
            Primitive::Text(_) => Representation::Text,
            Primitive::Bytes(_) => Representation::Bytes,
            Primitive::Bool(_) => Representation::Bool,
        }
    }
}

/// A value shaped like the type graph.
///
/// Values carry no type names except for the active case of an enum;
/// the codec supplies the type when encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The only value of a `Singleton` type.
    Singleton,
    /// Field values in declared order.
    Record(Vec<Value>),
    /// The active case, by type name, and its value.
    Enum { case: String, value: Box<Value> },
    /// Elements in order.
    List(Vec<Value>),
    Builtin(Primitive),
}

impl Value {
    pub fn enum_case(case: impl Into<String>, value: Value) -> Self {
        Value::Enum {
            case: case.into(),
            value: Box::new(value),
        }
    }

    pub fn varint(n: impl Into<BigUint>) -> Self {
        Value::Builtin(Primitive::Varint(n.into()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Value::Builtin(Primitive::Text(text.into()))
    }

    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Value::Builtin(Primitive::Bytes(bytes.into()))
    }

    pub fn bool(value: bool) -> Self {
        Value::Builtin(Primitive::Bool(value))
    }

    /// The kind of type this value can be encoded as.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Singleton => Kind::Singleton,
            Value::Record(_) => Kind::Record,
            Value::Enum { .. } => Kind::Enum,
            Value::List(_) => Kind::List,
            Value::Builtin(_) => Kind::Builtin,
        }
    }
}

impl From<Primitive> for Value {
    fn from(primitive: Primitive) -> Self {
        Value::Builtin(primitive)
    }
}
