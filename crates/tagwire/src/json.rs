//! Type-directed mapping between [`Value`]s and JSON.
//!
//! | Kind | JSON |
//! |---|---|
//! | Singleton | `null` |
//! | Record, List | array |
//! | Enum | object with exactly one key, the active case name |
//! | Varint | number, or a decimal string when it does not fit in `u64` |
//! | Text | string |
//! | Bytes | lowercase hex string |
//! | Bool | `true` / `false` |

use std::fmt::Write as _;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde_json::{Map, Value as Json};
use tagwire_codec::{Primitive, Value};
use tagwire_schema::{Namespace, Representation, TypeDefinition};

use crate::error::JsonError;

/// Build a value of `type_name` from its JSON form.
pub fn value_from_json(
    namespace: &Namespace,
    type_name: &str,
    json: &Json,
) -> Result<Value, JsonError> {
    let definition = namespace
        .get(type_name)
        .ok_or_else(|| JsonError::UnknownType(type_name.to_string()))?;

    match definition {
        TypeDefinition::Singleton { name } => match json {
            Json::Null => Ok(Value::Singleton),
            other => Err(JsonError::mismatch(name, "null", json_kind(other))),
        },
        TypeDefinition::Record { name, fields } => {
            let items = expect_array(name, json)?;
            if items.len() != fields.len() {
                return Err(JsonError::invalid(
                    name,
                    format!("expected {} fields, found {}", fields.len(), items.len()),
                ));
            }
            let values = fields
                .iter()
                .zip(items)
                .map(|(field, item)| value_from_json(namespace, field.resolve(name), item))
                .collect::<Result<_, _>>()?;
            Ok(Value::Record(values))
        }
        TypeDefinition::List { name, element } => {
            let element = element.resolve(name);
            let values = expect_array(name, json)?
                .iter()
                .map(|item| value_from_json(namespace, element, item))
                .collect::<Result<_, _>>()?;
            Ok(Value::List(values))
        }
        TypeDefinition::Enum { name, cases } => {
            let (case, inner) = single_entry(name, json)?;
            let case = cases
                .iter()
                .map(|candidate| candidate.resolve(name))
                .find(|candidate| *candidate == case.as_str())
                .ok_or_else(|| JsonError::invalid(name, format!("{case} is not a case")))?;
            let inner = value_from_json(namespace, case, inner)?;
            Ok(Value::enum_case(case, inner))
        }
        TypeDefinition::Builtin {
            name,
            representation,
        } => primitive_from_json(name, *representation, json).map(Value::Builtin),
    }
}

fn primitive_from_json(
    name: &str,
    representation: Representation,
    json: &Json,
) -> Result<Primitive, JsonError> {
    match (representation, json) {
        (Representation::Varint, Json::Number(number)) => number
            .as_u64()
            .map(|n| Primitive::Varint(BigUint::from(n)))
            .ok_or_else(|| {
                JsonError::invalid(name, format!("{number} is not a non-negative integer"))
            }),
        (Representation::Varint, Json::String(digits)) => digits
            .parse::<BigUint>()
            .map(Primitive::Varint)
            .map_err(|err| JsonError::invalid(name, format!("{digits:?}: {err}"))),
        (Representation::Text, Json::String(text)) => Ok(Primitive::Text(text.clone())),
        (Representation::Bytes, Json::String(hex)) => decode_hex(hex)
            .map(|bytes| Primitive::Bytes(bytes.into()))
            .map_err(|reason| JsonError::invalid(name, reason)),
        (Representation::Bool, Json::Bool(value)) => Ok(Primitive::Bool(*value)),
        (representation, other) => Err(JsonError::mismatch(
            name,
            expected_json(representation),
            json_kind(other),
        )),
    }
}

/// Render a value of `type_name` as JSON.
pub fn value_to_json(
    namespace: &Namespace,
    type_name: &str,
    value: &Value,
) -> Result<Json, JsonError> {
    let definition = namespace
        .get(type_name)
        .ok_or_else(|| JsonError::UnknownType(type_name.to_string()))?;

    match (definition, value) {
        (TypeDefinition::Singleton { .. }, Value::Singleton) => Ok(Json::Null),
        (TypeDefinition::Record { name, fields }, Value::Record(values)) => {
            if fields.len() != values.len() {
                return Err(JsonError::invalid(
                    name,
                    format!("expected {} fields, found {}", fields.len(), values.len()),
                ));
            }
            fields
                .iter()
                .zip(values)
                .map(|(field, value)| value_to_json(namespace, field.resolve(name), value))
                .collect::<Result<_, _>>()
                .map(Json::Array)
        }
        (TypeDefinition::List { name, element }, Value::List(items)) => {
            let element = element.resolve(name);
            items
                .iter()
                .map(|item| value_to_json(namespace, element, item))
                .collect::<Result<_, _>>()
                .map(Json::Array)
        }
        (TypeDefinition::Enum { name, cases }, Value::Enum { case, value }) => {
            if !cases
                .iter()
                .any(|candidate| candidate.resolve(name) == case.as_str())
            {
                return Err(JsonError::invalid(name, format!("{case} is not a case")));
            }
            let mut object = Map::new();
            object.insert(case.clone(), value_to_json(namespace, case, value)?);
            Ok(Json::Object(object))
        }
        (
            TypeDefinition::Builtin {
                name,
                representation,
            },
            Value::Builtin(primitive),
        ) => primitive_to_json(name, *representation, primitive),
        (definition, value) => Err(JsonError::mismatch(
            definition.name(),
            definition.kind().as_str(),
            value.kind().as_str(),
        )),
    }
}

fn primitive_to_json(
    name: &str,
    representation: Representation,
    primitive: &Primitive,
) -> Result<Json, JsonError> {
    if representation != primitive.representation() {
        return Err(JsonError::mismatch(
            name,
            representation.as_str(),
            primitive.representation().as_str(),
        ));
    }

    Ok(match primitive {
        Primitive::Varint(n) => match n.to_u64() {
            Some(small) => Json::from(small),
            None => Json::String(n.to_str_radix(10)),
        },
        Primitive::Text(text) => Json::String(text.clone()),
        Primitive::Bytes(bytes) => Json::String(encode_hex(bytes)),
        Primitive::Bool(value) => Json::Bool(*value),
    })
}

fn expect_array<'j>(name: &str, json: &'j Json) -> Result<&'j Vec<Json>, JsonError> {
    match json {
        Json::Array(items) => Ok(items),
        other => Err(JsonError::mismatch(name, "array", json_kind(other))),
    }
}

fn single_entry<'j>(name: &str, json: &'j Json) -> Result<(&'j String, &'j Json), JsonError> {
    let Json::Object(object) = json else {
        return Err(JsonError::mismatch(name, "object", json_kind(json)));
    };
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(JsonError::invalid(
            name,
            format!("expected exactly one case key, found {}", object.len()),
        )),
    }
}

fn expected_json(representation: Representation) -> &'static str {
    match representation {
        Representation::Varint => "number or decimal string",
        Representation::Text => "string",
        Representation::Bytes => "hex string",
        Representation::Bool => "bool",
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Lowercase hex without separators.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Parse hex digits, ignoring ASCII whitespace between byte pairs.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let high = hex_digit(pair[0])?;
            let low = hex_digit(pair[1])?;
            Ok((high << 4) | low)
        })
        .collect()
}

fn hex_digit(byte: u8) -> Result<u8, String> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        other => Err(format!("invalid hex digit {:?}", char::from(other))),
    }
}
