use std::borrow::Cow;
use std::collections::HashSet;

use bytes::{BufMut, Bytes, BytesMut};
use tagwire_schema::{Identifier, IdentifierTable, Namespace, Representation, TypeDefinition};
use tracing::trace;

use crate::error::{CodecError, Result};
use crate::value::{Primitive, Value};
use crate::varint::{
    pop_length, pop_length_and_slice, pop_varint, pop_varint_u64, put_length_prefixed, put_varint,
    put_varint_u64,
};

/// Default bound on value nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for the composite codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Deepest value nesting accepted when encoding or decoding. Default: 128.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Encodes and decodes values of the types bound in a namespace.
///
/// Every encoded value is `varint(identifier)` followed by a kind-specific
/// payload:
/// - Singleton: nothing
/// - Builtin: the primitive's canonical bytes
/// - Record: each field as `push_length(encode(field))`
/// - List: `varint(count)` then each element as `push_length(encode(element))`
/// - Enum: the encoding of the active case; the case identifier is the
///   discriminant and the enum's own identifier is never written
#[derive(Debug, Clone)]
pub struct Codec<'a> {
    namespace: &'a Namespace,
    identifiers: Cow<'a, IdentifierTable>,
    config: CodecConfig,
}

impl<'a> Codec<'a> {
    /// Create a codec with default configuration.
    pub fn new(namespace: &'a Namespace) -> Self {
        Self::with_config(namespace, CodecConfig::default())
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(namespace: &'a Namespace, config: CodecConfig) -> Self {
        Self {
            namespace,
            identifiers: Cow::Owned(IdentifierTable::assign(namespace)),
            config,
        }
    }

    /// Create a codec reusing an identifier table already assigned from `namespace`.
    pub fn with_identifiers(
        namespace: &'a Namespace,
        identifiers: &'a IdentifierTable,
        config: CodecConfig,
    ) -> Self {
        Self {
            namespace,
            identifiers: Cow::Borrowed(identifiers),
            config,
        }
    }

    pub fn namespace(&self) -> &'a Namespace {
        self.namespace
    }

    pub fn identifiers(&self) -> &IdentifierTable {
        &self.identifiers
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Identifier written in front of values of `type_name`.
    pub fn identifier(&self, type_name: &str) -> Result<Identifier> {
        self.identifiers
            .identifier(type_name)
            .ok_or_else(|| CodecError::UnknownType(type_name.to_string()))
    }

    fn definition(&self, type_name: &str) -> Result<&'a TypeDefinition> {
        self.namespace
            .get(type_name)
            .ok_or_else(|| CodecError::UnknownType(type_name.to_string()))
    }

    fn check_depth(&self, type_name: &str, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(CodecError::conversion(
                type_name,
                format!("nesting deeper than {}", self.config.max_depth),
            ));
        }
        Ok(())
    }

    /// Encode `value` as a value of `type_name`.
    pub fn encode(&self, type_name: &str, value: &Value) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.encode_into(type_name, value, &mut dst)?;
        trace!(type_name, len = dst.len(), "value encoded");
        Ok(dst.freeze())
    }

    /// Append the encoding of `value` to `dst`.
    pub fn encode_into(&self, type_name: &str, value: &Value, dst: &mut BytesMut) -> Result<()> {
        self.put_value(type_name, value, dst, 0)
    }

    fn put_value(
        &self,
        type_name: &str,
        value: &Value,
        dst: &mut BytesMut,
        depth: usize,
    ) -> Result<()> {
        self.check_depth(type_name, depth)?;
        let definition = self.definition(type_name)?;

        if let TypeDefinition::Enum { name, cases } = definition {
            let Value::Enum { case, value } = value else {
                return Err(mismatch(definition, value));
            };
            if !cases
                .iter()
                .any(|candidate| candidate.resolve(name) == case.as_str())
            {
                return Err(CodecError::conversion(
                    name.as_str(),
                    format!("{case} is not a case of {name}"),
                ));
            }
            return self.put_value(case, value, dst, depth);
        }

        put_varint_u64(self.identifier(type_name)?.get(), dst);
        self.put_payload(definition, value, dst, depth)
    }

    fn put_payload(
        &self,
        definition: &TypeDefinition,
        value: &Value,
        dst: &mut BytesMut,
        depth: usize,
    ) -> Result<()> {
        match (definition, value) {
            (TypeDefinition::Singleton { .. }, Value::Singleton) => Ok(()),
            (
                TypeDefinition::Builtin {
                    name,
                    representation,
                },
                Value::Builtin(primitive),
            ) => put_primitive(name, *representation, primitive, dst),
            (TypeDefinition::Record { name, fields }, Value::Record(values)) => {
                if fields.len() != values.len() {
                    return Err(CodecError::conversion(
                        name.as_str(),
                        format!("expected {} fields, found {}", fields.len(), values.len()),
                    ));
                }

                let mut scratch = BytesMut::new();
                for (field, value) in fields.iter().zip(values) {
                    scratch.clear();
                    self.put_value(field.resolve(name), value, &mut scratch, depth + 1)?;
                    put_length_prefixed(&scratch, dst);
                }
                Ok(())
            }
            (TypeDefinition::List { name, element }, Value::List(items)) => {
                put_varint_u64(items.len() as u64, dst);

                let element = element.resolve(name);
                let mut scratch = BytesMut::new();
                for item in items {
                    scratch.clear();
                    self.put_value(element, item, &mut scratch, depth + 1)?;
                    put_length_prefixed(&scratch, dst);
                }
                Ok(())
            }
            (definition, value) => Err(mismatch(definition, value)),
        }
    }

    /// Decode `bytes` as a value of `expected`.
    ///
    /// The whole input must be consumed.
    pub fn decode(&self, bytes: &[u8], expected: &str) -> Result<Value> {
        let value = self.decode_exact(bytes, expected, 0)?;
        trace!(expected, len = bytes.len(), "value decoded");
        Ok(value)
    }

    fn decode_exact(&self, bytes: &[u8], expected: &str, depth: usize) -> Result<Value> {
        let (value, rest) = self.take_value(bytes, expected, depth)?;
        if !rest.is_empty() {
            return Err(CodecError::conversion(
                expected,
                format!("{} trailing bytes", rest.len()),
            ));
        }
        Ok(value)
    }

    fn take_value<'b>(
        &self,
        src: &'b [u8],
        expected: &str,
        depth: usize,
    ) -> Result<(Value, &'b [u8])> {
        self.check_depth(expected, depth)?;
        self.definition(expected)?;

        let (raw, rest) = pop_varint_u64(src)
            .map_err(|_| CodecError::conversion(expected, "malformed identifier"))?;
        let identifier = Identifier::new(raw);

        let actual = self.identifiers.name(identifier).ok_or_else(|| {
            CodecError::conversion(expected, format!("identifier {identifier} is not bound"))
        })?;
        let definition = self.definition(actual)?;
        if let TypeDefinition::Enum { .. } = definition {
            return Err(CodecError::conversion(
                expected,
                format!("identifier {identifier} names enum {actual}, which is never written"),
            ));
        }

        let path = self.case_path(expected, actual).ok_or_else(|| {
            CodecError::conversion(
                expected,
                format!("identifier {identifier} ({actual}) is not valid here"),
            )
        })?;

        let (value, rest) = self.take_payload(definition, rest, depth)?;
        let value = path
            .into_iter()
            .rev()
            .fold(value, |value, case| Value::enum_case(case, value));
        Ok((value, rest))
    }

    /// Case names leading from `expected` down to the concrete type `actual`.
    ///
    /// Empty when they are the same type; `None` when `actual` is not in the
    /// enum family of `expected`. Direct cases win over nested ones.
    fn case_path(&self, expected: &str, actual: &str) -> Option<Vec<&'a str>> {
        if expected == actual {
            return Some(Vec::new());
        }
        let mut visited = HashSet::new();
        self.find_case(expected, actual, &mut visited)
    }

    fn find_case(
        &self,
        enum_name: &str,
        actual: &str,
        visited: &mut HashSet<&'a str>,
    ) -> Option<Vec<&'a str>> {
        let TypeDefinition::Enum { name, cases } = self.namespace.get(enum_name)? else {
            return None;
        };
        if !visited.insert(name.as_str()) {
            return None;
        }

        let mut resolved = cases.iter().map(|case| case.resolve(name));
        if let Some(case) = resolved.clone().find(|case| *case == actual) {
            return Some(vec![case]);
        }

        resolved.find_map(|case| {
            let mut path = self.find_case(case, actual, visited)?;
            path.insert(0, case);
            Some(path)
        })
    }

    fn take_payload<'b>(
        &self,
        definition: &'a TypeDefinition,
        src: &'b [u8],
        depth: usize,
    ) -> Result<(Value, &'b [u8])> {
        match definition {
            TypeDefinition::Singleton { .. } => Ok((Value::Singleton, src)),
            TypeDefinition::Builtin {
                name,
                representation,
            } => {
                let (primitive, rest) = take_primitive(name, *representation, src)?;
                Ok((Value::Builtin(primitive), rest))
            }
            TypeDefinition::Record { name, fields } => {
                let mut values = Vec::with_capacity(fields.len());
                let mut rest = src;
                for (index, field) in fields.iter().enumerate() {
                    let (slice, tail) = pop_length_and_slice(rest).map_err(|_| {
                        CodecError::conversion(name.as_str(), format!("field {index} is truncated"))
                    })?;
                    values.push(self.decode_exact(slice, field.resolve(name), depth + 1)?);
                    rest = tail;
                }
                Ok((Value::Record(values), rest))
            }
            TypeDefinition::List { name, element } => {
                let (count, mut rest) = pop_length(src).map_err(|_| {
                    CodecError::conversion(name.as_str(), "malformed element count")
                })?;
                // Every element carries at least its one-byte length prefix.
                if count > rest.len() {
                    return Err(CodecError::conversion(
                        name.as_str(),
                        format!(
                            "element count {count} exceeds remaining {} bytes",
                            rest.len()
                        ),
                    ));
                }

                let element = element.resolve(name);
                let mut items = Vec::with_capacity(count);
                for index in 0..count {
                    let (slice, tail) = pop_length_and_slice(rest).map_err(|_| {
                        CodecError::conversion(
                            name.as_str(),
                            format!("element {index} is truncated"),
                        )
                    })?;
                    items.push(self.decode_exact(slice, element, depth + 1)?);
                    rest = tail;
                }
                Ok((Value::List(items), rest))
            }
            TypeDefinition::Enum { name, .. } => Err(CodecError::conversion(
                name.as_str(),
                "an enum has no payload of its own",
            )),
        }
    }
}

fn mismatch(definition: &TypeDefinition, value: &Value) -> CodecError {
    CodecError::conversion(
        definition.name(),
        format!(
            "cannot encode a {} value as a {}",
            value.kind(),
            definition.kind()
        ),
    )
}

fn put_primitive(
    name: &str,
    representation: Representation,
    primitive: &Primitive,
    dst: &mut BytesMut,
) -> Result<()> {
    match (representation, primitive) {
        (Representation::Varint, Primitive::Varint(n)) => put_varint(n, dst),
        (Representation::Text, Primitive::Text(text)) => {
            put_varint_u64(text.chars().count() as u64, dst);
            for scalar in text.chars() {
                put_varint_u64(u64::from(u32::from(scalar)), dst);
            }
            Ok(())
        }
        (Representation::Bytes, Primitive::Bytes(bytes)) => {
            dst.put_slice(bytes);
            Ok(())
        }
        (Representation::Bool, Primitive::Bool(value)) => {
            dst.put_u8(u8::from(*value));
            Ok(())
        }
        (representation, primitive) => Err(CodecError::conversion(
            name,
            format!(
                "expected {representation}, found {}",
                primitive.representation()
            ),
        )),
    }
}

fn take_primitive<'b>(
    name: &str,
    representation: Representation,
    src: &'b [u8],
) -> Result<(Primitive, &'b [u8])> {
    match representation {
        Representation::Varint => {
            let (n, rest) =
                pop_varint(src).map_err(|_| CodecError::conversion(name, "malformed varint"))?;
            Ok((Primitive::Varint(n), rest))
        }
        Representation::Text => {
            let (text, rest) = take_text(name, src)?;
            Ok((Primitive::Text(text), rest))
        }
        // Raw bytes run to the end of the enclosing slice.
        Representation::Bytes => Ok((
            Primitive::Bytes(Bytes::copy_from_slice(src)),
            &src[src.len()..],
        )),
        Representation::Bool => match src.split_first() {
            Some((&0, rest)) => Ok((Primitive::Bool(false), rest)),
            Some((&1, rest)) => Ok((Primitive::Bool(true), rest)),
            Some((other, _)) => Err(CodecError::conversion(
                name,
                format!("invalid bool byte {other:#04x}"),
            )),
            None => Err(CodecError::conversion(name, "missing bool byte")),
        },
    }
}

fn take_text<'b>(name: &str, src: &'b [u8]) -> Result<(String, &'b [u8])> {
    let (count, mut rest) =
        pop_length(src).map_err(|_| CodecError::conversion(name, "malformed text length"))?;
    if count > rest.len() {
        return Err(CodecError::conversion(
            name,
            format!("text length {count} exceeds remaining {} bytes", rest.len()),
        ));
    }

    let mut text = String::with_capacity(count);
    for _ in 0..count {
        let (code_point, tail) =
            pop_varint_u64(rest).map_err(|_| CodecError::conversion(name, "truncated text"))?;
        let scalar = u32::try_from(code_point)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                CodecError::conversion(
                    name,
                    format!("{code_point:#x} is not a unicode scalar value"),
                )
            })?;
        text.push(scalar);
        rest = tail;
    }
    Ok((text, rest))
}
