use std::fs;
use std::path::Path;

use tagwire_codec::{Codec, CodecConfig};
use tagwire_schema::{parse, IdentifierTable, Namespace};
use tracing::debug;

use crate::error::CompileError;

/// A parsed, validated namespace with its identifier table.
///
/// Immutable once built, so a `&Schema` can be shared across threads.
#[derive(Debug, Clone)]
pub struct Schema {
    namespace: Namespace,
    identifiers: IdentifierTable,
}

impl Schema {
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn identifiers(&self) -> &IdentifierTable {
        &self.identifiers
    }

    /// A codec over this schema with default configuration.
    pub fn codec(&self) -> Codec<'_> {
        self.codec_with_config(CodecConfig::default())
    }

    pub fn codec_with_config(&self, config: CodecConfig) -> Codec<'_> {
        Codec::with_identifiers(&self.namespace, &self.identifiers, config)
    }

    /// Canonical schema text, one definition per line in sorted-name order.
    pub fn render(&self) -> String {
        self.namespace.render()
    }
}

/// Parse, bind, validate and number the types in `text`.
pub fn compile(text: &str) -> Result<Schema, CompileError> {
    let definitions = parse(text)?;
    let namespace = Namespace::build(definitions)?;
    namespace.validate()?;
    let identifiers = IdentifierTable::assign(&namespace);

    debug!(types = namespace.len(), "schema compiled");
    Ok(Schema {
        namespace,
        identifiers,
    })
}

/// [`compile`] the contents of a schema file.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Schema, CompileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CompileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    compile(&text)
}

#[cfg(test)]
mod tests {
    use tagwire_schema::{Identifier, NamespaceError, ParseError};

    use super::*;

    #[test]
    fn compile_runs_every_stage() {
        let schema = compile("X: Singleton\nY: Singleton\nPoint: Record X Y\n").unwrap();
        assert_eq!(schema.namespace().len(), 3);
        assert_eq!(
            schema.identifiers().identifier("Point"),
            Some(Identifier::new(6))
        );
        assert_eq!(schema.codec().identifiers(), schema.identifiers());
    }

    #[test]
    fn parse_failure_is_reported() {
        assert!(matches!(
            compile("X Singleton"),
            Err(CompileError::Parse(ParseError::BadName { line: 1 }))
        ));
    }

    #[test]
    fn duplicate_binding_is_reported() {
        assert!(matches!(
            compile("X: Singleton\nX: Singleton\n"),
            Err(CompileError::Namespace(NamespaceError::DuplicateBinding { .. }))
        ));
    }

    #[test]
    fn undefined_reference_is_reported() {
        assert!(matches!(
            compile("Point: Record X Y\nX: Singleton\n"),
            Err(CompileError::Namespace(NamespaceError::UndefinedType(name))) if name == "Y"
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = compile_file("/nonexistent/tagwire/schema.tw").unwrap_err();
        assert!(matches!(err, CompileError::Read { .. }));
        assert!(err.to_string().contains("schema.tw"));
    }

    #[test]
    fn render_is_canonical() {
        let schema = compile("B: Singleton\nA: List B\n").unwrap();
        assert_eq!(schema.render(), "A: List B\nB: Singleton\n");
    }
}
