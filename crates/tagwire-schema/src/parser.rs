use crate::definition::{Kind, Representation, TypeDefinition, TypeRef};
use crate::error::{ParseError, ParseResult};

/// Character that terminates a type name.
pub const NAME_DELIMITER: char = ':';

/// Parse schema text into type definitions, one per non-blank line.
///
/// Grammar:
/// ```text
/// Name: Kind arg1 arg2 ...
/// ```
///
/// The first malformed line aborts the whole parse.
pub fn parse(text: &str) -> ParseResult<Vec<TypeDefinition>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

/// Parse a single definition line. `line` is only used for error reporting.
pub fn parse_line(line: usize, text: &str) -> ParseResult<TypeDefinition> {
    let mut tokens = text.split_whitespace();

    let name = tokens
        .next()
        .and_then(|token| token.strip_suffix(NAME_DELIMITER))
        .filter(|name| !name.is_empty() && !name.contains(NAME_DELIMITER))
        .ok_or(ParseError::BadName { line })?
        .to_string();

    let keyword = tokens.next().ok_or(ParseError::MissingKind { line })?;
    let kind = Kind::from_keyword(keyword).ok_or_else(|| ParseError::UnknownKind {
        line,
        kind: keyword.to_string(),
    })?;

    let args: Vec<&str> = tokens.collect();
    let expected = kind.arity();
    if !expected.admits(args.len()) {
        return Err(ParseError::BadArgumentCount {
            line,
            kind,
            expected,
            found: args.len(),
        });
    }

    let definition = match kind {
        Kind::Singleton => TypeDefinition::Singleton { name },
        Kind::Record => TypeDefinition::Record {
            name,
            fields: args.into_iter().map(TypeRef::from_token).collect(),
        },
        Kind::Enum => TypeDefinition::Enum {
            name,
            cases: args.into_iter().map(TypeRef::from_token).collect(),
        },
        Kind::List => TypeDefinition::List {
            name,
            element: TypeRef::from_token(args[0]),
        },
        Kind::Builtin => {
            let representation = Representation::from_keyword(args[0]).ok_or_else(|| {
                ParseError::UnknownRepresentation {
                    line,
                    representation: args[0].to_string(),
                }
            })?;
            TypeDefinition::Builtin {
                name,
                representation,
            }
        }
    };

    Ok(definition)
}
