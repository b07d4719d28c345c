//! Wire-level type identifiers.
//!
//! Identifiers 0-5 are reserved for built-in use.
//! Bound type names are numbered from 6 upwards in sorted-name order.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::namespace::Namespace;

/// The integer tag written in front of every encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(u64);

impl Identifier {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Identifier> for u64 {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

/// Reserved identifier of the built-in singleton.
pub const SINGLETON: Identifier = Identifier(1);

/// First identifier handed out to a bound type name.
pub const FIRST_USER_IDENTIFIER: u64 = 6;

/// Returns a human-readable name for a reserved identifier.
pub fn reserved_name(identifier: Identifier) -> Option<&'static str> {
    match identifier {
        SINGLETON => Some("Singleton"),
        _ if is_reserved(identifier) => Some("RESERVED"),
        _ => None,
    }
}

/// Returns true if the identifier is in the reserved block.
pub fn is_reserved(identifier: Identifier) -> bool {
    identifier.0 < FIRST_USER_IDENTIFIER
}

/// Bidirectional name/identifier mapping derived from a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierTable {
    names: Vec<String>,
    by_name: HashMap<String, Identifier>,
}

impl IdentifierTable {
    /// Number every bound name in sorted order, starting at
    /// [`FIRST_USER_IDENTIFIER`]. The same namespace always yields the same
    /// table.
    pub fn assign(namespace: &Namespace) -> Self {
        let names: Vec<String> = namespace
            .sorted_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let by_name = names
            .iter()
            .zip(FIRST_USER_IDENTIFIER..)
            .map(|(name, value)| (name.clone(), Identifier(value)))
            .collect();

        debug!(
            types = names.len(),
            first = FIRST_USER_IDENTIFIER,
            "identifiers assigned"
        );
        Self { names, by_name }
    }

    /// Identifier bound to `name`.
    pub fn identifier(&self, name: &str) -> Option<Identifier> {
        self.by_name.get(name).copied()
    }

    /// Name bound to `identifier`.
    pub fn name(&self, identifier: Identifier) -> Option<&str> {
        let index = identifier.0.checked_sub(FIRST_USER_IDENTIFIER)?;
        let index = usize::try_from(index).ok()?;
        self.names.get(index).map(String::as_str)
    }

    /// `(name, identifier)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Identifier)> {
        self.names
            .iter()
            .zip(FIRST_USER_IDENTIFIER..)
            .map(|(name, value)| (name.as_str(), Identifier(value)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn table(text: &str) -> IdentifierTable {
        let namespace = Namespace::build(parse(text).unwrap()).unwrap();
        IdentifierTable::assign(&namespace)
    }

    #[test]
    fn numbers_sorted_names_after_reserved_block() {
        let ids = table("Y: Singleton\nPoint: Record X Y\nX: Singleton\n");

        assert_eq!(ids.identifier("Point"), Some(Identifier::new(6)));
        assert_eq!(ids.identifier("X"), Some(Identifier::new(7)));
        assert_eq!(ids.identifier("Y"), Some(Identifier::new(8)));
        assert_eq!(ids.identifier("Z"), None);
    }

    #[test]
    fn reverse_lookup() {
        let ids = table("B: Singleton\nA: Singleton\n");

        assert_eq!(ids.name(Identifier::new(6)), Some("A"));
        assert_eq!(ids.name(Identifier::new(7)), Some("B"));
        assert_eq!(ids.name(Identifier::new(8)), None);
        assert_eq!(ids.name(SINGLETON), None);
        assert_eq!(ids.name(Identifier::new(u64::MAX)), None);
    }

    #[test]
    fn assignment_is_deterministic() {
        let text = "Gamma: Singleton\nAlpha: Singleton\nBeta: List Alpha\nDelta: Enum Alpha Gamma\n";
        let first = table(text);
        for _ in 0..16 {
            assert_eq!(table(text), first);
        }

        let reordered = table("Delta: Enum Alpha Gamma\nBeta: List Alpha\nAlpha: Singleton\nGamma: Singleton\n");
        assert_eq!(reordered, first);
    }

    #[test]
    fn iter_is_in_identifier_order() {
        let ids = table("C: Singleton\nA: Singleton\nB: Singleton\n");
        let pairs: Vec<(&str, u64)> = ids.iter().map(|(name, id)| (name, id.get())).collect();
        assert_eq!(pairs, vec![("A", 6), ("B", 7), ("C", 8)]);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn reserved_block() {
        assert!(is_reserved(Identifier::new(0)));
        assert!(is_reserved(Identifier::new(5)));
        assert!(!is_reserved(Identifier::new(FIRST_USER_IDENTIFIER)));
        assert_eq!(reserved_name(SINGLETON), Some("Singleton"));
        assert_eq!(reserved_name(Identifier::new(3)), Some("RESERVED"));
        assert_eq!(reserved_name(Identifier::new(6)), None);
    }
}
