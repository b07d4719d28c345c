use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::definition::{TypeDefinition, THIS};
use crate::error::{NamespaceError, NamespaceResult};

/// Symbol table mapping type names to their definitions.
///
/// Built once from a full set of definitions and read-only afterwards, so a
/// shared reference can be used from any number of threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    bindings: HashMap<String, TypeDefinition>,
}

impl Namespace {
    /// Bind every definition by name.
    ///
    /// Fails on the first definition whose name is already bound.
    pub fn build(definitions: impl IntoIterator<Item = TypeDefinition>) -> NamespaceResult<Self> {
        let mut bindings: HashMap<String, TypeDefinition> = HashMap::new();

        for definition in definitions {
            if definition.name() == THIS {
                return Err(NamespaceError::ReservedName(THIS.to_string()));
            }

            match bindings.entry(definition.name().to_string()) {
                Entry::Occupied(entry) => {
                    return Err(NamespaceError::DuplicateBinding {
                        name: entry.key().clone(),
                        new: Box::new(definition),
                        old: Box::new(entry.get().clone()),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(definition);
                }
            }
        }

        debug!(types = bindings.len(), "namespace built");
        Ok(Self { bindings })
    }

    /// Check that every transitively referenced type is bound.
    ///
    /// Walks each name depth-first, skipping names already visited. The
    /// visited set is what lets self- and mutually-referential types
    /// terminate. Names are walked in sorted order so the reported error is
    /// the same on every run.
    pub fn validate(&self) -> NamespaceResult<()> {
        let mut visited = HashSet::new();
        for name in self.sorted_names() {
            self.visit(name, &mut visited)?;
        }

        debug!(types = visited.len(), "namespace validated");
        Ok(())
    }

    fn visit<'a>(&'a self, name: &'a str, visited: &mut HashSet<&'a str>) -> NamespaceResult<()> {
        if visited.contains(name) {
            return Ok(());
        }

        let definition = self
            .bindings
            .get(name)
            .ok_or_else(|| NamespaceError::UndefinedType(name.to_string()))?;
        visited.insert(definition.name());

        for reference in definition.resolved_references() {
            self.visit(reference, visited)?;
        }

        Ok(())
    }

    /// All bound names in ascending lexicographic order.
    ///
    /// This order is the sole source of identifier assignment; changing it
    /// changes the wire format.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Definitions in sorted-name order.
    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.sorted_names()
            .into_iter()
            .filter_map(|name| self.bindings.get(name))
    }

    /// Canonical schema text: one definition per line, sorted by name.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for definition in self.definitions() {
            writeln!(f, "{definition}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn namespace(text: &str) -> NamespaceResult<Namespace> {
        Namespace::build(parse(text).unwrap())
    }

    #[test]
    fn build_and_validate_point() {
        let ns = namespace("X: Singleton\nY: Singleton\nPoint: Record X Y\n").unwrap();
        ns.validate().unwrap();

        assert_eq!(ns.len(), 3);
        assert!(ns.contains("Point"));
        assert_eq!(ns.sorted_names(), vec!["Point", "X", "Y"]);
    }

    #[test]
    fn duplicate_binding_names_first_collision() {
        let err = namespace("Dup: Singleton\nOther: Singleton\nDup: Record Other\n").unwrap_err();

        match err {
            NamespaceError::DuplicateBinding { name, new, old } => {
                assert_eq!(name, "Dup");
                assert_eq!(new.to_string(), "Dup: Record Other");
                assert_eq!(old.to_string(), "Dup: Singleton");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn identical_duplicate_is_still_rejected() {
        let err = namespace("Dup: Singleton\nDup: Singleton\n").unwrap_err();
        assert!(matches!(err, NamespaceError::DuplicateBinding { name, .. } if name == "Dup"));
    }

    #[test]
    fn undefined_field_type() {
        let ns = namespace("Bad: Record Ghost\n").unwrap();
        assert_eq!(
            ns.validate(),
            Err(NamespaceError::UndefinedType("Ghost".to_string()))
        );
    }

    #[test]
    fn undefined_enum_case_and_list_element() {
        let ns = namespace("A: Singleton\nE: Enum A Missing\n").unwrap();
        assert_eq!(
            ns.validate(),
            Err(NamespaceError::UndefinedType("Missing".to_string()))
        );

        let ns = namespace("L: List Nowhere\n").unwrap();
        assert_eq!(
            ns.validate(),
            Err(NamespaceError::UndefinedType("Nowhere".to_string()))
        );
    }

    #[test]
    fn transitive_reference_is_checked() {
        let ns = namespace("Outer: Record Inner\nInner: List Leaf\n").unwrap();
        assert_eq!(
            ns.validate(),
            Err(NamespaceError::UndefinedType("Leaf".to_string()))
        );
    }

    #[test]
    fn self_and_mutual_recursion_terminate() {
        let ns = namespace(
            "Label: Builtin Text\n\
             Tree: Record Label Forest\n\
             Forest: List Tree\n\
             Chain: Record Label This\n\
             Ping: Enum Pong Label\n\
             Pong: Enum Ping Label\n",
        )
        .unwrap();
        ns.validate().unwrap();
    }

    #[test]
    fn this_cannot_be_bound() {
        assert_eq!(
            namespace("This: Singleton\n"),
            Err(NamespaceError::ReservedName("This".to_string()))
        );
    }

    #[test]
    fn render_is_sorted_and_reparses() {
        let ns = namespace("Zed: Singleton\nAlpha: Record Zed This\nMid: Builtin Bytes\n").unwrap();
        let text = ns.render();
        assert_eq!(
            text,
            "Alpha: Record Zed This\nMid: Builtin Bytes\nZed: Singleton\n"
        );

        let reparsed = namespace(&text).unwrap();
        assert_eq!(reparsed, ns);
    }

    #[test]
    fn sorted_order_is_bytewise() {
        let ns = namespace("b: Singleton\nB: Singleton\na: Singleton\nA: Singleton\n").unwrap();
        assert_eq!(ns.sorted_names(), vec!["A", "B", "a", "b"]);
    }

    #[test]
    fn empty_namespace_validates() {
        let ns = Namespace::build(Vec::new()).unwrap();
        assert!(ns.is_empty());
        ns.validate().unwrap();
        assert_eq!(ns.render(), "");
    }
}
