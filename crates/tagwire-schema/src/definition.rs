use std::fmt;

/// Argument token that refers to the definition it appears in.
pub const THIS: &str = "This";

/// The five kinds of type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Singleton,
    Record,
    Enum,
    List,
    Builtin,
}

impl Kind {
    /// The keyword used for this kind in schema text.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Singleton => "Singleton",
            Kind::Record => "Record",
            Kind::Enum => "Enum",
            Kind::List => "List",
            Kind::Builtin => "Builtin",
        }
    }

    /// Resolve a schema keyword to a kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Singleton" => Some(Kind::Singleton),
            "Record" => Some(Kind::Record),
            "Enum" => Some(Kind::Enum),
            "List" => Some(Kind::List),
            "Builtin" => Some(Kind::Builtin),
            _ => None,
        }
    }

    /// How many arguments a definition of this kind takes.
    pub fn arity(self) -> Arity {
        match self {
            Kind::Singleton => Arity::None,
            Kind::Record | Kind::Enum => Arity::AtLeastOne,
            Kind::List | Kind::Builtin => Arity::ExactlyOne,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument count accepted by a [`Kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    AtLeastOne,
    ExactlyOne,
}

impl Arity {
    pub fn admits(self, count: usize) -> bool {
        match self {
            Arity::None => count == 0,
            Arity::AtLeastOne => count >= 1,
            Arity::ExactlyOne => count == 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::None => f.write_str("no arguments"),
            Arity::AtLeastOne => f.write_str("at least one argument"),
            Arity::ExactlyOne => f.write_str("exactly one argument"),
        }
    }
}

/// Primitive encodings available to `Builtin` definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Arbitrary-precision non-negative integer.
    Varint,
    /// Unicode text, one varint per scalar value.
    Text,
    /// Raw bytes, passed through unmodified.
    Bytes,
    /// A single `0x00`/`0x01` byte.
    Bool,
}

impl Representation {
    pub fn as_str(self) -> &'static str {
        match self {
            Representation::Varint => "Varint",
            Representation::Text => "Text",
            Representation::Bytes => "Bytes",
            Representation::Bool => "Bool",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Varint" => Some(Representation::Varint),
            "Text" => Some(Representation::Text),
            "Bytes" => Some(Representation::Bytes),
            "Bool" => Some(Representation::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference from one definition to another type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A type bound by name in the namespace.
    Named(String),
    /// The definition this reference appears in.
    This,
}

impl TypeRef {
    /// Interpret an argument token.
    pub fn from_token(token: &str) -> Self {
        if token == THIS {
            TypeRef::This
        } else {
            TypeRef::Named(token.to_string())
        }
    }

    /// The type name this reference points at, given the enclosing definition.
    pub fn resolve<'a>(&'a self, enclosing: &'a str) -> &'a str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::This => enclosing,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::This => f.write_str(THIS),
        }
    }
}

/// One bound type. References to other types are held by name and resolved
/// through the [`Namespace`](crate::Namespace), so recursive types need no
/// boxing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Singleton {
        name: String,
    },
    Record {
        name: String,
        fields: Vec<TypeRef>,
    },
    Enum {
        name: String,
        cases: Vec<TypeRef>,
    },
    List {
        name: String,
        element: TypeRef,
    },
    Builtin {
        name: String,
        representation: Representation,
    },
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Singleton { name }
            | TypeDefinition::Record { name, .. }
            | TypeDefinition::Enum { name, .. }
            | TypeDefinition::List { name, .. }
            | TypeDefinition::Builtin { name, .. } => name,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            TypeDefinition::Singleton { .. } => Kind::Singleton,
            TypeDefinition::Record { .. } => Kind::Record,
            TypeDefinition::Enum { .. } => Kind::Enum,
            TypeDefinition::List { .. } => Kind::List,
            TypeDefinition::Builtin { .. } => Kind::Builtin,
        }
    }

    /// Types this definition refers to, in declaration order.
    pub fn references(&self) -> &[TypeRef] {
        match self {
            TypeDefinition::Record { fields, .. } => fields,
            TypeDefinition::Enum { cases, .. } => cases,
            TypeDefinition::List { element, .. } => std::slice::from_ref(element),
            TypeDefinition::Singleton { .. } | TypeDefinition::Builtin { .. } => &[],
        }
    }

    /// Referenced type names with `This` resolved to this definition.
    pub fn resolved_references(&self) -> impl Iterator<Item = &str> {
        let name = self.name();
        self.references()
            .iter()
            .map(move |reference| reference.resolve(name))
    }
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.kind())?;
        if let TypeDefinition::Builtin { representation, .. } = self {
            return write!(f, " {representation}");
        }
        for reference in self.references() {
            write!(f, " {reference}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_keywords_roundtrip() {
        for kind in [
            Kind::Singleton,
            Kind::Record,
            Kind::Enum,
            Kind::List,
            Kind::Builtin,
        ] {
            assert_eq!(Kind::from_keyword(kind.as_str()), Some(kind));
        }
        assert_eq!(Kind::from_keyword("Struct"), None);
        assert_eq!(Kind::from_keyword("record"), None);
    }

    #[test]
    fn arity_rules() {
        assert!(Kind::Singleton.arity().admits(0));
        assert!(!Kind::Singleton.arity().admits(1));
        assert!(!Kind::Record.arity().admits(0));
        assert!(Kind::Enum.arity().admits(3));
        assert!(Kind::List.arity().admits(1));
        assert!(!Kind::Builtin.arity().admits(2));
    }

    #[test]
    fn this_resolves_to_enclosing_name() {
        let reference = TypeRef::from_token("This");
        assert_eq!(reference, TypeRef::This);
        assert_eq!(reference.resolve("Tree"), "Tree");
        assert_eq!(TypeRef::from_token("Leaf").resolve("Tree"), "Leaf");
    }

    #[test]
    fn display_matches_schema_line() {
        let record = TypeDefinition::Record {
            name: "Point".to_string(),
            fields: vec![TypeRef::Named("X".to_string()), TypeRef::This],
        };
        assert_eq!(record.to_string(), "Point: Record X This");

        let builtin = TypeDefinition::Builtin {
            name: "Name".to_string(),
            representation: Representation::Text,
        };
        assert_eq!(builtin.to_string(), "Name: Builtin Text");

        let singleton = TypeDefinition::Singleton {
            name: "Unit".to_string(),
        };
        assert_eq!(singleton.to_string(), "Unit: Singleton");
    }

    #[test]
    fn list_references_its_element() {
        let list = TypeDefinition::List {
            name: "Forest".to_string(),
            element: TypeRef::This,
        };
        assert_eq!(list.resolved_references().collect::<Vec<_>>(), ["Forest"]);
    }
}
