//! The host's type-query capability.
//!
//! Detection needs exactly one semantic fact: the name of the static type of
//! a member access receiver. The host implements [`SemanticModel`] over its
//! own resolution engine; [`TypeTable`] is the flow-insensitive binding used
//! by the test fixture and by hosts with a precomputed symbol table.

use crate::syntax::Expr;
use compact_str::CompactString;
use rustc_hash::FxHashMap;

/// Name-comparable static type descriptor for an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Simple name of the resolved type, e.g. `Nullable` or `Int32`.
    pub name: CompactString,
}

impl TypeInfo {
    /// Creates a descriptor for the given simple type name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self { name: name.into() }
    }
}

/// A semantic view over one source unit, supplied by the host.
pub trait SemanticModel {
    /// Resolved static type of `expr`.
    ///
    /// `None` means the host cannot resolve the expression's type; the
    /// detector treats that as "no match" for the node, never as an error.
    fn type_of(&self, expr: &Expr) -> Option<TypeInfo>;
}

/// Flow-insensitive identifier typing backed by a hash map.
///
/// Resolves bare identifiers only; any other expression shape is reported
/// as unresolvable.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: FxHashMap<CompactString, TypeInfo>,
}

impl TypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the static type of a named variable.
    pub fn insert(&mut self, name: impl Into<CompactString>, ty: TypeInfo) {
        self.types.insert(name.into(), ty);
    }

    /// Number of typed names in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no names have been typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl SemanticModel for TypeTable {
    fn type_of(&self, expr: &Expr) -> Option<TypeInfo> {
        match expr {
            Expr::Identifier { name, .. } => self.types.get(name).cloned(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;

    #[test]
    fn test_type_table_resolves_identifiers_only() {
        let mut table = TypeTable::new();
        table.insert("a", TypeInfo::new("Nullable"));

        let ident = Expr::Identifier {
            name: "a".into(),
            span: Span::new(0, 1),
        };
        assert_eq!(table.type_of(&ident), Some(TypeInfo::new("Nullable")));

        let literal = Expr::Literal {
            value: crate::syntax::Literal::Int(1),
            span: Span::new(0, 1),
        };
        assert_eq!(table.type_of(&literal), None);
    }

    #[test]
    fn test_unknown_identifier_is_unresolvable() {
        let table = TypeTable::new();
        let ident = Expr::Identifier {
            name: "mystery".into(),
            span: Span::new(0, 7),
        };
        assert_eq!(table.type_of(&ident), None);
    }
}
