//! Serialized fragments: the composable intermediate representation for
//! generated code.
//!
//! A fragment carries four independently composable fields: static type
//! text, runtime validator text built in lockstep with it, a deduplicated
//! set of import dependencies, and the set of references encountered while
//! building the fragment. [`SerializedFragment::combine`] is associative
//! with [`SerializedFragment::empty`] as a two-sided identity, so backends
//! may fold fragment sequences in any grouping; dependency and reference
//! sets are order-independent by construction.

use std::collections::BTreeSet;

use crate::refs::Ref;

/// An import declaration needed for a fragment's text to compile.
///
/// Deduplicated by `(name, path)`. A name starting with `*` denotes a
/// namespace import (`import * as t from 'io-ts'`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerializedDependency {
    /// Imported binding name.
    pub name: String,
    /// Source module path.
    pub path: String,
}

impl SerializedDependency {
    /// New dependency on `name` exported from `path`.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A partial generated fragment: type text, validator text, dependencies
/// and reference provenance.
///
/// Invariant: every composition rule that extends `type_text` has a matching
/// rule extending `io_text`, so the static type and its runtime validator
/// never drift out of structural correspondence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedFragment {
    /// Text of the static type expression.
    pub type_text: String,
    /// Text of the runtime validator expression, positionally matching
    /// `type_text`.
    pub io_text: String,
    /// Imports required for the texts to compile.
    pub dependencies: BTreeSet<SerializedDependency>,
    /// References encountered while building this fragment, carried upward
    /// so a backend can decide global resolution and ordering.
    pub refs: BTreeSet<Ref>,
}

impl SerializedFragment {
    /// The identity element: empty texts, empty sets.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fragment with the given type and validator texts and no dependencies.
    pub fn new(type_text: impl Into<String>, io_text: impl Into<String>) -> Self {
        Self {
            type_text: type_text.into(),
            io_text: io_text.into(),
            dependencies: BTreeSet::new(),
            refs: BTreeSet::new(),
        }
    }

    /// Literal text appearing identically in both the type and validator
    /// positions; used for separators and punctuation.
    pub fn literal(text: &str) -> Self {
        Self::new(text, text)
    }

    /// Monoid combine: concatenate texts positionally, union the sets.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.type_text.push_str(&other.type_text);
        self.io_text.push_str(&other.io_text);
        self.dependencies.extend(other.dependencies);
        self.refs.extend(other.refs);
        self
    }

    /// Fold a sequence of fragments left-to-right.
    pub fn concat(items: impl IntoIterator<Item = Self>) -> Self {
        items
            .into_iter()
            .fold(Self::empty(), SerializedFragment::combine)
    }

    /// Fold an ordered sequence with `separator` between each adjacent pair.
    ///
    /// Text order follows the input order; this is how backends assemble
    /// parameter lists, union members and record fields.
    pub fn intercalate(separator: &Self, items: impl IntoIterator<Item = Self>) -> Self {
        let mut result = Self::empty();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                result = result.combine(separator.clone());
            }
            result = result.combine(item);
        }
        result
    }

    /// Add an import dependency.
    #[must_use]
    pub fn with_dependency(mut self, name: &str, path: &str) -> Self {
        self.dependencies.insert(SerializedDependency::new(name, path));
        self
    }

    /// Record a reference encountered while building this fragment.
    #[must_use]
    pub fn with_ref(mut self, reference: Ref) -> Self {
        self.refs.insert(reference);
        self
    }

    /// Promote to a parameter with the given requiredness.
    pub fn required(self, is_required: bool) -> SerializedParameter {
        SerializedParameter {
            fragment: self,
            is_required,
        }
    }
}

/// A fragment plus a requiredness flag, used for struct fields and function
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedParameter {
    /// The underlying fragment.
    pub fragment: SerializedFragment,
    /// Whether the parameter is required. When parameters fold together, a
    /// field stays required only if required in every contributing source.
    pub is_required: bool,
}

impl SerializedParameter {
    /// Combine fragments; requiredness is the logical AND of both sides.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            fragment: self.fragment.combine(other.fragment),
            is_required: self.is_required && other.is_required,
        }
    }

    /// Fold an ordered sequence with a separator fragment between each pair.
    pub fn intercalate(separator: &SerializedFragment, items: impl IntoIterator<Item = Self>) -> Self {
        let mut result: Option<Self> = None;
        for item in items {
            result = Some(match result {
                None => item,
                Some(acc) => Self {
                    fragment: acc.fragment.combine(separator.clone()).combine(item.fragment),
                    is_required: acc.is_required && item.is_required,
                },
            });
        }
        result.unwrap_or_else(|| SerializedFragment::empty().required(true))
    }
}

/// The single rule by which a typed field becomes a typed-and-validated
/// struct member: `name: T` (or `name?: T` when optional) in type position,
/// `name: io` in validator position, dependencies and refs preserved.
pub fn from_field(
    name: &str,
    fragment: SerializedFragment,
    is_required: bool,
) -> SerializedParameter {
    let marker = if is_required { "" } else { "?" };
    SerializedParameter {
        fragment: SerializedFragment {
            type_text: format!("{name}{marker}: {}", fragment.type_text),
            io_text: format!("{name}: {}", fragment.io_text),
            dependencies: fragment.dependencies,
            refs: fragment.refs,
        },
        is_required,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::store::Location;

    fn sample_ref(pointer: &str) -> Ref {
        Ref {
            location: Location::Path(PathBuf::from("/specs/root.yml")),
            pointer: pointer.to_string(),
        }
    }

    fn fragment_a() -> SerializedFragment {
        SerializedFragment::new("string", "t.string")
            .with_dependency("*t", "io-ts")
            .with_ref(sample_ref("/definitions/A"))
    }

    fn fragment_b() -> SerializedFragment {
        SerializedFragment::new("Pet", "PetIO")
            .with_dependency("Pet", "./Pet")
            .with_dependency("PetIO", "./Pet")
            .with_ref(sample_ref("/definitions/Pet"))
    }

    fn fragment_c() -> SerializedFragment {
        SerializedFragment::new("number", "t.number").with_dependency("*t", "io-ts")
    }

    #[test]
    fn test_left_and_right_identity() {
        let a = fragment_a();
        assert_eq!(SerializedFragment::empty().combine(a.clone()), a);
        assert_eq!(a.clone().combine(SerializedFragment::empty()), a);
    }

    #[test]
    fn test_associativity() {
        let (a, b, c) = (fragment_a(), fragment_b(), fragment_c());
        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left, right);
    }

    #[test]
    fn test_set_fields_are_order_independent() {
        let (a, b, c) = (fragment_a(), fragment_b(), fragment_c());
        let forward = SerializedFragment::concat([a.clone(), b.clone(), c.clone()]);
        let backward = SerializedFragment::concat([c, b, a]);
        assert_eq!(forward.dependencies, backward.dependencies);
        assert_eq!(forward.refs, backward.refs);
        // Text order follows traversal order and differs.
        assert_ne!(forward.type_text, backward.type_text);
    }

    #[test]
    fn test_dependencies_deduplicate() {
        let combined = fragment_a().combine(fragment_c());
        assert_eq!(
            combined
                .dependencies
                .iter()
                .filter(|d| d.path == "io-ts")
                .count(),
            1
        );
    }

    #[test]
    fn test_intercalate() {
        let joined = SerializedFragment::intercalate(
            &SerializedFragment::literal(" | "),
            [
                SerializedFragment::new("'a'", "t.literal('a')"),
                SerializedFragment::new("'b'", "t.literal('b')"),
            ],
        );
        assert_eq!(joined.type_text, "'a' | 'b'");
        assert_eq!(joined.io_text, "t.literal('a') | t.literal('b')");
    }

    #[test]
    fn test_from_field_round_trip() {
        let required = from_field("x", fragment_a(), true);
        assert_eq!(required.fragment.type_text, "x: string");
        assert_eq!(required.fragment.io_text, "x: t.string");
        assert!(required.is_required);

        let optional = from_field("x", fragment_a(), false);
        assert_eq!(optional.fragment.type_text, "x?: string");
        assert_eq!(optional.fragment.io_text, "x: t.string");
    }

    #[test]
    fn test_from_field_preserves_sets() {
        let source = fragment_b();
        let field = from_field("pet", source.clone(), true);
        assert_eq!(field.fragment.dependencies, source.dependencies);
        assert_eq!(field.fragment.refs, source.refs);
    }

    #[test]
    fn test_parameter_requiredness_is_and() {
        let required = fragment_a().required(true);
        let optional = fragment_c().required(false);
        assert!(!required.combine(optional).is_required);

        let both = fragment_a().required(true).combine(fragment_c().required(true));
        assert!(both.is_required);
    }

    #[test]
    fn test_parameter_intercalate_joins_fields() {
        let sep = SerializedFragment::new("; ", ", ");
        let joined = SerializedParameter::intercalate(
            &sep,
            [
                from_field("id", SerializedFragment::new("string", "t.string"), true),
                from_field("age", SerializedFragment::new("number", "t.number"), false),
            ],
        );
        assert_eq!(joined.fragment.type_text, "id: string; age?: number");
        assert_eq!(joined.fragment.io_text, "id: t.string, age: t.number");
    }
}
