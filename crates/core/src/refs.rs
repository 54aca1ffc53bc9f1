//! Reference tokens and lazy resolution over a loaded document store.
//!
//! Resolution is deferred to the language backend: a reference is only looked
//! up when it is actually traversed during code generation. Combined with the
//! explicit [`CycleGuard`], this is what lets circular schema graphs (a node
//! referencing itself, directly or through other documents) generate without
//! unbounded recursion.

use std::collections::HashSet;
use std::fmt;

use crate::dialect::Decoder;
use crate::error::ResolutionError;
use crate::store::{DocumentStore, Location};

/// A cross-node link: target document location plus a JSON pointer into it.
///
/// Not resolved at construction time; pass it to
/// [`ResolverContext::resolve`] together with the decoder expected for its
/// target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref {
    /// Location of the document containing the target node.
    pub location: Location,
    /// JSON pointer to the target node; empty for the whole document.
    pub pointer: String,
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.location, self.pointer)
    }
}

impl Ref {
    /// Parse a raw `$ref` string relative to the document it appeared in.
    ///
    /// `#/definitions/Pet` stays within `origin`; `pet.yml#/Pet` crosses into
    /// a sibling document; `pet.yml` alone points at a whole document.
    pub fn parse(raw: &str, origin: &Location) -> Result<Self, String> {
        let (document, pointer) = match raw.split_once('#') {
            Some((document, fragment)) => (document, fragment.to_string()),
            None => (raw, String::new()),
        };
        let location = if document.is_empty() {
            origin.clone()
        } else {
            origin.join(document)?
        };
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(format!("invalid JSON pointer `{pointer}` in `{raw}`"));
        }
        Ok(Self { location, pointer })
    }

    /// Last pointer segment; the conventional name of the referenced schema.
    pub fn name(&self) -> &str {
        self.pointer.rsplit('/').next().unwrap_or_default()
    }
}

/// Resolver access handed to language backends.
///
/// A pure function of `(reference, decoder)` over the fixed store: no mutable
/// resolution cache is needed for correctness, and the context can be queried
/// for a location whose generation is still in progress elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct ResolverContext<'a> {
    store: &'a DocumentStore,
}

impl<'a> ResolverContext<'a> {
    /// Bind a resolver to a loaded store.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Look up the referenced node without imposing a shape on it.
    ///
    /// Backends use this to confirm a reference points at something before
    /// emitting a named import for it; targets inside documents that were
    /// kept as arbitrary JSON have no dialect shape to validate against.
    pub fn lookup(&self, reference: &Ref) -> Result<&'a serde_json::Value, ResolutionError> {
        self.store
            .node_at(reference)
            .ok_or_else(|| ResolutionError::LookupFailed {
                reference: reference.clone(),
            })
    }

    /// Look up the referenced node and validate it against `decoder`.
    pub fn resolve<D: Decoder>(
        &self,
        reference: &Ref,
        decoder: &D,
    ) -> Result<D::Output, ResolutionError> {
        let node = self
            .store
            .node_at(reference)
            .ok_or_else(|| ResolutionError::LookupFailed {
                reference: reference.clone(),
            })?;
        decoder.decode(node).map_err(ResolutionError::from)
    }

    /// Location of the document stored under `key`, if any. Backends use this
    /// to turn raw `$ref` strings from a given document into [`Ref`] tokens.
    pub fn locate(&self, key: &str) -> Option<&'a Location> {
        self.store.locate(key)
    }

    /// Store key of a loaded document's location; the inverse of
    /// [`ResolverContext::locate`]. Backends use this to compute relative
    /// import paths between generated modules.
    pub fn key_of(&self, location: &Location) -> Option<String> {
        self.store.key_of(location)
    }
}

/// Explicit in-progress set for cycle breaking during backend traversal.
///
/// A backend checks the guard before descending into a reference target; on a
/// hit it emits a named forward reference instead of inlining, turning an
/// implicit call-stack recursion hazard into a bounded graph walk. Scoped to
/// a single generation run.
#[derive(Debug, Default)]
pub struct CycleGuard {
    in_progress: HashSet<Ref>,
}

impl CycleGuard {
    /// Fresh guard with no locations in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a reference as being generated. Returns `false` if it already
    /// was, i.e. the traversal has come back around to it.
    pub fn begin(&mut self, reference: Ref) -> bool {
        self.in_progress.insert(reference)
    }

    /// Mark generation of a reference as complete.
    pub fn finish(&mut self, reference: &Ref) {
        self.in_progress.remove(reference);
    }

    /// Whether the reference is currently being generated.
    pub fn is_active(&self, reference: &Ref) -> bool {
        self.in_progress.contains(reference)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::dialect::schema::SchemaDecoder;

    fn origin() -> Location {
        Location::Path(PathBuf::from("/specs/root.yml"))
    }

    #[test]
    fn test_parse_same_document_ref() {
        let r = Ref::parse("#/definitions/Pet", &origin()).unwrap();
        assert_eq!(r.location, origin());
        assert_eq!(r.pointer, "/definitions/Pet");
        assert_eq!(r.name(), "Pet");
    }

    #[test]
    fn test_parse_cross_document_ref() {
        let r = Ref::parse("common/pet.yml#/Pet", &origin()).unwrap();
        assert_eq!(r.location, Location::Path(PathBuf::from("/specs/common/pet.yml")));
        assert_eq!(r.pointer, "/Pet");
    }

    #[test]
    fn test_parse_whole_document_ref() {
        let r = Ref::parse("pet.yml", &origin()).unwrap();
        assert_eq!(r.pointer, "");
    }

    #[test]
    fn test_parse_rejects_non_pointer_fragment() {
        assert!(Ref::parse("#definitions", &origin()).is_err());
    }

    #[test]
    fn test_cycle_guard_round_trip() {
        let r = Ref::parse("#/definitions/Tree", &origin()).unwrap();
        let mut guard = CycleGuard::new();
        assert!(guard.begin(r.clone()));
        assert!(guard.is_active(&r));
        assert!(!guard.begin(r.clone()));
        guard.finish(&r);
        assert!(!guard.is_active(&r));
    }

    #[tokio::test]
    async fn test_resolve_missing_location_is_lookup_failed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("root.yml"), "definitions: {}\n").unwrap();
        let store = crate::store::DocumentStore::load("root.yml", dir.path())
            .await
            .unwrap();
        let ctx = ResolverContext::new(&store);

        let root = store.root().clone();
        let missing = Ref::parse("#/definitions/Ghost", &root).unwrap();
        match ctx.resolve(&missing, &SchemaDecoder) {
            Err(ResolutionError::LookupFailed { reference }) => {
                assert_eq!(reference.name(), "Ghost");
            }
            other => panic!("expected lookup failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_decodes_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("root.yml"),
            "definitions:\n  Pet:\n    type: object\n",
        )
        .unwrap();
        let store = crate::store::DocumentStore::load("root.yml", dir.path())
            .await
            .unwrap();
        let ctx = ResolverContext::new(&store);

        let root = store.root().clone();
        let r = Ref::parse("#/definitions/Pet", &root).unwrap();
        let schema = ctx.resolve(&r, &SchemaDecoder).unwrap();
        assert_eq!(schema.schema_type.as_deref(), Some("object"));
    }
}
