//! The pluggable language backend seam.
//!
//! The orchestrator depends on backends only through this trait, so targets
//! can be implemented and tested independently of the pipeline.

use std::collections::BTreeMap;

use crate::error::BackendError;
use crate::fs_tree::FsEntity;
use crate::refs::ResolverContext;

/// Maps decoded specification documents into a generated file tree.
///
/// `specs` is keyed by path relative to the working directory; `ctx` provides
/// lazy reference resolution. Backends own their cycle-detection state (see
/// [`crate::refs::CycleGuard`]) for the duration of a single call.
pub trait LanguageBackend<A> {
    /// Generate the output tree for the given decoded documents.
    fn generate(
        &self,
        ctx: &ResolverContext<'_>,
        specs: &BTreeMap<String, A>,
    ) -> Result<FsEntity, BackendError>;
}
