//! Core pipeline for generating typed clients and runtime validators from
//! API specification documents.
//!
//! The pipeline is:
//! 1. Load: root document plus its transitive `$ref` graph -> [`store::DocumentStore`]
//! 2. Decode: raw nodes -> typed dialect trees via a caller-supplied [`dialect::Decoder`]
//! 3. Generate: a [`backend::LanguageBackend`] walks the decoded specs, resolving
//!    references lazily through [`refs::ResolverContext`] and composing output with
//!    the [`fragment::SerializedFragment`] algebra
//! 4. Write: the resulting [`fs_tree::FsEntity`] is persisted to disk

#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod backend;
pub mod dialect;
pub mod error;
pub mod fragment;
pub mod fs_tree;
pub mod generate;
pub mod refs;
pub mod reporter;
pub mod store;
pub mod typescript;

pub use backend::LanguageBackend;
pub use error::{BackendError, DecodeError, GenerateError, LoadError, ResolutionError, WriteError};
pub use fragment::{SerializedDependency, SerializedFragment, SerializedParameter};
pub use generate::{GenerateOptions, generate};
pub use refs::{CycleGuard, Ref, ResolverContext};
pub use reporter::{NullReporter, Reporter, TracingReporter};
pub use store::{DocumentStore, Location};
pub use typescript::{AsyncApi2Backend, OpenApi3Backend, TypeScriptBackend};
