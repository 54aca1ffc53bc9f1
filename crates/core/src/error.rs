//! Error taxonomy for the generation pipeline.
//!
//! Every stage returns a result value; the orchestrator fails fast on the
//! first error and produces no partial output.

use std::path::PathBuf;

use thiserror::Error;

use crate::refs::Ref;
use crate::store::Location;

/// A reachable reference could not be fetched or parsed.
///
/// Loading is all-or-nothing: the first failing location aborts the load and
/// no partial store is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Fetching a document over the filesystem or network failed.
    #[error("failed to fetch {location}: {reason}")]
    Fetch {
        /// The location that could not be fetched.
        location: Location,
        /// Underlying I/O or HTTP failure, formatted.
        reason: String,
    },
    /// A fetched document was not valid YAML or JSON.
    #[error("failed to parse {location}: {reason}")]
    Parse {
        /// The location whose contents could not be parsed.
        location: Location,
        /// Underlying parse failure, formatted.
        reason: String,
    },
    /// A malformed location or `$ref` target was encountered while walking
    /// the reference graph.
    #[error("invalid reference target {target} in {origin}: {reason}")]
    InvalidTarget {
        /// The raw `$ref` target string.
        target: String,
        /// The document in which the reference appeared.
        origin: Location,
        /// Why the target could not be interpreted.
        reason: String,
    },
}

/// A document failed structural validation against a dialect decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at `{path}`: {message}")]
pub struct DecodeError {
    /// JSON sub-path of the offending node (e.g. `definitions.Pet.type`).
    pub path: String,
    /// Human-readable description of the expected shape.
    pub expected: String,
    /// Underlying deserialization failure.
    pub message: String,
}

impl DecodeError {
    /// Multi-line human-readable report.
    pub fn report(&self) -> String {
        format!(
            "Decoding failed\n  expected: {}\n  at:       {}\n  because:  {}",
            self.expected, self.path, self.message
        )
    }
}

/// A reference resolved to a location that is missing or ill-shaped.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The store has no node at the referenced location.
    #[error("no document node at {reference}")]
    LookupFailed {
        /// The reference whose target is absent from the store.
        reference: Ref,
    },
    /// The referenced node exists but does not match the expected shape.
    #[error(transparent)]
    DecodeFailed(#[from] DecodeError),
}

/// The language backend reported a failure, e.g. an unsupported construct.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A schema construct the backend cannot map to target-language syntax.
    #[error("unsupported construct: {0}")]
    Unsupported(String),
    /// A reference traversed during generation failed to resolve.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Persisting the generated file tree failed.
#[derive(Debug, Error)]
#[error("failed to write {path}: {reason}")]
pub struct WriteError {
    /// Path of the file or directory that could not be written.
    pub path: PathBuf,
    /// Underlying I/O failure, formatted.
    pub reason: String,
}

/// Terminal error for a generation run; any stage failure short-circuits
/// the remaining steps.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Document loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A document failed dialect decoding (fatal for the root and for any
    /// non-root node that looks like a known dialect).
    #[error("failed to decode {location}: {source}")]
    Decode {
        /// Store key of the document that failed to decode.
        location: String,
        /// The structural decode failure.
        source: DecodeError,
    },
    /// The language backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Writing the output tree failed.
    #[error(transparent)]
    Write(#[from] WriteError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_report_is_multiline() {
        let err = DecodeError {
            path: "definitions.Pet.type".to_string(),
            expected: "Swagger 2.0 document".to_string(),
            message: "invalid type: integer `1`, expected a string".to_string(),
        };
        let report = err.report();
        assert!(report.contains("expected: Swagger 2.0 document"));
        assert!(report.contains("at:       definitions.Pet.type"));
        assert!(report.lines().count() >= 3);
    }
}
