//! Orchestrator: sequences loading, decoding, backend generation and
//! writing.
//!
//! Any failure at any step short-circuits the remaining steps and yields a
//! single terminal error; no partial output is written on failure. Loading
//! is the only suspending stage; decoding, resolution and fragment
//! composition are synchronous pure computations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backend::LanguageBackend;
use crate::dialect::{Decoder, sniff_dialect};
use crate::error::GenerateError;
use crate::fs_tree;
use crate::refs::ResolverContext;
use crate::reporter::Reporter;
use crate::store::DocumentStore;

/// Options for a single generation run.
#[derive(Debug)]
pub struct GenerateOptions<'a, D, B> {
    /// Base directory; relative `out` and `spec` paths resolve against it.
    /// Defaults to the current working directory.
    pub cwd: Option<PathBuf>,
    /// Output directory for the generated file tree.
    pub out: PathBuf,
    /// Path or URL of the root specification document, YAML or JSON.
    pub spec: String,
    /// Dialect decoder applied to the root document; never auto-detected.
    pub decoder: D,
    /// Language backend producing the output tree.
    pub backend: B,
    /// Progress message sink.
    pub reporter: &'a dyn Reporter,
}

/// Run the full pipeline: load the document graph, decode every reachable
/// node, invoke the backend, write the result.
///
/// Root decode failure is fatal. A non-root node is decoded only if it looks
/// like a known dialect; a spec-shaped node that then fails the caller's
/// decoder is also fatal, while a node that is not spec-shaped at all is
/// skipped as opaque data.
pub async fn generate<D, B>(options: GenerateOptions<'_, D, B>) -> Result<(), GenerateError>
where
    D: Decoder,
    B: LanguageBackend<D::Output>,
{
    let cwd = options
        .cwd
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let out = absolutize(&options.out, &cwd);

    options
        .reporter
        .report(&format!("Processing {}", options.spec));
    let store = DocumentStore::load(&options.spec, &cwd).await?;

    let root_key = store.root_key();
    let mut specs = BTreeMap::new();
    for (key, node) in store.entries() {
        // The discriminator gate applies to non-root nodes only; the root is
        // always decoded with the caller-supplied decoder.
        if key != root_key && sniff_dialect(node).is_none() {
            options.reporter.report(&format!(
                "Unable to decode {key} as a spec. Treating it as arbitrary JSON."
            ));
            continue;
        }
        let decoded = options
            .decoder
            .decode(node)
            .map_err(|source| GenerateError::Decode {
                location: key.clone(),
                source,
            })?;
        options.reporter.report(&format!("Decoded {key}"));
        specs.insert(key, decoded);
    }
    debug!(count = specs.len(), "Decoded specification documents.");

    let ctx = ResolverContext::new(&store);
    let tree = options.backend.generate(&ctx, &specs)?;

    options
        .reporter
        .report(&format!("Writing to {}", out.display()));
    fs_tree::write(&out, &tree)?;

    options.reporter.report("Done");
    Ok(())
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
