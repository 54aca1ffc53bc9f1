//! Bundled TypeScript language backends.
//!
//! One backend per schema-bearing dialect. Each walks the named schemas of
//! every decoded document and emits one module per type: a static type
//! alias plus an io-ts runtime validator built in lockstep through the
//! fragment algebra. Imports are derived from the fragment's deduplicated
//! dependency set; `$ref`s become named imports, which keeps circular schema
//! graphs generable.

mod schema;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::backend::LanguageBackend;
use crate::dialect::asyncapi_2::AsyncApiSpec;
use crate::dialect::openapi_3::OpenApiSpec;
use crate::dialect::swagger_2::SwaggerSpec;
use crate::error::BackendError;
use crate::fragment::SerializedDependency;
use crate::fs_tree::FsEntity;
use crate::refs::ResolverContext;

pub use schema::serialize_schema;

/// TypeScript backend for Swagger 2.0 documents; generates from
/// `definitions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptBackend;

impl LanguageBackend<SwaggerSpec> for TypeScriptBackend {
    fn generate(
        &self,
        ctx: &ResolverContext<'_>,
        specs: &BTreeMap<String, SwaggerSpec>,
    ) -> Result<FsEntity, BackendError> {
        let mut children = Vec::new();
        for (key, spec) in specs {
            if let Some(definitions) = &spec.definitions {
                children.push(schema::schemas_to_tree(key, definitions, "definitions", ctx)?);
            }
        }
        Ok(FsEntity::directory("", children))
    }
}

/// TypeScript backend for OpenAPI 3.0 documents; generates from
/// `components.schemas`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApi3Backend;

impl LanguageBackend<OpenApiSpec> for OpenApi3Backend {
    fn generate(
        &self,
        ctx: &ResolverContext<'_>,
        specs: &BTreeMap<String, OpenApiSpec>,
    ) -> Result<FsEntity, BackendError> {
        let mut children = Vec::new();
        for (key, spec) in specs {
            if let Some(schemas) = spec.components.as_ref().and_then(|c| c.schemas.as_ref()) {
                children.push(schema::schemas_to_tree(
                    key,
                    schemas,
                    "components/schemas",
                    ctx,
                )?);
            }
        }
        Ok(FsEntity::directory("", children))
    }
}

/// TypeScript backend for AsyncAPI 2.0 documents; generates from
/// `components.schemas`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncApi2Backend;

impl LanguageBackend<AsyncApiSpec> for AsyncApi2Backend {
    fn generate(
        &self,
        ctx: &ResolverContext<'_>,
        specs: &BTreeMap<String, AsyncApiSpec>,
    ) -> Result<FsEntity, BackendError> {
        let mut children = Vec::new();
        for (key, spec) in specs {
            if let Some(schemas) = spec.components.as_ref().and_then(|c| c.schemas.as_ref()) {
                children.push(schema::schemas_to_tree(
                    key,
                    schemas,
                    "components/schemas",
                    ctx,
                )?);
            }
        }
        Ok(FsEntity::directory("", children))
    }
}

/// Render a dependency set as import statements, one path per line.
///
/// Dependencies whose path points at the module currently being generated
/// are dropped: a recursive type needs no self-import.
pub(crate) fn serialize_dependencies(
    dependencies: &BTreeSet<SerializedDependency>,
    current_module: Option<&str>,
) -> String {
    let self_path = current_module.map(|name| format!("./{name}"));
    let mut named: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut output = String::new();

    for dependency in dependencies {
        if self_path.as_deref() == Some(dependency.path.as_str()) {
            continue;
        }
        if let Some(namespace) = dependency.name.strip_prefix('*') {
            output.push_str(&format!(
                "import * as {namespace} from '{}';\n",
                dependency.path
            ));
        } else {
            named
                .entry(dependency.path.as_str())
                .or_default()
                .push(dependency.name.as_str());
        }
    }

    for (path, names) in named {
        output.push_str(&format!("import {{ {} }} from '{path}';\n", names.join(", ")));
    }

    output
}

/// Sanitize a schema name into a valid TypeScript type identifier.
pub(crate) fn sanitize_type_name(name: &str) -> String {
    let mut result: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if result.is_empty() {
        result.push('_');
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Quote a property name when it is not a valid identifier.
pub(crate) fn quote_if_needed(name: &str) -> String {
    let valid = !name.is_empty()
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Relative import specifier from one generated module directory to a
/// module named `name` in another.
pub(crate) fn relative_import(from_dir: &Path, to_dir: &Path, name: &str) -> String {
    let from: Vec<_> = from_dir.components().collect();
    let to: Vec<_> = to_dir.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    parts.push(name.to_string());

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Output directory for a document key: the key without its extension, with
/// characters that cannot appear in a path segment replaced.
pub(crate) fn document_dir(key: &str) -> PathBuf {
    let sanitized: String = key
        .chars()
        .map(|c| match c {
            ':' | '?' | '#' | '&' | '=' => '_',
            other => other,
        })
        .collect();
    PathBuf::from(sanitized).with_extension("")
}
