//! Schema-to-fragment serialization shared by the bundled TypeScript
//! backends.
//!
//! Every schema construct is mapped to a [`SerializedFragment`] whose type
//! text and io-ts validator text are extended in lockstep. `$ref`s never
//! inline their target: they become named imports, with the target's
//! presence verified through the resolver. A `$ref` chain is walked under
//! the caller's [`CycleGuard`], so a chain that loops back on itself is a
//! bounded graph walk rather than unbounded recursion.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::dialect::schema::{AdditionalProperties, SchemaObject};
use crate::error::BackendError;
use crate::fragment::{SerializedFragment, SerializedParameter, from_field};
use crate::fs_tree::FsEntity;
use crate::refs::{CycleGuard, Ref, ResolverContext};
use crate::store::Location;

use super::{document_dir, quote_if_needed, relative_import, sanitize_type_name, serialize_dependencies};

/// Generate one module per named schema of a document, under
/// `<document>/<section>/<Name>.ts`.
pub(crate) fn schemas_to_tree(
    key: &str,
    schemas: &BTreeMap<String, SchemaObject>,
    section: &str,
    ctx: &ResolverContext<'_>,
) -> Result<FsEntity, BackendError> {
    let origin = ctx
        .locate(key)
        .ok_or_else(|| BackendError::Unsupported(format!("unknown document key `{key}`")))?
        .clone();

    let mut guard = CycleGuard::new();
    let mut files = Vec::with_capacity(schemas.len());
    for (name, schema) in schemas {
        files.push(schema_module(name, schema, &origin, section, ctx, &mut guard)?);
    }

    Ok(FsEntity::directory(
        document_dir(key),
        vec![FsEntity::directory(section, files)],
    ))
}

/// Serialize one named schema into a self-contained module: imports, the
/// exported type alias and the exported io-ts validator.
pub(crate) fn schema_module(
    name: &str,
    schema: &SchemaObject,
    origin: &Location,
    section: &str,
    ctx: &ResolverContext<'_>,
    guard: &mut CycleGuard,
) -> Result<FsEntity, BackendError> {
    let type_name = sanitize_type_name(name);
    let self_ref = Ref {
        location: origin.clone(),
        pointer: format!("/{section}/{name}"),
    };

    guard.begin(self_ref.clone());
    let fragment = serialize_schema(schema, origin, section, ctx, guard);
    guard.finish(&self_ref);
    let fragment = fragment?;

    let imports = serialize_dependencies(&fragment.dependencies, Some(&type_name));
    let mut content = String::new();
    if !imports.is_empty() {
        content.push_str(&imports);
        content.push('\n');
    }
    content.push_str(&format!("export type {type_name} = {};\n\n", fragment.type_text));
    content.push_str(&format!("export const {type_name}IO = {};\n", fragment.io_text));

    Ok(FsEntity::file(format!("{type_name}.ts"), content))
}

/// Serialize a schema node into a fragment, relative to the document it
/// appeared in.
pub fn serialize_schema(
    schema: &SchemaObject,
    origin: &Location,
    section: &str,
    ctx: &ResolverContext<'_>,
    guard: &mut CycleGuard,
) -> Result<SerializedFragment, BackendError> {
    if let Some(raw) = &schema.ref_path {
        return serialize_ref(raw, origin, section, ctx, guard);
    }

    let base = if let Some(values) = &schema.enum_values {
        serialize_enum(values)?
    } else if let Some(members) = &schema.all_of {
        serialize_all_of(members, origin, section, ctx, guard)?
    } else {
        match schema.schema_type.as_deref() {
            Some("string") => io_ts(SerializedFragment::new("string", "t.string")),
            Some("number") | Some("integer") => {
                io_ts(SerializedFragment::new("number", "t.number"))
            }
            Some("boolean") => io_ts(SerializedFragment::new("boolean", "t.boolean")),
            Some("null") => io_ts(SerializedFragment::new("null", "t.null")),
            Some("array") => serialize_array(schema, origin, section, ctx, guard)?,
            Some("object") => serialize_object(schema, origin, section, ctx, guard)?,
            Some(other) => {
                return Err(BackendError::Unsupported(format!("schema type `{other}`")));
            }
            None if schema.properties.is_some() || schema.additional_properties.is_some() => {
                serialize_object(schema, origin, section, ctx, guard)?
            }
            None => io_ts(SerializedFragment::new("unknown", "t.unknown")),
        }
    };

    if schema.nullable == Some(true) {
        Ok(io_ts(
            SerializedFragment::new("", "t.union([")
                .combine(base)
                .combine(SerializedFragment::new(" | null", ", t.null])")),
        ))
    } else {
        Ok(base)
    }
}

/// A reference becomes a pair of named imports (the type and its validator)
/// plus a recorded [`Ref`]; the target is never inlined.
fn serialize_ref(
    raw: &str,
    origin: &Location,
    section: &str,
    ctx: &ResolverContext<'_>,
    guard: &mut CycleGuard,
) -> Result<SerializedFragment, BackendError> {
    let reference = Ref::parse(raw, origin)
        .map_err(|reason| BackendError::Unsupported(format!("reference `{raw}`: {reason}")))?;
    check_ref_chain(&reference, ctx, guard)?;

    let name = sanitize_type_name(reference.name());
    let module = if reference.location == *origin {
        format!("./{name}")
    } else {
        let origin_key = key_of(ctx, origin)?;
        let target_key = key_of(ctx, &reference.location)?;
        relative_import(
            &document_dir(&origin_key).join(section),
            &document_dir(&target_key).join(section),
            &name,
        )
    };

    Ok(SerializedFragment::new(&name, format!("{name}IO"))
        .with_dependency(&name, &module)
        .with_dependency(&format!("{name}IO"), &module)
        .with_ref(reference))
}

/// Follow a `$ref` chain far enough to confirm every link points at a
/// present node. The guard bounds the walk when the chain loops back to a
/// node already being generated or checked.
fn check_ref_chain(
    reference: &Ref,
    ctx: &ResolverContext<'_>,
    guard: &mut CycleGuard,
) -> Result<(), BackendError> {
    if guard.is_active(reference) {
        return Ok(());
    }

    guard.begin(reference.clone());
    let result = match ctx.lookup(reference) {
        Err(err) => Err(BackendError::from(err)),
        Ok(Value::Object(map)) => match map.get("$ref") {
            Some(Value::String(next_raw)) => Ref::parse(next_raw, &reference.location)
                .map_err(|reason| {
                    BackendError::Unsupported(format!("reference `{next_raw}`: {reason}"))
                })
                .and_then(|next| check_ref_chain(&next, ctx, guard)),
            _ => Ok(()),
        },
        Ok(_) => Ok(()),
    };
    guard.finish(reference);
    result
}

fn serialize_array(
    schema: &SchemaObject,
    origin: &Location,
    section: &str,
    ctx: &ResolverContext<'_>,
    guard: &mut CycleGuard,
) -> Result<SerializedFragment, BackendError> {
    let items = match &schema.items {
        Some(items) => serialize_schema(items, origin, section, ctx, guard)?,
        None => SerializedFragment::new("unknown", "t.unknown"),
    };
    Ok(io_ts(
        SerializedFragment::new("Array<", "t.array(")
            .combine(items)
            .combine(SerializedFragment::new(">", ")")),
    ))
}

fn serialize_object(
    schema: &SchemaObject,
    origin: &Location,
    section: &str,
    ctx: &ResolverContext<'_>,
    guard: &mut CycleGuard,
) -> Result<SerializedFragment, BackendError> {
    let required: BTreeSet<&str> = schema.required_names().iter().map(String::as_str).collect();
    let mut parts = Vec::new();

    if let Some(properties) = &schema.properties {
        if properties.is_empty() {
            parts.push(io_ts(SerializedFragment::new("{}", "t.type({})")));
        } else {
            let mut fields = Vec::with_capacity(properties.len());
            for (property, child) in properties {
                let value = serialize_schema(child, origin, section, ctx, guard)?;
                fields.push(from_field(
                    &quote_if_needed(property),
                    value,
                    required.contains(property.as_str()),
                ));
            }
            let body = SerializedParameter::intercalate(&SerializedFragment::new("; ", ", "), fields);
            parts.push(io_ts(
                SerializedFragment::new("{ ", "t.type({ ")
                    .combine(body.fragment)
                    .combine(SerializedFragment::new(" }", " })")),
            ));
        }
    }

    if let Some(AdditionalProperties::Schema(extra)) = &schema.additional_properties {
        let value = serialize_schema(extra, origin, section, ctx, guard)?;
        parts.push(io_ts(
            SerializedFragment::new("{ [key: string]: ", "t.record(t.string, ")
                .combine(value)
                .combine(SerializedFragment::new(" }", ")")),
        ));
    }

    match parts.len() {
        0 => Ok(io_ts(SerializedFragment::new(
            "Record<string, unknown>",
            "t.UnknownRecord",
        ))),
        1 => Ok(parts.remove(0)),
        _ => Ok(intersection(parts)),
    }
}

fn serialize_all_of(
    members: &[SchemaObject],
    origin: &Location,
    section: &str,
    ctx: &ResolverContext<'_>,
    guard: &mut CycleGuard,
) -> Result<SerializedFragment, BackendError> {
    let mut parts = Vec::with_capacity(members.len());
    for member in members {
        parts.push(serialize_schema(member, origin, section, ctx, guard)?);
    }
    match parts.len() {
        0 => Ok(io_ts(SerializedFragment::new("unknown", "t.unknown"))),
        1 => Ok(parts.remove(0)),
        _ => Ok(intersection(parts)),
    }
}

fn serialize_enum(values: &[Value]) -> Result<SerializedFragment, BackendError> {
    let mut literals = Vec::with_capacity(values.len());
    for value in values {
        literals.push(literal_fragment(value)?);
    }
    match literals.len() {
        0 => Err(BackendError::Unsupported("empty enum".to_string())),
        1 => Ok(literals.remove(0)),
        _ => {
            let body =
                SerializedFragment::intercalate(&SerializedFragment::new(" | ", ", "), literals);
            Ok(io_ts(
                SerializedFragment::new("", "t.union([")
                    .combine(body)
                    .combine(SerializedFragment::new("", "])")),
            ))
        }
    }
}

fn literal_fragment(value: &Value) -> Result<SerializedFragment, BackendError> {
    let fragment = match value {
        Value::String(text) => {
            let quoted = format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"));
            SerializedFragment::new(&quoted, format!("t.literal({quoted})"))
        }
        Value::Number(number) => {
            SerializedFragment::new(number.to_string(), format!("t.literal({number})"))
        }
        Value::Bool(flag) => SerializedFragment::new(flag.to_string(), format!("t.literal({flag})")),
        Value::Null => SerializedFragment::new("null", "t.null"),
        other => {
            return Err(BackendError::Unsupported(format!(
                "enum value `{other}` is not a literal"
            )));
        }
    };
    Ok(io_ts(fragment))
}

/// Intersection of two or more fragments: `A & B` with
/// `t.intersection([a, b])`.
fn intersection(parts: Vec<SerializedFragment>) -> SerializedFragment {
    let body = SerializedFragment::intercalate(&SerializedFragment::new(" & ", ", "), parts);
    io_ts(
        SerializedFragment::new("", "t.intersection([")
            .combine(body)
            .combine(SerializedFragment::new("", "])")),
    )
}

fn io_ts(fragment: SerializedFragment) -> SerializedFragment {
    fragment.with_dependency("*t", "io-ts")
}

fn key_of(ctx: &ResolverContext<'_>, location: &Location) -> Result<String, BackendError> {
    ctx.key_of(location).ok_or_else(|| {
        BackendError::Unsupported(format!("document {location} is not in the loaded graph"))
    })
}
