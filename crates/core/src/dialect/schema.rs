//! Shared JSON-schema subset used by the schema-bearing dialects.
//!
//! Swagger 2.0 `definitions`, OpenAPI 3.0 `components.schemas` and
//! AsyncAPI 2.0 `components.schemas` all carry schema objects of this shape;
//! the bundled TypeScript backend serializes them uniformly.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::dialect::{Decoder, decode_node};
use crate::error::DecodeError;

/// A schema object: the subset of JSON Schema the generator maps to types
/// and validators.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    /// The schema type (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<String>,

    /// Reference to another schema node, possibly in another document.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types, in declaration-stable order.
    pub properties: Option<BTreeMap<String, SchemaObject>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<SchemaObject>>,

    /// Enum values.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,

    /// Intersection of schemas.
    pub all_of: Option<Vec<SchemaObject>>,

    /// Additional properties for dictionary-shaped objects.
    pub additional_properties: Option<AdditionalProperties>,

    /// Format hint (e.g. date-time, uuid).
    pub format: Option<String>,

    /// OpenAPI 3.0 nullable flag.
    pub nullable: Option<bool>,
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows arbitrary values, `false` forbids extra keys.
    Bool(bool),
    /// All extra values must match this schema.
    Schema(Box<SchemaObject>),
}

impl SchemaObject {
    /// Required property names as a slice, empty when absent.
    pub fn required_names(&self) -> &[String] {
        self.required.as_deref().unwrap_or_default()
    }
}

/// Decoder for a bare schema node; the expected shape of `$ref` targets in
/// schema position.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDecoder;

impl Decoder for SchemaDecoder {
    type Output = SchemaObject;

    fn expected(&self) -> &'static str {
        "schema object"
    }

    fn decode(&self, node: &Value) -> Result<SchemaObject, DecodeError> {
        decode_node(node, self.expected())
    }
}
