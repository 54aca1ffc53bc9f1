//! OpenAPI 3.0.x document subset and decoder.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::dialect::schema::SchemaObject;
use crate::dialect::swagger_2::Info;
use crate::dialect::{Decoder, decode_node};
use crate::error::DecodeError;

/// Root OpenAPI 3.0 specification.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiSpec {
    /// Dialect version marker; must be one of `3.0.0`, `3.0.1`, `3.0.2`.
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// Reusable components.
    pub components: Option<Components>,
    /// Path items; kept raw, the bundled backend generates from components.
    #[serde(default)]
    pub paths: BTreeMap<String, Value>,
}

/// Components section containing reusable schemas.
#[derive(Debug, Clone, Deserialize)]
pub struct Components {
    /// Named reusable schemas.
    pub schemas: Option<BTreeMap<String, SchemaObject>>,
}

/// Decoder for OpenAPI 3.0.x documents.
#[derive(Debug, Clone, Copy)]
pub struct OpenApi3Decoder;

impl Decoder for OpenApi3Decoder {
    type Output = OpenApiSpec;

    fn expected(&self) -> &'static str {
        "OpenAPI 3.0 document"
    }

    fn decode(&self, node: &Value) -> Result<OpenApiSpec, DecodeError> {
        let spec: OpenApiSpec = decode_node(node, self.expected())?;
        if !matches!(spec.openapi.as_str(), "3.0.0" | "3.0.1" | "3.0.2") {
            return Err(DecodeError {
                path: "openapi".to_string(),
                expected: self.expected().to_string(),
                message: format!("unsupported version `{}`", spec.openapi),
            });
        }
        Ok(spec)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_minimal_spec() {
        let node = json!({
            "openapi": "3.0.2",
            "info": { "title": "Items", "version": "2.0.0" },
            "components": {
                "schemas": { "Item": { "type": "object" } }
            }
        });
        let spec = OpenApi3Decoder.decode(&node).unwrap();
        assert!(spec.components.unwrap().schemas.unwrap().contains_key("Item"));
    }

    #[test]
    fn test_decode_rejects_31() {
        let node = json!({
            "openapi": "3.1.0",
            "info": { "title": "Items", "version": "2.0.0" }
        });
        let err = OpenApi3Decoder.decode(&node).unwrap_err();
        assert_eq!(err.path, "openapi");
    }
}
