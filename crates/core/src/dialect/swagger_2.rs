//! Swagger 2.0 document subset and decoder.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::dialect::schema::SchemaObject;
use crate::dialect::{Decoder, decode_node};
use crate::error::DecodeError;

/// Root Swagger 2.0 specification.
#[derive(Debug, Clone, Deserialize)]
pub struct SwaggerSpec {
    /// Dialect version marker; must be `"2.0"`.
    pub swagger: String,
    /// API metadata.
    pub info: Info,
    /// Named reusable schemas.
    pub definitions: Option<BTreeMap<String, SchemaObject>>,
    /// Path items; kept raw, the bundled backend generates from definitions.
    #[serde(default)]
    pub paths: BTreeMap<String, Value>,
}

/// API metadata common to all dialects.
#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    /// Title of the API.
    pub title: String,
    /// Version of the described API.
    pub version: String,
}

/// Decoder for Swagger 2.0 documents.
#[derive(Debug, Clone, Copy)]
pub struct Swagger2Decoder;

impl Decoder for Swagger2Decoder {
    type Output = SwaggerSpec;

    fn expected(&self) -> &'static str {
        "Swagger 2.0 document"
    }

    fn decode(&self, node: &Value) -> Result<SwaggerSpec, DecodeError> {
        let spec: SwaggerSpec = decode_node(node, self.expected())?;
        if spec.swagger != "2.0" {
            return Err(DecodeError {
                path: "swagger".to_string(),
                expected: self.expected().to_string(),
                message: format!("unsupported version `{}`", spec.swagger),
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
            "swagger": "2.0",
            "info": { "title": "Petstore", "version": "1.0.0" },
            "paths": {},
            "definitions": {
                "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
            }
        });
        let spec = Swagger2Decoder.decode(&node).unwrap();
        assert_eq!(spec.info.title, "Petstore");
        assert!(spec.definitions.unwrap().contains_key("Pet"));
    }

    #[test]
    fn test_decode_rejects_wrong_version() {
        let node = json!({
            "swagger": "1.2",
            "info": { "title": "Old", "version": "0.1" }
        });
        let err = Swagger2Decoder.decode(&node).unwrap_err();
        assert_eq!(err.path, "swagger");
        assert!(err.message.contains("1.2"));
    }

    #[test]
    fn test_decode_missing_info_is_error() {
        let node = json!({ "swagger": "2.0" });
        let err = Swagger2Decoder.decode(&node).unwrap_err();
        assert!(err.message.contains("info"));
    }
}
