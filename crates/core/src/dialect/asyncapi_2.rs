//! AsyncAPI 2.0.0 document subset and decoder.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::dialect::openapi_3::Components;
use crate::dialect::swagger_2::Info;
use crate::dialect::{Decoder, decode_node};
use crate::error::DecodeError;

/// Root AsyncAPI 2.0.0 specification.
#[derive(Debug, Clone, Deserialize)]
pub struct AsyncApiSpec {
    /// Dialect version marker; must be `"2.0.0"`.
    pub asyncapi: String,
    /// API metadata.
    pub info: Info,
    /// Channel items; kept raw, the bundled backend generates from components.
    #[serde(default)]
    pub channels: BTreeMap<String, Value>,
    /// Reusable components; same schema shape as OpenAPI 3.0.
    pub components: Option<Components>,
}

/// Decoder for AsyncAPI 2.0.0 documents.
#[derive(Debug, Clone, Copy)]
pub struct AsyncApi2Decoder;

impl Decoder for AsyncApi2Decoder {
    type Output = AsyncApiSpec;

    fn expected(&self) -> &'static str {
        "AsyncAPI 2.0.0 document"
    }

    fn decode(&self, node: &Value) -> Result<AsyncApiSpec, DecodeError> {
        let spec: AsyncApiSpec = decode_node(node, self.expected())?;
        if spec.asyncapi != "2.0.0" {
            return Err(DecodeError {
                path: "asyncapi".to_string(),
                expected: self.expected().to_string(),
                message: format!("unsupported version `{}`", spec.asyncapi),
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
            "asyncapi": "2.0.0",
            "info": { "title": "Events", "version": "1.0.0" },
            "channels": { "user/signedup": {} },
            "components": { "schemas": { "UserSignedUp": { "type": "object" } } }
        });
        let spec = AsyncApi2Decoder.decode(&node).unwrap();
        assert!(spec.channels.contains_key("user/signedup"));
    }

    #[test]
    fn test_decode_rejects_other_versions() {
        let node = json!({
            "asyncapi": "2.1.0",
            "info": { "title": "Events", "version": "1.0.0" }
        });
        assert!(AsyncApi2Decoder.decode(&node).is_err());
    }
}
