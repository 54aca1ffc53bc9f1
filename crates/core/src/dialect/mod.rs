//! Dialect decoders and the structural dialect discriminator.
//!
//! Exactly one decoder is chosen per generation run for the root document;
//! non-root nodes are first tested against [`sniff_dialect`] to decide
//! between fatal decoding and skipping them as opaque embedded data.

pub mod asyncapi_2;
pub mod openapi_3;
pub mod schema;
pub mod sketch_121;
pub mod swagger_2;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;

/// Validated decoding of a raw document node into a typed dialect tree.
pub trait Decoder: fmt::Debug {
    /// The strongly-typed result of a successful decode.
    type Output;

    /// Human-readable description of the shape this decoder expects, used in
    /// decode failure reports.
    fn expected(&self) -> &'static str;

    /// Decode and validate `node`, reporting the offending sub-path on
    /// failure.
    fn decode(&self, node: &Value) -> Result<Self::Output, DecodeError>;
}

/// Deserialize a node with serde, capturing the JSON sub-path of the first
/// failure.
pub(crate) fn decode_node<T: DeserializeOwned>(
    node: &Value,
    expected: &'static str,
) -> Result<T, DecodeError> {
    serde_path_to_error::deserialize(node.clone()).map_err(|err| DecodeError {
        path: err.path().to_string(),
        expected: expected.to_string(),
        message: err.into_inner().to_string(),
    })
}

/// The supported specification dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Swagger 2.0, the legacy REST-description revision.
    Swagger2,
    /// OpenAPI 3.0.x, the current REST-description revision.
    OpenApi3,
    /// AsyncAPI 2.0.0, the async/event dialect.
    AsyncApi2,
    /// Sketch file format 121, the design-tool dialect.
    Sketch121,
}

/// Ordered list of structural predicates; extend here to teach the pipeline
/// a new dialect without touching the resolver or the fragment algebra.
const DISCRIMINATORS: &[(fn(&Value) -> bool, Dialect)] = &[
    (looks_like_swagger_2, Dialect::Swagger2),
    (looks_like_openapi_3, Dialect::OpenApi3),
    (looks_like_asyncapi_2, Dialect::AsyncApi2),
    (looks_like_sketch_121, Dialect::Sketch121),
];

/// Lightweight shape test distinguishing "looks like a known spec dialect"
/// from arbitrary embedded JSON. Used only for non-root nodes: a node that
/// fails every predicate is treated as opaque data, never as an error.
pub fn sniff_dialect(node: &Value) -> Option<Dialect> {
    DISCRIMINATORS
        .iter()
        .find(|(predicate, _)| predicate(node))
        .map(|(_, dialect)| *dialect)
}

fn looks_like_swagger_2(node: &Value) -> bool {
    node.get("swagger").and_then(Value::as_str) == Some("2.0")
}

fn looks_like_openapi_3(node: &Value) -> bool {
    matches!(
        node.get("openapi").and_then(Value::as_str),
        Some("3.0.0" | "3.0.1" | "3.0.2")
    )
}

fn looks_like_asyncapi_2(node: &Value) -> bool {
    node.get("asyncapi").and_then(Value::as_str) == Some("2.0.0")
}

fn looks_like_sketch_121(node: &Value) -> bool {
    node.get("meta")
        .and_then(|meta| meta.get("version"))
        .and_then(Value::as_u64)
        == Some(121)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sniff_swagger_2() {
        assert_eq!(sniff_dialect(&json!({"swagger": "2.0"})), Some(Dialect::Swagger2));
        assert_eq!(sniff_dialect(&json!({"swagger": "1.2"})), None);
    }

    #[test]
    fn test_sniff_openapi_3() {
        for version in ["3.0.0", "3.0.1", "3.0.2"] {
            assert_eq!(
                sniff_dialect(&json!({"openapi": version})),
                Some(Dialect::OpenApi3)
            );
        }
        assert_eq!(sniff_dialect(&json!({"openapi": "3.1.0"})), None);
    }

    #[test]
    fn test_sniff_asyncapi_2() {
        assert_eq!(
            sniff_dialect(&json!({"asyncapi": "2.0.0"})),
            Some(Dialect::AsyncApi2)
        );
    }

    #[test]
    fn test_sniff_sketch_121() {
        assert_eq!(
            sniff_dialect(&json!({"meta": {"version": 121}})),
            Some(Dialect::Sketch121)
        );
        assert_eq!(sniff_dialect(&json!({"meta": {"version": 120}})), None);
    }

    #[test]
    fn test_sniff_arbitrary_json_is_none() {
        assert_eq!(sniff_dialect(&json!({"foo": "bar"})), None);
        assert_eq!(sniff_dialect(&json!([1, 2, 3])), None);
        assert_eq!(sniff_dialect(&json!("2.0")), None);
    }
}
