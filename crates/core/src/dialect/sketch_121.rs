//! Sketch file format 121 subset and decoder.
//!
//! The design-tool dialect decodes so that Sketch documents embedded in a
//! reference graph are recognized and validated; no backend is bundled for
//! it.

use serde::Deserialize;
use serde_json::Value;

use crate::dialect::{Decoder, decode_node};
use crate::error::DecodeError;

/// Root Sketch file.
#[derive(Debug, Clone, Deserialize)]
pub struct SketchFile {
    /// File metadata; the version discriminates the format revision.
    pub meta: SketchMeta,
    /// Document body; kept raw.
    pub document: Option<Value>,
}

/// Sketch file metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SketchMeta {
    /// Format revision; must be 121.
    pub version: u64,
}

/// Decoder for Sketch format 121 files.
#[derive(Debug, Clone, Copy)]
pub struct Sketch121Decoder;

impl Decoder for Sketch121Decoder {
    type Output = SketchFile;

    fn expected(&self) -> &'static str {
        "Sketch 121 file"
    }

    fn decode(&self, node: &Value) -> Result<SketchFile, DecodeError> {
        let file: SketchFile = decode_node(node, self.expected())?;
        if file.meta.version != 121 {
            return Err(DecodeError {
                path: "meta.version".to_string(),
                expected: self.expected().to_string(),
                message: format!("unsupported version `{}`", file.meta.version),
            });
        }
        Ok(file)
    }
}
