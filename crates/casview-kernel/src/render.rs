//! Wire renderer seam.
//!
//! Renderers map model fields to protocol markup and own byte-exact output.
//! XML and plain-text renderers live with the template layer; the JSON
//! renderer here serves tooling and diagnostics.

use crate::model::ResponseModel;
use crate::version::ProtocolVersion;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to encode response model: {0}")]
    Encode(String),
}

/// Consumes a finished model and emits wire bytes for `version`.
pub trait WireRenderer: Send + Sync {
    /// Content type of the produced bytes.
    fn content_type(&self) -> &str;

    fn render(
        &self,
        model: &ResponseModel,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, RenderError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    protocol_version: ProtocolVersion,
    fields: &'a ResponseModel,
}

/// Renders `{"protocolVersion": n, "fields": {...}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl WireRenderer for JsonRenderer {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn render(
        &self,
        model: &ResponseModel,
        version: ProtocolVersion,
    ) -> Result<Vec<u8>, RenderError> {
        let doc = JsonDocument {
            protocol_version: version,
            fields: model,
        };
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(&doc)
        } else {
            serde_json::to_vec(&doc)
        };
        encoded.map_err(|e| RenderError::Encode(e.to_string()))
    }
}
