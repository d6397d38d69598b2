//! MCP `ToolAnnotations` for the Productboard tools.
//!
//! Hints follow RFC 9110 method semantics of the endpoint behind each tool.

use crate::catalog::{EndpointDescriptor, HttpMethod};
use rmcp::model::ToolAnnotations;

/// Annotations for an endpoint-backed tool.
///
/// `openWorldHint` is always `true`: every such tool talks to Productboard.
#[must_use]
pub fn annotations_for_endpoint(endpoint: &EndpointDescriptor) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = match endpoint.method {
        HttpMethod::Get => (true, false, Some(true)),
        HttpMethod::Post => (false, false, Some(false)),
        HttpMethod::Put => (false, true, Some(true)),
        // PATCH may or may not be idempotent; do not guess.
        HttpMethod::Patch => (false, true, None),
    };

    ToolAnnotations {
        title: Some(endpoint.title.to_string()),
        read_only_hint: Some(read_only),
        destructive_hint: Some(destructive),
        idempotent_hint: idempotent,
        open_world_hint: Some(true),
    }
}

/// `health_check` answers locally and never touches Productboard.
#[must_use]
pub fn health_check_annotations() -> ToolAnnotations {
    ToolAnnotations {
        title: Some("Health check".to_string()),
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(false),
    }
}
