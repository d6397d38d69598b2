//! The uniform result envelope returned by every Productboard tool.

use crate::runtime::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Outcome of a single tool invocation.
///
/// Serializes as `{"status": "success", "data": ...}` or `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolEnvelope {
    Success { data: Value },
    Error { message: String },
}

impl ToolEnvelope {
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Collapse a pipeline result; every error becomes an `Error` envelope.
    #[must_use]
    pub fn from_result(result: Result<Value>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(e.to_string()),
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            json!({ "status": "error", "message": format!("failed to encode result: {e}") })
        })
    }

    /// JSON schema advertised as the `outputSchema` of every Productboard tool.
    #[must_use]
    pub fn output_schema() -> Value {
        json!({
            "type": "object",
            "required": ["status"],
            "properties": {
                "status": { "type": "string", "enum": ["success", "error"] },
                "data": { "description": "Parsed Productboard response body (success only)" },
                "message": { "type": "string", "description": "Failure description (error only)" }
            }
        })
    }
}
