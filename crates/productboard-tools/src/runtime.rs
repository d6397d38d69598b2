//! Runtime for executing Productboard tools.
//!
//! One generic pipeline serves every catalog entry:
//! 1. build the request (path, query, body) from the arguments actually supplied,
//! 2. send it exactly once with the fixed header set and timeout,
//! 3. normalize the outcome into a [`ToolEnvelope`].

use crate::catalog::{self, BodyShape, EndpointDescriptor, HEALTH_CHECK_TOOL, ParamLocation};
use crate::config::ApiConfig;
use crate::envelope::ToolEnvelope;
use crate::safety::{redact_url, sanitize_reqwest_error};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub const API_VERSION_HEADER: &str = "X-Version";

#[derive(Debug, Error)]
pub enum ProductboardToolsError {
    #[error("config error: {0}")]
    Config(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("missing required parameter: {0}")]
    MissingParameter(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("API returned {status} {reason}: {detail}")]
    Http {
        status: u16,
        reason: String,
        detail: String,
    },
    #[error("failed to decode response body as JSON: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ProductboardToolsError>;

fn transport_error(e: &reqwest::Error, timeout: Duration) -> ProductboardToolsError {
    if e.is_timeout() {
        ProductboardToolsError::Timeout(timeout)
    } else if e.is_connect() {
        ProductboardToolsError::Connect(sanitize_reqwest_error(e))
    } else {
        ProductboardToolsError::Transport(sanitize_reqwest_error(e))
    }
}

#[derive(Debug)]
struct RequestParts {
    url: Url,
    body: Option<Value>,
}

#[derive(Clone)]
pub struct ProductboardToolSource {
    inner: Arc<ProductboardToolSourceInner>,
}

struct ProductboardToolSourceInner {
    config: ApiConfig,
    base_url: Url,
    client: Client,
}

impl ProductboardToolSource {
    /// Build a tool source from the process-wide API settings.
    ///
    /// The resulting instance is immutable and safe to share across tasks; clones share one
    /// connection pool.
    ///
    /// # Errors
    ///
    /// Returns a config error if the settings are invalid or the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = config.validate()?;
        let client = Client::builder().build().map_err(|e| {
            ProductboardToolsError::Config(format!(
                "failed to build HTTP client: {}",
                sanitize_reqwest_error(&e)
            ))
        })?;

        Ok(Self {
            inner: Arc::new(ProductboardToolSourceInner {
                config,
                base_url,
                client,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// List the MCP `Tool`s: every catalog endpoint followed by `health_check`.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        let envelope_schema = Arc::new(as_json_object(ToolEnvelope::output_schema()));

        let mut tools: Vec<Tool> = catalog::endpoints()
            .iter()
            .map(|endpoint| {
                let mut tool = Tool::new(
                    endpoint.name,
                    endpoint.description,
                    Arc::new(as_json_object(endpoint.input_schema())),
                );
                tool.output_schema = Some(Arc::clone(&envelope_schema));
                tool.annotations = Some(crate::semantics::annotations_for_endpoint(endpoint));
                tool
            })
            .collect();

        let mut health = Tool::new(
            HEALTH_CHECK_TOOL,
            catalog::health_check_description(),
            Arc::new(as_json_object(json!({ "type": "object", "properties": {} }))),
        );
        health.output_schema = Some(Arc::new(as_json_object(health_output_schema())));
        health.annotations = Some(crate::semantics::health_check_annotations());
        tools.push(health);

        tools
    }

    /// Execute a tool call by name.
    ///
    /// Failures of the Productboard call itself never surface as `Err`: they are reported in the
    /// returned envelope (`structured_content`) with `is_error` set.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tool name is unknown.
    pub async fn call_tool(&self, tool_name: &str, arguments: &JsonObject) -> Result<CallToolResult> {
        if tool_name == HEALTH_CHECK_TOOL {
            info!("health_check called");
            return Ok(structured_result(catalog::health_report().to_value(), false));
        }

        let endpoint = catalog::find(tool_name)
            .ok_or_else(|| ProductboardToolsError::UnknownTool(tool_name.to_string()))?;

        let envelope = self.invoke(endpoint, arguments).await;
        let is_error = !envelope.is_success();
        Ok(structured_result(envelope.to_value(), is_error))
    }

    /// Run one endpoint: build, send once, normalize. Never fails.
    pub async fn invoke(&self, endpoint: &EndpointDescriptor, arguments: &JsonObject) -> ToolEnvelope {
        let subject = endpoint
            .log_subject
            .and_then(|name| endpoint.param(name))
            .and_then(|param| arguments.get(param.name))
            .map(value_to_string);
        info!(
            tool = endpoint.name,
            subject = subject.as_deref(),
            "tool called"
        );

        let result = self.execute(endpoint, arguments).await;
        match &result {
            Ok(_) => info!(tool = endpoint.name, "tool call succeeded"),
            Err(e) => warn!(tool = endpoint.name, error = %e, "tool call failed"),
        }

        ToolEnvelope::from_result(result)
    }

    async fn execute(&self, endpoint: &EndpointDescriptor, arguments: &JsonObject) -> Result<Value> {
        let inner = &self.inner;
        let timeout = inner.config.timeout;
        let parts = build_request_parts(&inner.base_url, endpoint, arguments)?;
        let method = endpoint.method.to_reqwest();

        debug!(
            tool = endpoint.name,
            method = %method,
            url = %redact_url(&parts.url),
            has_body = parts.body.is_some(),
            "sending Productboard request"
        );

        let mut request = inner.client.request(method, parts.url);
        request = apply_headers(&inner.config, request);
        if let Some(body) = &parts.body {
            request = request.json(body);
        }
        request = request.timeout(timeout);

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&e, timeout))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&e, timeout))?;

        normalize_response(status, &bytes)
    }
}

fn structured_result(structured: Value, is_error: bool) -> CallToolResult {
    // Return both `structured_content` and `Content::text(...)` for interoperability:
    // some MCP clients only render `content` and ignore `structured_content`.
    let text = serde_json::to_string(&structured).unwrap_or_else(|_| structured.to_string());
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: Some(structured),
        is_error: Some(is_error),
        meta: None,
    }
}

fn health_output_schema() -> Value {
    json!({
        "type": "object",
        "required": ["status", "server", "tools"],
        "properties": {
            "status": { "type": "string" },
            "server": { "type": "string" },
            "tools": { "type": "array", "items": { "type": "string" } }
        }
    })
}

fn as_json_object(value: Value) -> JsonObject {
    value.as_object().cloned().unwrap_or_else(JsonObject::new)
}

fn apply_headers(config: &ApiConfig, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request
        .bearer_auth(&config.token)
        .header(CONTENT_TYPE, "application/json")
        .header(API_VERSION_HEADER, config.api_version.as_str())
}

/// Classify a completed HTTP exchange.
fn normalize_response(status: StatusCode, bytes: &[u8]) -> Result<Value> {
    if status.is_success() {
        return serde_json::from_slice(bytes)
            .map_err(|e| ProductboardToolsError::Decode(e.to_string()));
    }

    let detail = if bytes.is_empty() {
        "<empty body>".to_string()
    } else {
        let text = String::from_utf8_lossy(bytes);
        match serde_json::from_str::<Value>(&text) {
            Ok(v) => v.to_string(),
            Err(_) => text.into_owned(),
        }
    };

    Err(ProductboardToolsError::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        detail,
    })
}

fn build_request_parts(
    base_url: &Url,
    endpoint: &EndpointDescriptor,
    arguments: &JsonObject,
) -> Result<RequestParts> {
    let mut path_values: Vec<(&str, String)> = Vec::new();
    let mut query: Vec<(&str, String)> = Vec::new();
    let mut body_fields: Map<String, Value> = Map::new();

    for param in endpoint.params {
        // Presence, not truthiness: only absent or explicit null arguments are skipped.
        let value = match arguments.get(param.name) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        };

        let Some(value) = value else {
            if param.required {
                return Err(ProductboardToolsError::MissingParameter(
                    param.name.to_string(),
                ));
            }
            continue;
        };

        match param.location {
            ParamLocation::Path => {
                let segment = path_segment(param.name, value)?;
                path_values.push((param.wire_name, segment));
            }
            ParamLocation::Query => append_query_pairs(&mut query, param.wire_name, value),
            ParamLocation::Body => {
                body_fields.insert(param.wire_name.to_string(), value.clone());
            }
        }
    }

    let url = build_url(base_url, endpoint.path, &path_values, &query)?;
    let body = shape_body(endpoint.body, body_fields);

    Ok(RequestParts { url, body })
}

fn path_segment(name: &str, value: &Value) -> Result<String> {
    match value {
        // `.` and `..` are dropped by URL normalization and would address the parent resource.
        Value::String(s) if matches!(s.as_str(), "" | "." | "..") => Err(
            ProductboardToolsError::InvalidArgument(format!("{name} must be a non-empty id, got '{s}'")),
        ),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ProductboardToolsError::InvalidArgument(format!(
            "{name} must be a string or number"
        ))),
    }
}

fn append_query_pairs<'a>(query: &mut Vec<(&'a str, String)>, key: &'a str, value: &Value) {
    match value {
        // An empty list is still "supplied"; send the bare key.
        Value::Array(items) if items.is_empty() => query.push((key, String::new())),
        Value::Array(items) => query.extend(items.iter().map(|item| (key, value_to_string(item)))),
        other => query.push((key, value_to_string(other))),
    }
}

fn build_url(
    base_url: &Url,
    template: &str,
    path_values: &[(&str, String)],
    query: &[(&str, String)],
) -> Result<Url> {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            ProductboardToolsError::Config(format!("base URL '{base_url}' cannot carry a path"))
        })?;
        segments.pop_if_empty();

        for raw in template.split('/').filter(|s| !s.is_empty()) {
            if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                let value = path_values
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, v)| v.as_str())
                    .ok_or_else(|| ProductboardToolsError::MissingParameter(name.to_string()))?;
                // `push` percent-encodes, so an id can never add path segments.
                segments.push(value);
            } else {
                segments.push(raw);
            }
        }
    }

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

fn shape_body(shape: BodyShape, fields: Map<String, Value>) -> Option<Value> {
    match shape {
        BodyShape::Empty => None,
        BodyShape::Fields => Some(Value::Object(fields)),
        BodyShape::Raw => fields.into_iter().next().map(|(_, v)| v),
        BodyShape::Subscription => Some(subscription_body(fields)),
    }
}

fn subscription_body(mut fields: Map<String, Value>) -> Value {
    let mut notification = Map::new();
    for key in ["url", "version"] {
        if let Some(v) = fields.remove(key) {
            notification.insert(key.to_string(), v);
        }
    }

    let mut data = Map::new();
    if let Some(events) = fields.remove("events") {
        data.insert("events".to_string(), events);
    }
    data.insert("notification".to_string(), Value::Object(notification));

    json!({ "data": data })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
