//! rmcp `ServerHandler` exposing the Productboard tools.

use productboard_mcp_tools::catalog::SERVER_NAME;
use productboard_mcp_tools::runtime::{ProductboardToolSource, ProductboardToolsError};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use std::future::Future;

#[derive(Clone)]
pub struct ProductboardServer {
    source: ProductboardToolSource,
}

impl ProductboardServer {
    #[must_use]
    pub fn new(source: ProductboardToolSource) -> Self {
        Self { source }
    }

    fn tools(&self) -> ListToolsResult {
        ListToolsResult::with_all_items(self.source.list_tools())
    }

    async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = arguments.unwrap_or_default();
        self.source
            .call_tool(name, &arguments)
            .await
            .map_err(to_mcp_error)
    }
}

fn to_mcp_error(e: ProductboardToolsError) -> ErrorData {
    match e {
        ProductboardToolsError::UnknownTool(_) => ErrorData::invalid_params(e.to_string(), None),
        other => ErrorData::internal_error(other.to_string(), None),
    }
}

impl ServerHandler for ProductboardServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "productboard-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some(SERVER_NAME.to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Tools for the Productboard REST API (notes, companies, features, custom fields, \
                 releases, webhooks, components). Every tool returns {\"status\":\"success\",\"data\":...} \
                 or {\"status\":\"error\",\"message\":...}. Omit optional arguments you do not want sent."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(self.tools()))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.call(&request.name, request.arguments).await }
    }
}
