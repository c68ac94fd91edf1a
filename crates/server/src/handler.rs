//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::price_compare::{PriceCompareParams, compare_impl};
use dealscout_client::ChromiumProvider;
use dealscout_core::AppConfig;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for dealscout.
#[derive(Clone)]
pub struct DealScoutServer {
    tool_router: ToolRouter<Self>,
    config: Arc<AppConfig>,
    provider: Arc<ChromiumProvider>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl DealScoutServer {
    /// Create a new server handler.
    pub fn new(config: AppConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
            provider: Arc::new(ChromiumProvider::new()),
        }
    }

    /// Compare a product's price across storefronts.
    ///
    /// Drives a headless browser through Amazon, Flipkart and Myntra search
    /// results and reports every offer plus the cheapest one.
    #[tool(
        description = "Search Amazon, Flipkart and Myntra for a product. Returns each site's price and review text and the lowest-priced offer."
    )]
    async fn price_compare(&self, params: Parameters<PriceCompareParams>) -> Result<CallToolResult, McpError> {
        compare_impl(self.provider.as_ref(), &self.config, params.0).await
    }
}

impl ServerHandler for DealScoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "dealscout".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
