//! MCP server and HTTP surface.
//!
//! `ApodServer` implements the Server role of the Model Context Protocol;
//! the tool set is fixed, so `ServerHandler` is implemented manually rather
//! than through the `#[tool_handler]` macro. The streamable HTTP transport is
//! mounted at `/mcp` behind the authentication interceptor, next to a plain
//! `/health` liveness probe.

use std::borrow::Cow;
use std::sync::Arc;

use axum::{middleware as axum_mw, routing, Json, Router};
use rmcp::{
    model::*,
    service::RequestContext,
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    },
    ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::auth;
use crate::config::Config;
use crate::credentials::resolve_credential;
use crate::tools;

pub const SERVICE_NAME: &str = "apod-mcp-server";

/// The APOD gateway MCP server.
#[derive(Clone)]
pub struct ApodServer {
    config: Config,
}

impl ApodServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Dispatch a tool call against the call's extensions.
    ///
    /// Separated from `call_tool` so tests can exercise tool semantics with
    /// hand-built extensions instead of a live `RequestContext`.
    fn dispatch(
        &self,
        name: &str,
        arguments: Option<&serde_json::Map<String, serde_json::Value>>,
        extensions: &Extensions,
    ) -> Result<CallToolResult, McpError> {
        let credential = resolve_credential(extensions);

        match name {
            tools::QUERY_APOD => {
                let Some(credential) = credential else {
                    tracing::info!(tool = name, "rejecting unauthenticated tool call");
                    return json_error(&tools::missing_credential_error());
                };
                // The tool schema marks `query` as required.
                let query = arguments
                    .and_then(|args| args.get("query"))
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        McpError::invalid_params(
                            "query_apod requires a string 'query' argument",
                            None,
                        )
                    })?;
                tracing::info!(
                    tool = name,
                    key_prefix = %credential.preview(),
                    "handling authenticated tool call"
                );
                json_success(&tools::query_apod_result(query))
            }
            tools::GET_API_INFO => {
                json_success(&tools::api_info(self.config.stage, credential.is_some()))
            }
            other => Err(McpError::invalid_request(
                format!("Unknown tool '{}'", other),
                None,
            )),
        }
    }
}

fn json_success<T: serde::Serialize>(body: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(body)
        .map_err(|e| McpError::internal_error(format!("result serialization failed: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn json_error<T: serde::Serialize>(body: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(body)
        .map_err(|e| McpError::internal_error(format!("result serialization failed: {e}"), None))?;
    Ok(CallToolResult::error(vec![Content::text(text)]))
}

impl ServerHandler for ApodServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "apod-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NASA Astronomy Picture of the Day gateway. Authenticate with \
                 Authorization: Bearer YOUR_API_KEY."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool {
                name: Cow::Borrowed(tools::QUERY_APOD),
                title: None,
                description: Some(Cow::Borrowed(
                    "Query the NASA Astronomy Picture of the Day API. Requires a \
                     Bearer token in the Authorization header.",
                )),
                input_schema: Arc::new(tools::query_apod_schema()),
                output_schema: None,
                annotations: None,
                execution: None,
                icons: None,
                meta: None,
            },
            Tool {
                name: Cow::Borrowed(tools::GET_API_INFO),
                title: None,
                description: Some(Cow::Borrowed(
                    "Get APOD service metadata and the caller's authentication status.",
                )),
                input_schema: Arc::new(tools::get_api_info_schema()),
                output_schema: None,
                annotations: None,
                execution: None,
                icons: None,
                meta: None,
            },
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(
            request.name.as_ref(),
            request.arguments.as_ref(),
            &context.extensions,
        )
    }
}

/// Liveness probe for container orchestration.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Build the HTTP surface: health probe plus the MCP endpoint, with the
/// authentication interceptor in front of everything.
pub fn build_router(config: Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mcp_service = StreamableHttpService::new(
        move || Ok(ApodServer::new(config.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route("/health", routing::get(health_check))
        .nest_service("/mcp", mcp_service)
        .layer(axum_mw::from_fn(auth::auth_middleware))
        .layer(cors)
}
