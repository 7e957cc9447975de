//! HTTP transport implementation.
//!
//! Streamable-HTTP style endpoint: JSON-RPC over `POST`, session termination
//! over `DELETE`, plus `/health` and a root info page. Responses are always
//! plain `application/json`; no server-initiated event stream is offered.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, StatusCode, header};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::protocol::{INVALID_REQUEST, JsonRpcRequest, JsonRpcResponse};

/// Header carrying the session id issued on `initialize`.
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("mcp-session-id");

const JSON_MEDIA_TYPE: &str = "application/json";
const EVENT_STREAM_MEDIA_TYPE: &str = "text/event-stream";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Session ids handed out by this process.
///
/// Ids are only tracked so `DELETE` can tell known from unknown sessions.
/// Nothing is evicted: the set grows by one per `initialize` and shrinks only
/// on an explicit `DELETE`.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    ids: Arc<RwLock<HashSet<String>>>,
}

impl SessionStore {
    /// Issue and remember a fresh UUID v4 session id.
    pub async fn issue(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.ids.write().await.insert(id.clone());
        id
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.ids.read().await.contains(id)
    }

    /// Forget a session. Returns `false` if it was never issued.
    pub async fn remove(&self, id: &str) -> bool {
        self.ids.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.ids.read().await.len()
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    /// The MCP server instance.
    server: McpServer,
    sessions: SessionStore,
    rpc_path: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the router without binding a socket.
    pub fn router(&self, server: McpServer) -> Router {
        let state = AppState {
            server,
            sessions: SessionStore::default(),
            rpc_path: self.config.rpc_path.clone(),
        };

        let mut app = Router::new()
            .route(
                &self.config.rpc_path,
                get(handle_get).post(handle_post).delete(handle_delete),
            )
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([SESSION_HEADER]);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": state.rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "tools": state.server.tool_names(),
        "documentation": format!("Send POST requests to {} with JSON-RPC messages", state.rpc_path)
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle a JSON-RPC message.
#[instrument(skip_all, fields(method))]
async fn handle_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if !content_type_is_json(&headers) {
        return rejection(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type: Content-Type must be application/json",
        );
    }

    if !(accepts(&headers, JSON_MEDIA_TYPE) && accepts(&headers, EVENT_STREAM_MEDIA_TYPE)) {
        return rejection(
            StatusCode::NOT_ACCEPTABLE,
            "Not Acceptable: Client must accept both application/json and text/event-stream",
        );
    }

    let request = match JsonRpcRequest::parse(&body) {
        Ok(request) => request,
        Err(response) => {
            warn!("Rejected malformed JSON-RPC message");
            return (StatusCode::OK, Json(response)).into_response();
        }
    };

    tracing::Span::current().record("method", request.method.as_str());
    let is_initialize = request.method == "initialize";

    if !is_initialize {
        if let Some(session) = session_id(&headers) {
            if !state.sessions.contains(session).await {
                warn!("Request carries unknown session id {}", session);
            }
        }
    }

    // Dropping the handler (client went away) cancels in-flight tool work.
    let ctx = state.server.new_call_context();
    let _cancel_on_drop = ctx.cancellation().clone().drop_guard();

    let Some(response) = state.server.handle_request(request, &ctx).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    if is_initialize && response.is_success() {
        let session = state.sessions.issue().await;
        info!("Issued session {}", session);
        return (StatusCode::OK, [(SESSION_HEADER, session)], Json(response)).into_response();
    }

    (StatusCode::OK, Json(response)).into_response()
}

/// No server-initiated stream is offered.
async fn handle_get(headers: HeaderMap) -> Response {
    if !accepts(&headers, EVENT_STREAM_MEDIA_TYPE) {
        return rejection(
            StatusCode::NOT_ACCEPTABLE,
            "Not Acceptable: Client must accept text/event-stream",
        );
    }

    debug!("Refusing GET stream request");
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "POST, DELETE")]).into_response()
}

/// Terminate a session.
async fn handle_delete(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    let Some(session) = session_id(&headers) else {
        return StatusCode::BAD_REQUEST;
    };

    if state.sessions.remove(session).await {
        info!("Session {} terminated", session);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn rejection(status: StatusCode, message: &str) -> Response {
    debug!("Rejecting request with {}: {}", status, message);
    let body = JsonRpcResponse::error(Value::Null, INVALID_REQUEST, message);
    (status, Json(body)).into_response()
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(&SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn content_type_is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}

/// Whether any `Accept` header lists `media_type` explicitly.
fn accepts(headers: &HeaderMap, media_type: &str) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|entry| entry.split(';').next())
        .any(|media| media.trim().eq_ignore_ascii_case(media_type))
}
