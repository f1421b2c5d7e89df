//! axum server exposing `/health`, `/tools` and `/call`

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::tools::ToolRegistry;

pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Body of `POST /call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// HTTP server
pub struct HttpServer {
    registry: Arc<ToolRegistry>,
    addr: SocketAddr,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(registry: Arc<ToolRegistry>, addr: SocketAddr) -> Self {
        Self { registry, addr }
    }

    /// Build the router
    pub fn router(registry: Arc<ToolRegistry>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/tools", get(tools_handler))
            .route("/call", post(call_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(registry)
    }

    /// Start the server; returns after Ctrl-C
    pub async fn start(self) -> std::io::Result<()> {
        let app = Self::router(self.registry);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("HTTP server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Health check endpoint
async fn health_handler() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn tools_handler(State(registry): State<Arc<ToolRegistry>>) -> Json<Value> {
    Json(json!({"tools": registry.definitions()}))
}

/// Unreadable bodies, unknown tools and bad arguments are the caller's fault
/// (400); a failed kubectl call is an upstream failure (502).
async fn call_handler(
    State(registry): State<Arc<ToolRegistry>>,
    body: std::result::Result<Json<CallRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), "rejected /call body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match registry.call(&request.name, request.arguments).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            error_response(status, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}
