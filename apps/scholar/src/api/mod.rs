//! # Scholar HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /stats` - Node and edge counts
//! - `GET /graph` - Whole graph as `{nodes, edges}` for visualization
//! - `GET /kinds` - Supported query kinds
//! - `POST /query` - Execute a structured query
//!
//! ## Configuration (Environment Variables)
//!
//! - `SCHOLAR_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

mod handlers;
mod types;

pub use handlers::{graph_handler, health_handler, kinds_handler, query_handler, stats_handler};
pub use types::{HealthResponse, KindDescriptor, KindsResponse, QueryRequest, QueryResponse};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use scholar_core::{Graph, ScholarError};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit for `POST /query`.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// The graph is never mutated after load, so handlers share it without a lock.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<Graph>,
}

impl AppState {
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `SCHOLAR_CORS_ORIGINS`:
/// - If "*": allows all origins
/// - If not set: defaults to localhost only
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("SCHOLAR_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (SCHOLAR_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in SCHOLAR_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No SCHOLAR_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/stats", get(handlers::stats_handler))
        .route("/graph", get(handlers::graph_handler))
        .route("/kinds", get(handlers::kinds_handler))
        .route("/query", post(handlers::query_handler))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, graph: Graph) -> Result<(), ScholarError> {
    let router = create_router(AppState::new(graph));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ScholarError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Scholar HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| ScholarError::IoError(format!("Server error: {}", e)))
}
