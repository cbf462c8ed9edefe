//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{HealthResponse, KindsResponse, QueryRequest, QueryResponse},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use scholar_core::{GraphStore, Reasoner, export_view};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATS HANDLER
// =============================================================================

/// Node and edge counts by kind and relation.
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.graph.statistics()))
}

// =============================================================================
// GRAPH HANDLER
// =============================================================================

/// Whole graph as a visualization view (`{nodes, edges}`).
pub async fn graph_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(export_view(state.graph.as_ref())))
}

// =============================================================================
// KINDS HANDLER
// =============================================================================

/// Supported query kinds and their parameters.
pub async fn kinds_handler() -> impl IntoResponse {
    Json(KindsResponse::default())
}

// =============================================================================
// QUERY HANDLER
// =============================================================================

/// Execute a structured query.
///
/// Failed results (unknown kind, unresolved key, bad parameter) are returned
/// with `400 Bad Request` and the same body shape as successes.
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    let result =
        Reasoner::new(state.graph.as_ref()).execute_named(&request.query_type, &request.parameters);

    let status = if result.success {
        tracing::debug!(
            query_type = %request.query_type,
            steps = result.steps.len(),
            "Query answered"
        );
        StatusCode::OK
    } else {
        tracing::info!(
            query_type = %request.query_type,
            error = result.error_message.as_deref().unwrap_or_default(),
            "Query failed"
        );
        StatusCode::BAD_REQUEST
    };

    (status, Json(QueryResponse::from(result)))
}
