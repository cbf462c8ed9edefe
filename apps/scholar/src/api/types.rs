//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use scholar_core::{QueryKind, QueryParams, ReasoningResult};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// KINDS RESPONSE
// =============================================================================

/// One supported query kind with its parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDescriptor {
    pub name: String,
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl From<QueryKind> for KindDescriptor {
    fn from(kind: QueryKind) -> Self {
        Self {
            name: kind.as_str().to_string(),
            required: kind.required_params().iter().map(|p| p.to_string()).collect(),
            optional: kind.optional_params().iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Every query kind the reasoner answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindsResponse {
    pub kinds: Vec<KindDescriptor>,
}

impl Default for KindsResponse {
    fn default() -> Self {
        Self {
            kinds: QueryKind::ALL.into_iter().map(KindDescriptor::from).collect(),
        }
    }
}

// =============================================================================
// QUERY REQUEST/RESPONSE
// =============================================================================

/// Structured query request.
///
/// ```json
/// {"query_type": "CAN_TAKE_COURSE",
///  "parameters": {"course_code": "CS301", "completed_courses": ["CS101"]}}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query_type: String,
    #[serde(default)]
    pub parameters: QueryParams,
}

/// Reasoning result plus its rendered explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(flatten)]
    pub result: ReasoningResult,
    pub explanation: String,
}

impl From<ReasoningResult> for QueryResponse {
    fn from(result: ReasoningResult) -> Self {
        let explanation = result.explanation();
        Self {
            result,
            explanation,
        }
    }
}
