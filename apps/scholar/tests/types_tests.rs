//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use scholar::api::{HealthResponse, KindDescriptor, KindsResponse, QueryRequest, QueryResponse};
use scholar_core::{
    Answer, ParamValue, QueryKind, ReasoningResult, ReasoningStep, Snapshot,
};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

// =============================================================================
// KINDS RESPONSE TESTS
// =============================================================================

#[test]
fn test_kind_descriptor_from_compare() {
    let descriptor = KindDescriptor::from(QueryKind::CompareCourses);
    assert_eq!(descriptor.name, "COMPARE_COURSES");
    assert_eq!(descriptor.required, vec!["course_code_a", "course_code_b"]);
    assert!(descriptor.optional.is_empty());
}

#[test]
fn test_kinds_response_covers_all_kinds_in_order() {
    let kinds = KindsResponse::default();
    let names: Vec<&str> = kinds.kinds.iter().map(|k| k.name.as_str()).collect();
    let expected: Vec<&str> = QueryKind::ALL.iter().map(QueryKind::as_str).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_kind_descriptor_optional_defaults_to_empty() {
    let json = r#"{"name":"COUNT_ENTITIES","required":["kind"]}"#;
    let descriptor: KindDescriptor = serde_json::from_str(json).unwrap();
    assert!(descriptor.optional.is_empty());
}

// =============================================================================
// QUERY REQUEST TESTS
// =============================================================================

#[test]
fn test_query_request_mixed_parameter_types() {
    let json = r#"{
        "query_type": "CAN_TAKE_COURSE",
        "parameters": {
            "course_code": "CS301",
            "credits": 3,
            "completed_courses": ["CS101", "CS201"]
        }
    }"#;
    let request: QueryRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.query_type, "CAN_TAKE_COURSE");
    assert_eq!(
        request.parameters["course_code"],
        ParamValue::Text("CS301".to_string())
    );
    assert_eq!(request.parameters["credits"], ParamValue::Number(3));
    assert_eq!(
        request.parameters["completed_courses"],
        ParamValue::Set(vec!["CS101".to_string(), "CS201".to_string()])
    );
}

#[test]
fn test_query_request_parameters_default_to_empty() {
    let request: QueryRequest = serde_json::from_str(r#"{"query_type":"GET_COURSE_INFO"}"#).unwrap();
    assert!(request.parameters.is_empty());
}

#[test]
fn test_query_request_requires_query_type() {
    let result: Result<QueryRequest, _> = serde_json::from_str(r#"{"parameters":{}}"#);
    assert!(result.is_err());
}

// =============================================================================
// QUERY RESPONSE TESTS
// =============================================================================

fn sample_success() -> ReasoningResult {
    ReasoningResult::succeeded(
        QueryKind::GetCoursesByLevel,
        Answer::Nodes(vec![]),
        vec![ReasoningStep::new(
            "FILTER_BY_LEVEL",
            "Filtering courses by level: graduate",
            Snapshot::record([("level", Snapshot::text("graduate"))]),
            Snapshot::list(Vec::<String>::new()),
        )],
    )
}

#[test]
fn test_query_response_carries_explanation() {
    let response = QueryResponse::from(sample_success());
    assert_eq!(
        response.explanation,
        "Reasoning Trace:\n  1. [FILTER_BY_LEVEL] Filtering courses by level: graduate"
    );
}

#[test]
fn test_query_response_serialization_is_flat() {
    let json = serde_json::to_value(QueryResponse::from(sample_success())).unwrap();

    assert_eq!(json["query_kind"], "GET_COURSES_BY_LEVEL");
    assert_eq!(json["success"], true);
    assert_eq!(json["answer"]["kind"], "nodes");
    assert_eq!(json["steps"][0]["inputs"]["level"], "graduate");
    assert!(json.get("error_message").is_none());
    assert!(json.get("result").is_none());
}

#[test]
fn test_failed_query_response_roundtrip() {
    let response = QueryResponse::from(ReasoningResult::failed(
        Some(QueryKind::GetDepartmentHead),
        vec![],
        "No department matches department_code = 'XX'",
    ));

    let text = serde_json::to_string(&response).unwrap();
    let back: QueryResponse = serde_json::from_str(&text).unwrap();

    assert!(!back.result.success);
    assert_eq!(back.result, response.result);
    assert_eq!(
        back.explanation,
        "Query failed: No department matches department_code = 'XX'"
    );
}
