//! # Scenario Tests
//!
//! End-to-end queries against the reference university dataset.

#![allow(clippy::panic)]

use scholar_core::query::param;
use scholar_core::reasoning::Eligibility;
use scholar_core::{Answer, Graph, GraphStore, Loader, Query, QueryKind, QueryParams, Reasoner};

const DATASET: &str = include_str!("../../../data/university.json");

fn load() -> Graph {
    Loader::from_json_slice(DATASET.as_bytes()).expect("dataset loads")
}

fn codes(answer: &Answer) -> Vec<String> {
    match answer {
        Answer::Nodes(nodes) => nodes.iter().map(|n| n.label().to_string()).collect(),
        _ => Vec::new(),
    }
}

// =============================================================================
// DATASET SHAPE
// =============================================================================

#[test]
fn dataset_statistics() {
    let stats = load().statistics();
    assert_eq!(stats.departments, 4);
    assert_eq!(stats.faculty, 8);
    assert_eq!(stats.courses, 18);
    assert_eq!(stats.prerequisites, 23);
    assert_eq!(stats.total_nodes, 30);
    // 26 belongs_to + 4 heads + 19 teaches + 23 prerequisite
    assert_eq!(stats.total_edges, 72);
}

#[test]
fn dataset_is_acyclic() {
    let graph = load();
    for course in graph.nodes_of_kind(scholar_core::NodeKind::Course) {
        assert!(
            !graph.all_prerequisites(course.id()).cycle_detected,
            "cycle reachable from {}",
            course.label()
        );
    }
}

// =============================================================================
// PREREQUISITE SCENARIO
// =============================================================================

#[test]
fn all_prerequisites_of_cs401() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::course(QueryKind::GetAllPrerequisites, "CS401"));

    assert!(result.success);
    assert_eq!(
        codes(&result.answer),
        vec![
            "CS101", "CS201", "CS301", "MATH101", "MATH102", "MATH201", "MATH301", "MATH401"
        ]
    );
}

#[test]
fn direct_prerequisites_of_cs401() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::course(QueryKind::GetPrerequisites, "cs401"));

    assert!(result.success);
    assert_eq!(codes(&result.answer), vec!["CS301", "MATH201", "MATH401"]);
}

#[test]
fn explanation_of_closure() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::course(QueryKind::GetAllPrerequisites, "CS401"));

    assert_eq!(
        result.explanation(),
        "Reasoning Trace:\n\
         \x20 1. [RESOLVE_COURSE] Resolved course code CS401 to Machine Learning\n\
         \x20 2. [QUERY_DIRECT_PREREQUISITES] Found 3 direct prerequisite(s)\n\
         \x20 3. [COMPUTE_TRANSITIVE_CLOSURE] Computed transitive closure: 8 total prerequisite(s)"
    );
}

#[test]
fn courses_requiring_cs101() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::course(QueryKind::GetCoursesRequiring, "CS101"));
    assert_eq!(codes(&result.answer), vec!["CS201"]);
}

// =============================================================================
// ELIGIBILITY
// =============================================================================

#[test]
fn can_take_cs301_after_cs101_only() {
    let graph = load();
    let result = Reasoner::new(&graph).execute(&Query::can_take("CS301", &["CS101"]));

    assert_eq!(
        result.answer,
        Answer::Eligibility(Eligibility {
            can_take: false,
            missing: vec![
                "CS201".to_string(),
                "MATH101".to_string(),
                "MATH301".to_string()
            ],
        })
    );
}

#[test]
fn can_take_cs301_with_full_history() {
    let graph = load();
    let result = Reasoner::new(&graph).execute(&Query::can_take(
        "CS301",
        &["cs101", "Data Structures", "MATH101", "math301"],
    ));

    assert_eq!(
        result.answer,
        Answer::Eligibility(Eligibility {
            can_take: true,
            missing: vec![],
        })
    );
}

// =============================================================================
// PEOPLE & DEPARTMENTS
// =============================================================================

#[test]
fn head_of_cs_is_smith() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::department(QueryKind::GetDepartmentHead, "CS"));
    match &result.answer {
        Answer::Node(Some(head)) => assert_eq!(head.name(), "Dr. John Smith"),
        other => panic!("unexpected answer {:?}", other),
    }
}

#[test]
fn courses_taught_by_dr_smith() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::faculty(QueryKind::GetCoursesTaughtBy, "Dr. Smith"));
    assert!(result.success);
    assert_eq!(codes(&result.answer), vec!["CS101", "CS301", "CS401"]);
}

#[test]
fn instructors_of_cs401() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::course(QueryKind::GetCourseInstructors, "CS401"));
    assert_eq!(codes(&result.answer), vec!["Dr. John Smith", "Dr. David Lee"]);
}

#[test]
fn research_area_search() {
    let graph = load();
    let result = Reasoner::new(&graph).execute(
        &Query::new(QueryKind::GetFacultyByResearch).with(param::AREA, "artificial intelligence"),
    );
    assert_eq!(codes(&result.answer), vec!["Dr. John Smith", "Dr. David Lee"]);
}

#[test]
fn keyword_search_finds_algorithms() {
    let graph = load();
    let result = Reasoner::new(&graph)
        .execute(&Query::new(QueryKind::SearchCourses).with(param::QUERY, "algorithm"));
    assert!(codes(&result.answer).contains(&"CS301".to_string()));
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn unknown_course_never_matches_another() {
    let graph = load();
    let result =
        Reasoner::new(&graph).execute(&Query::course(QueryKind::GetAllPrerequisites, "XYZ999"));

    assert!(!result.success);
    assert_eq!(result.answer, Answer::None);
    assert!(result.steps.is_empty());
    assert!(
        result
            .error_message
            .as_deref()
            .is_some_and(|m| !m.is_empty())
    );
}

#[test]
fn unknown_query_kind() {
    let graph = load();
    let result = Reasoner::new(&graph).execute_named("GET_WEATHER", &QueryParams::new());
    assert!(!result.success);
    assert_eq!(result.query_kind, None);
}

#[test]
fn named_kinds_accept_lowercase() {
    let graph = load();
    let mut params = QueryParams::new();
    params.insert(param::KIND.to_string(), "courses".into());
    let result = Reasoner::new(&graph).execute_named("count_entities", &params);
    match result.answer {
        Answer::Count(count) => assert_eq!(count.count, 18),
        other => panic!("unexpected answer {:?}", other),
    }
}
