//! # Reasoning Trace
//!
//! Result and trace types produced by the `Reasoner`.
//!
//! A `ReasoningResult` is built fresh for every query and owned by the
//! caller. It carries everything needed to render both the answer and the
//! ordered step trace without touching the graph again.

use crate::query::QueryKind;
use crate::{Course, Department, Faculty, Node};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// SNAPSHOTS & STEPS
// =============================================================================

/// Typed snapshot of a step's inputs or outputs.
///
/// Serializes as plain JSON: `null`, a bool, a number, a string, an array of
/// strings or an object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    #[default]
    None,
    Flag(bool),
    Count(usize),
    Text(String),
    List(Vec<String>),
    Record(BTreeMap<String, Snapshot>),
}

impl Snapshot {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Snapshot::Text(value.into())
    }

    /// Build a list snapshot from anything string-like.
    #[must_use]
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Snapshot::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a record snapshot from `(key, value)` pairs.
    #[must_use]
    pub fn record<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Snapshot)>,
    {
        Snapshot::Record(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// Labels of a node sequence (codes for courses, names for faculty).
    #[must_use]
    pub fn labels(nodes: &[&Node]) -> Self {
        Self::list(nodes.iter().map(|n| n.label()))
    }
}

/// One named inference step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub rule_name: String,
    pub description: String,
    pub inputs: Snapshot,
    pub outputs: Snapshot,
}

impl ReasoningStep {
    #[must_use]
    pub fn new(
        rule_name: &str,
        description: impl Into<String>,
        inputs: Snapshot,
        outputs: Snapshot,
    ) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            description: description.into(),
            inputs,
            outputs,
        }
    }
}

// =============================================================================
// ANSWERS
// =============================================================================

/// A course with its department, instructors and direct prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub course: Course,
    pub department: Option<Department>,
    pub instructors: Vec<Faculty>,
    pub prerequisites: Vec<Course>,
}

/// A faculty member with department, courses taught and headed department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyInfo {
    pub faculty: Faculty,
    pub department: Option<Department>,
    pub courses: Vec<Course>,
    pub heads: Option<Department>,
}

/// A department with its head, faculty and courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentInfo {
    pub department: Department,
    pub head: Option<Faculty>,
    pub faculty: Vec<Faculty>,
    pub courses: Vec<Course>,
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub can_take: bool,
    /// Codes of every transitive prerequisite not completed, sorted by node id.
    pub missing: Vec<String>,
}

/// Structured difference of two courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub course_a: Course,
    pub course_b: Course,
    /// `credits(a) - credits(b)`
    pub credits_diff: i64,
    pub same_level: bool,
    pub same_department: bool,
    /// Codes of the shared direct prerequisites, sorted.
    pub common_prerequisites: Vec<String>,
    pub common_prerequisite_count: usize,
}

/// Cardinality of one entity kind or relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub kind: String,
    pub count: usize,
}

/// The answer payload of a query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Failed queries carry no answer.
    #[default]
    None,
    Nodes(Vec<Node>),
    Node(Option<Node>),
    CourseInfo(Box<CourseInfo>),
    FacultyInfo(Box<FacultyInfo>),
    DepartmentInfo(Box<DepartmentInfo>),
    Eligibility(Eligibility),
    Comparison(Box<Comparison>),
    Count(EntityCount),
    Chains(Vec<Vec<Node>>),
}

impl Answer {
    /// Owned copy of a node sequence.
    #[must_use]
    pub fn nodes(nodes: &[&Node]) -> Self {
        Answer::Nodes(nodes.iter().map(|n| (*n).clone()).collect())
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// Result of one query: answer, success flag and ordered trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningResult {
    /// `None` only when the requested kind is not one the reasoner knows.
    pub query_kind: Option<QueryKind>,
    pub answer: Answer,
    pub success: bool,
    pub steps: Vec<ReasoningStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ReasoningResult {
    #[must_use]
    pub fn succeeded(kind: QueryKind, answer: Answer, steps: Vec<ReasoningStep>) -> Self {
        Self {
            query_kind: Some(kind),
            answer,
            success: true,
            steps,
            error_message: None,
        }
    }

    /// A failed result keeping whatever steps ran before the failure.
    #[must_use]
    pub fn failed(
        kind: Option<QueryKind>,
        steps: Vec<ReasoningStep>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            query_kind: kind,
            answer: Answer::None,
            success: false,
            steps,
            error_message: Some(message.into()),
        }
    }

    /// Human-readable rendering of the trace.
    ///
    /// ```text
    /// Reasoning Trace:
    ///   1. [RESOLVE_COURSE] Resolved course code CS401 to Machine Learning
    /// ```
    #[must_use]
    pub fn explanation(&self) -> String {
        if !self.success {
            return format!(
                "Query failed: {}",
                self.error_message.as_deref().unwrap_or("unknown error")
            );
        }

        let mut out = String::from("Reasoning Trace:");
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!(
                "\n  {}. [{}] {}",
                i + 1,
                step.rule_name,
                step.description
            ));
        }
        out
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn step(rule: &str, description: &str) -> ReasoningStep {
        ReasoningStep::new(rule, description, Snapshot::None, Snapshot::None)
    }

    #[test]
    fn explanation_numbers_steps() {
        let result = ReasoningResult::succeeded(
            QueryKind::GetPrerequisites,
            Answer::Nodes(vec![]),
            vec![
                step("RESOLVE_COURSE", "Resolved course code CS101 to Intro"),
                step("QUERY_PREREQUISITES", "Found 0 direct prerequisite(s)"),
            ],
        );
        assert_eq!(
            result.explanation(),
            "Reasoning Trace:\n  1. [RESOLVE_COURSE] Resolved course code CS101 to Intro\n  2. [QUERY_PREREQUISITES] Found 0 direct prerequisite(s)"
        );
    }

    #[test]
    fn explanation_of_failure() {
        let result = ReasoningResult::failed(None, vec![], "Unknown query kind: NOPE");
        assert_eq!(result.explanation(), "Query failed: Unknown query kind: NOPE");
        assert_eq!(result.answer, Answer::None);
    }

    #[test]
    fn snapshot_serializes_as_plain_json() {
        let snapshot = Snapshot::record([
            ("can_take", Snapshot::Flag(false)),
            ("missing", Snapshot::list(["CS101"])),
            ("count", Snapshot::Count(1)),
            ("note", Snapshot::None),
        ]);
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"can_take": false, "missing": ["CS101"], "count": 1, "note": null})
        );

        let back: Snapshot = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, snapshot);
    }

    #[test]
    fn answer_is_tagged_by_kind() {
        let answer = Answer::Eligibility(Eligibility {
            can_take: true,
            missing: vec![],
        });
        let json = serde_json::to_value(&answer).expect("serialize");
        assert_eq!(json["kind"], "eligibility");
        assert_eq!(json["value"]["can_take"], true);
    }
}
