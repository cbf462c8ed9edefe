//! # Query Module
//!
//! Structured query types for Core interaction.
//!
//! - A closed set of query kinds (`QueryKind`)
//! - Named parameters (`QueryParams`) with typed accessors
//! - No parsing of natural language: callers supply kind + parameters

use crate::primitives::{MAX_COMPLETED_COURSES, MAX_SEARCH_TERM_LENGTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parameter names understood by the reasoner.
pub mod param {
    pub const COURSE_CODE: &str = "course_code";
    pub const COURSE_CODE_A: &str = "course_code_a";
    pub const COURSE_CODE_B: &str = "course_code_b";
    pub const FACULTY_NAME: &str = "faculty_name";
    pub const DEPARTMENT_CODE: &str = "department_code";
    pub const COMPLETED_COURSES: &str = "completed_courses";
    pub const LEVEL: &str = "level";
    pub const AREA: &str = "area";
    pub const QUERY: &str = "query";
    pub const KIND: &str = "kind";
}

// =============================================================================
// QUERY KIND
// =============================================================================

/// Every query the reasoner answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryKind {
    GetCourseInfo,
    GetFacultyInfo,
    GetDepartmentInfo,
    GetPrerequisites,
    GetAllPrerequisites,
    GetCoursesByDepartment,
    GetFacultyByDepartment,
    GetCoursesTaughtBy,
    GetCourseInstructors,
    GetDepartmentHead,
    CanTakeCourse,
    GetCoursesRequiring,
    GetCoursesByLevel,
    GetFacultyByResearch,
    SearchCourses,
    CountEntities,
    CompareCourses,
    GetPrerequisiteChains,
}

impl QueryKind {
    /// All kinds in declaration order.
    pub const ALL: [QueryKind; 18] = [
        QueryKind::GetCourseInfo,
        QueryKind::GetFacultyInfo,
        QueryKind::GetDepartmentInfo,
        QueryKind::GetPrerequisites,
        QueryKind::GetAllPrerequisites,
        QueryKind::GetCoursesByDepartment,
        QueryKind::GetFacultyByDepartment,
        QueryKind::GetCoursesTaughtBy,
        QueryKind::GetCourseInstructors,
        QueryKind::GetDepartmentHead,
        QueryKind::CanTakeCourse,
        QueryKind::GetCoursesRequiring,
        QueryKind::GetCoursesByLevel,
        QueryKind::GetFacultyByResearch,
        QueryKind::SearchCourses,
        QueryKind::CountEntities,
        QueryKind::CompareCourses,
        QueryKind::GetPrerequisiteChains,
    ];

    /// Wire name, e.g. `GET_ALL_PREREQUISITES`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::GetCourseInfo => "GET_COURSE_INFO",
            QueryKind::GetFacultyInfo => "GET_FACULTY_INFO",
            QueryKind::GetDepartmentInfo => "GET_DEPARTMENT_INFO",
            QueryKind::GetPrerequisites => "GET_PREREQUISITES",
            QueryKind::GetAllPrerequisites => "GET_ALL_PREREQUISITES",
            QueryKind::GetCoursesByDepartment => "GET_COURSES_BY_DEPARTMENT",
            QueryKind::GetFacultyByDepartment => "GET_FACULTY_BY_DEPARTMENT",
            QueryKind::GetCoursesTaughtBy => "GET_COURSES_TAUGHT_BY",
            QueryKind::GetCourseInstructors => "GET_COURSE_INSTRUCTORS",
            QueryKind::GetDepartmentHead => "GET_DEPARTMENT_HEAD",
            QueryKind::CanTakeCourse => "CAN_TAKE_COURSE",
            QueryKind::GetCoursesRequiring => "GET_COURSES_REQUIRING",
            QueryKind::GetCoursesByLevel => "GET_COURSES_BY_LEVEL",
            QueryKind::GetFacultyByResearch => "GET_FACULTY_BY_RESEARCH",
            QueryKind::SearchCourses => "SEARCH_COURSES",
            QueryKind::CountEntities => "COUNT_ENTITIES",
            QueryKind::CompareCourses => "COMPARE_COURSES",
            QueryKind::GetPrerequisiteChains => "GET_PREREQUISITE_CHAINS",
        }
    }

    /// Parameters that must be present for this kind.
    #[must_use]
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            QueryKind::GetCourseInfo
            | QueryKind::GetPrerequisites
            | QueryKind::GetAllPrerequisites
            | QueryKind::GetCourseInstructors
            | QueryKind::GetCoursesRequiring
            | QueryKind::GetPrerequisiteChains
            | QueryKind::CanTakeCourse => &[param::COURSE_CODE],
            QueryKind::GetFacultyInfo | QueryKind::GetCoursesTaughtBy => &[param::FACULTY_NAME],
            QueryKind::GetDepartmentInfo
            | QueryKind::GetCoursesByDepartment
            | QueryKind::GetFacultyByDepartment
            | QueryKind::GetDepartmentHead => &[param::DEPARTMENT_CODE],
            QueryKind::GetCoursesByLevel => &[param::LEVEL],
            QueryKind::GetFacultyByResearch => &[param::AREA],
            QueryKind::SearchCourses => &[param::QUERY],
            QueryKind::CountEntities => &[param::KIND],
            QueryKind::CompareCourses => &[param::COURSE_CODE_A, param::COURSE_CODE_B],
        }
    }

    /// Parameters accepted but not required.
    #[must_use]
    pub fn optional_params(&self) -> &'static [&'static str] {
        match self {
            QueryKind::CanTakeCourse => &[param::COMPLETED_COURSES],
            _ => &[],
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a query kind name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown query kind: {0}")]
pub struct UnknownQueryKind(pub String);

impl FromStr for QueryKind {
    type Err = UnknownQueryKind;

    /// Accepts `GET_PREREQUISITES` or `get_prerequisites`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        QueryKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownQueryKind(s.trim().to_string()))
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// A parameter value: a string, an integer or a set of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
    Set(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Set(values)
    }
}

/// Named query parameters.
pub type QueryParams = BTreeMap<String, ParamValue>;

/// Why a parameter could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Missing required parameter: {0}")]
    Missing(&'static str),

    #[error("Parameter {name} must be {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("Parameter {name} exceeds {limit} {unit}")]
    TooLarge {
        name: &'static str,
        limit: usize,
        unit: &'static str,
    },
}

/// Read a non-empty text parameter. Numbers are accepted as their decimal form.
pub fn text_param(params: &QueryParams, name: &'static str) -> Result<String, ParamError> {
    let value = match params.get(name) {
        None => return Err(ParamError::Missing(name)),
        Some(ParamValue::Text(s)) => s.trim().to_string(),
        Some(ParamValue::Number(n)) => n.to_string(),
        Some(ParamValue::Set(_)) => {
            return Err(ParamError::WrongType {
                name,
                expected: "a string",
            });
        }
    };

    if value.is_empty() {
        return Err(ParamError::Missing(name));
    }
    if value.len() > MAX_SEARCH_TERM_LENGTH {
        return Err(ParamError::TooLarge {
            name,
            limit: MAX_SEARCH_TERM_LENGTH,
            unit: "bytes",
        });
    }
    Ok(value)
}

/// Read an optional set parameter.
///
/// A text value is split on commas, so `"CS101, CS201"` and
/// `["CS101", "CS201"]` are equivalent. Absent means empty.
pub fn set_param(params: &QueryParams, name: &'static str) -> Result<Vec<String>, ParamError> {
    let raw: Vec<String> = match params.get(name) {
        None => Vec::new(),
        Some(ParamValue::Set(items)) => items.clone(),
        Some(ParamValue::Text(s)) => s.split(',').map(str::to_string).collect(),
        Some(ParamValue::Number(_)) => {
            return Err(ParamError::WrongType {
                name,
                expected: "a list of strings",
            });
        }
    };

    let items: Vec<String> = raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if items.len() > MAX_COMPLETED_COURSES {
        return Err(ParamError::TooLarge {
            name,
            limit: MAX_COMPLETED_COURSES,
            unit: "entries",
        });
    }
    if items.iter().any(|s| s.len() > MAX_SEARCH_TERM_LENGTH) {
        return Err(ParamError::TooLarge {
            name,
            limit: MAX_SEARCH_TERM_LENGTH,
            unit: "bytes per entry",
        });
    }
    Ok(items)
}

// =============================================================================
// QUERY
// =============================================================================

/// A structured query: kind plus named parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub kind: QueryKind,
    #[serde(default)]
    pub params: QueryParams,
}

impl Query {
    /// Create a query with no parameters.
    #[must_use]
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            params: QueryParams::new(),
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Single-course query helper.
    #[must_use]
    pub fn course(kind: QueryKind, course_code: &str) -> Self {
        Self::new(kind).with(param::COURSE_CODE, course_code)
    }

    /// Eligibility helper.
    #[must_use]
    pub fn can_take(course_code: &str, completed: &[&str]) -> Self {
        let completed: Vec<String> = completed.iter().map(|c| (*c).to_string()).collect();
        Self::course(QueryKind::CanTakeCourse, course_code).with(param::COMPLETED_COURSES, completed)
    }

    /// Course comparison helper.
    #[must_use]
    pub fn compare(course_code_a: &str, course_code_b: &str) -> Self {
        Self::new(QueryKind::CompareCourses)
            .with(param::COURSE_CODE_A, course_code_a)
            .with(param::COURSE_CODE_B, course_code_b)
    }

    /// Single-department query helper.
    #[must_use]
    pub fn department(kind: QueryKind, department_code: &str) -> Self {
        Self::new(kind).with(param::DEPARTMENT_CODE, department_code)
    }

    /// Single-faculty query helper.
    #[must_use]
    pub fn faculty(kind: QueryKind, faculty_name: &str) -> Self {
        Self::new(kind).with(param::FACULTY_NAME, faculty_name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
