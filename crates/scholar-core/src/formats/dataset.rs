//! # Dataset Format
//!
//! Serde model of the university JSON document.
//!
//! Relationships are carried as reference fields on the records
//! (`department`, `taught_by`, `faculty_head`) plus a separate
//! `prerequisites` list. The `Loader` turns them into typed edges.

use serde::{Deserialize, Serialize};

/// The complete load-time document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityData {
    #[serde(default)]
    pub departments: Vec<DepartmentRecord>,
    #[serde(default)]
    pub faculty: Vec<FacultyRecord>,
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub id: String,
    pub code: String,
    pub name: String,
    /// Faculty id of the department head, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_head: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub research_areas: Vec<String>,
    /// Department id the faculty member belongs to.
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: String,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub level: String,
    #[serde(default)]
    pub description: String,
    /// Department id offering the course.
    pub department: String,
    /// Faculty ids teaching the course.
    #[serde(default)]
    pub taught_by: Vec<String>,
}

/// `course` requires `requires`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteRecord {
    pub course: String,
    pub requires: String,
}
