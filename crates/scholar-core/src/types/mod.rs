//! # Core Type Definitions
//!
//! This module contains all core types for the Scholar university graph:
//! - Node identifiers and tags (`NodeId`, `NodeKind`, `Relation`, `Direction`)
//! - Entity records (`Department`, `Faculty`, `Course`) and the `Node` variant
//! - Typed directed edges (`Edge`)
//! - Error types (`ScholarError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier types implement `Ord` so that every `BTreeMap`/`BTreeSet`
//! keyed by them iterates in a reproducible order. No floating-point fields
//! exist anywhere in the model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS & TAGS
// =============================================================================

/// Unique identifier of a node, shared across all node kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The kind tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Department,
    Faculty,
    Course,
}

impl NodeKind {
    /// All node kinds in declaration order.
    pub const ALL: [NodeKind; 3] = [NodeKind::Department, NodeKind::Faculty, NodeKind::Course];

    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Department => "department",
            NodeKind::Faculty => "faculty",
            NodeKind::Course => "course",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ScholarError;

    /// Case-insensitive; plural forms are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "department" | "departments" => Ok(NodeKind::Department),
            "faculty" | "faculties" => Ok(NodeKind::Faculty),
            "course" | "courses" => Ok(NodeKind::Course),
            other => Err(ScholarError::InvalidData(format!(
                "Unknown node kind: {}",
                other
            ))),
        }
    }
}

/// Closed set of relation kinds carried by edges.
///
/// Edge direction per relation:
/// - `BelongsTo`: faculty/course -> department
/// - `Teaches`: faculty -> course
/// - `Prerequisite`: required course -> dependent course
/// - `Heads`: faculty -> department
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    BelongsTo,
    Teaches,
    Prerequisite,
    Heads,
}

impl Relation {
    /// All relations in declaration order.
    pub const ALL: [Relation; 4] = [
        Relation::BelongsTo,
        Relation::Teaches,
        Relation::Prerequisite,
        Relation::Heads,
    ];

    /// Wire name of the relation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::BelongsTo => "belongs_to",
            Relation::Teaches => "teaches",
            Relation::Prerequisite => "prerequisite",
            Relation::Heads => "heads",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = ScholarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "belongs_to" => Ok(Relation::BelongsTo),
            "teaches" => Ok(Relation::Teaches),
            "prerequisite" | "prerequisites" => Ok(Relation::Prerequisite),
            "heads" => Ok(Relation::Heads),
            other => Err(ScholarError::InvalidData(format!(
                "Unknown relation: {}",
                other
            ))),
        }
    }
}

/// Which end of an edge a neighbor walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow edges whose source is the given node.
    Outgoing,
    /// Follow edges whose target is the given node.
    Incoming,
}

/// Academic level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Undergraduate,
    Graduate,
}

impl Level {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Undergraduate => "undergraduate",
            Level::Graduate => "graduate",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ScholarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "undergraduate" => Ok(Level::Undergraduate),
            "graduate" => Ok(Level::Graduate),
            other => Err(ScholarError::InvalidData(format!("Unknown level: {}", other))),
        }
    }
}

// =============================================================================
// ENTITY RECORDS
// =============================================================================

/// An academic department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: NodeId,
    pub code: String,
    pub name: String,
}

/// A faculty member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: NodeId,
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub research_areas: Vec<String>,
}

/// A course offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: NodeId,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub level: Level,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// NODE
// =============================================================================

/// A node of the university graph.
///
/// Each variant carries only the fields valid for its kind.
/// Nodes are immutable once inserted into a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Department(Department),
    Faculty(Faculty),
    Course(Course),
}

impl Node {
    /// The node's unique identifier.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Department(d) => &d.id,
            Node::Faculty(f) => &f.id,
            Node::Course(c) => &c.id,
        }
    }

    /// The node's kind tag.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Department(_) => NodeKind::Department,
            Node::Faculty(_) => NodeKind::Faculty,
            Node::Course(_) => NodeKind::Course,
        }
    }

    /// Display name of the entity.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Node::Department(d) => &d.name,
            Node::Faculty(f) => &f.name,
            Node::Course(c) => &c.name,
        }
    }

    /// Short label used in traces: code for courses and departments,
    /// name for faculty.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Node::Department(d) => &d.code,
            Node::Faculty(f) => &f.name,
            Node::Course(c) => &c.code,
        }
    }

    #[must_use]
    pub fn as_course(&self) -> Option<&Course> {
        match self {
            Node::Course(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_faculty(&self) -> Option<&Faculty> {
        match self {
            Node::Faculty(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_department(&self) -> Option<&Department> {
        match self {
            Node::Department(d) => Some(d),
            _ => None,
        }
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// A typed directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub relation: Relation,
}

impl Edge {
    #[must_use]
    pub fn new(from: NodeId, to: NodeId, relation: Relation) -> Self {
        Self { from, to, relation }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building or loading a graph.
///
/// Per-query failures (unresolved parameters, unknown query kinds) are never
/// raised as `ScholarError`; they are reported inside a `ReasoningResult`.
#[derive(Debug, Error)]
pub enum ScholarError {
    /// Two nodes share the same identifier.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// An edge references a node that does not exist.
    #[error("Dangling {relation} edge: {from} -> {to}")]
    DanglingEdge {
        relation: Relation,
        from: NodeId,
        to: NodeId,
    },

    /// A required attribute is empty or absent.
    #[error("Node {id} is missing required attribute '{attribute}'")]
    MissingAttribute { id: String, attribute: &'static str },

    /// Structurally valid input with an invalid value.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
