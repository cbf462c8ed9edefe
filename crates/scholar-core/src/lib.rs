//! # scholar-core
//!
//! The deterministic university graph engine for Scholar.
//!
//! This crate holds departments, faculty and courses as typed nodes joined
//! by typed edges, and answers a closed set of structured queries over them.
//! Every answer comes with an ordered trace of the inference steps taken.
//!
//! ## Architectural Constraints
//!
//! - The graph is built once by the `Loader` and is read-only afterwards
//! - Queries are pure, synchronous and share no mutable state
//! - Failures are data (`ReasoningResult::success`), never panics
//! - No async, no network, no logging dependency

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod graph;
pub mod loader;
pub mod primitives;
pub mod query;
pub mod reasoner;
pub mod reasoning;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Course, Department, Direction, Edge, Faculty, Level, Node, NodeId, NodeKind, Relation,
    ScholarError,
};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use graph::{Closure, Graph, GraphStatistics, GraphStore, NameLookup, NameMatch};
pub use loader::Loader;
pub use query::{ParamValue, Query, QueryKind, QueryParams};
pub use reasoner::Reasoner;
pub use reasoning::{Answer, ReasoningResult, ReasoningStep, Snapshot};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{GraphView, UniversityData, export_view};
