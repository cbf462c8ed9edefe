//! # Formats
//!
//! Wire formats for Scholar graphs.
//!
//! - `dataset`: the load-time JSON document (`UniversityData`)
//! - `view`: the node/edge listing served to visualization front ends
//!
//! File I/O operations are in the app layer.

pub mod dataset;
pub mod view;

pub use dataset::{
    CourseRecord, DepartmentRecord, FacultyRecord, PrerequisiteRecord, UniversityData,
};
pub use view::{GraphView, ViewEdge, ViewElement, ViewNode, export_view};
