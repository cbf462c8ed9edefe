//! # Loader Module
//!
//! Dataset validation and graph construction for Scholar CORE.
//!
//! - Validate records before graph mutation
//! - Reject duplicates and dangling references
//! - Derive typed edges from record reference fields
//! - No inference: the graph holds exactly what the document states

use crate::formats::{CourseRecord, DepartmentRecord, FacultyRecord, UniversityData};
use crate::primitives::MAX_DATASET_BYTES;
use crate::{Course, Department, Faculty, Graph, Level, Node, NodeId, Relation, ScholarError};

/// The Loader turns a `UniversityData` document into a `Graph`.
pub struct Loader;

/// Reject an empty or whitespace-only attribute.
fn require(id: &str, attribute: &'static str, value: &str) -> Result<(), ScholarError> {
    if value.trim().is_empty() {
        return Err(ScholarError::MissingAttribute {
            id: id.to_string(),
            attribute,
        });
    }
    Ok(())
}

impl Loader {
    /// Parse a JSON document and build the graph.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Graph, ScholarError> {
        if bytes.len() > MAX_DATASET_BYTES {
            return Err(ScholarError::InvalidData(format!(
                "Dataset too large: {} bytes (max {})",
                bytes.len(),
                MAX_DATASET_BYTES
            )));
        }
        let data: UniversityData = serde_json::from_slice(bytes)
            .map_err(|e| ScholarError::SerializationError(e.to_string()))?;
        Self::load(&data)
    }

    /// Build a graph from a parsed document.
    ///
    /// Insertion order: departments, faculty with their membership edges,
    /// department heads, courses with membership and teaching edges, then
    /// prerequisites. Query results that list neighbors follow this order.
    ///
    /// A prerequisite cycle is accepted; queries stay cycle-safe.
    pub fn load(data: &UniversityData) -> Result<Graph, ScholarError> {
        let mut graph = Graph::new();

        for record in &data.departments {
            graph.insert_node(Self::department(record)?)?;
        }

        for record in &data.faculty {
            graph.insert_node(Self::faculty(record)?)?;
            graph.insert_edge(
                &NodeId::new(&record.id),
                &NodeId::new(&record.department),
                Relation::BelongsTo,
            )?;
        }

        for record in &data.departments {
            if let Some(head) = &record.faculty_head {
                graph.insert_edge(
                    &NodeId::new(head),
                    &NodeId::new(&record.id),
                    Relation::Heads,
                )?;
            }
        }

        for record in &data.courses {
            graph.insert_node(Self::course(record)?)?;
            let course_id = NodeId::new(&record.id);
            graph.insert_edge(
                &course_id,
                &NodeId::new(&record.department),
                Relation::BelongsTo,
            )?;
            for instructor in &record.taught_by {
                graph.insert_edge(&NodeId::new(instructor), &course_id, Relation::Teaches)?;
            }
        }

        // {course, requires} becomes prerequisite(requires -> course)
        for record in &data.prerequisites {
            graph.insert_edge(
                &NodeId::new(&record.requires),
                &NodeId::new(&record.course),
                Relation::Prerequisite,
            )?;
        }

        Ok(graph)
    }

    fn department(record: &DepartmentRecord) -> Result<Node, ScholarError> {
        require(&record.id, "id", &record.id)?;
        require(&record.id, "code", &record.code)?;
        require(&record.id, "name", &record.name)?;

        Ok(Node::Department(Department {
            id: NodeId::new(&record.id),
            code: record.code.trim().to_string(),
            name: record.name.clone(),
        }))
    }

    fn faculty(record: &FacultyRecord) -> Result<Node, ScholarError> {
        require(&record.id, "id", &record.id)?;
        require(&record.id, "name", &record.name)?;
        require(&record.id, "department", &record.department)?;

        Ok(Node::Faculty(Faculty {
            id: NodeId::new(&record.id),
            name: record.name.clone(),
            title: record.title.clone(),
            email: record.email.clone().filter(|e| !e.trim().is_empty()),
            research_areas: record.research_areas.clone(),
        }))
    }

    fn course(record: &CourseRecord) -> Result<Node, ScholarError> {
        require(&record.id, "id", &record.id)?;
        require(&record.id, "code", &record.code)?;
        require(&record.id, "name", &record.name)?;
        require(&record.id, "department", &record.department)?;

        if record.credits == 0 {
            return Err(ScholarError::InvalidData(format!(
                "Course {} must have positive credits",
                record.id
            )));
        }
        let level: Level = record.level.parse()?;

        Ok(Node::Course(Course {
            id: NodeId::new(&record.id),
            code: record.code.trim().to_string(),
            name: record.name.clone(),
            credits: record.credits,
            level,
            description: record.description.clone(),
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================
