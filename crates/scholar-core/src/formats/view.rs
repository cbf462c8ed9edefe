//! # Graph View
//!
//! Element listing for graph visualization front ends.
//!
//! Every element is wrapped in a `data` object, the shape Cytoscape-style
//! renderers consume. Nodes and edges keep graph insertion order.

use crate::graph::GraphStore;
use crate::{Direction, Edge, Node, NodeId, Relation};
use serde::{Deserialize, Serialize};

/// `{"data": ...}` wrapper around a view element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewElement<T> {
    pub data: T,
}

/// A node as rendered by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewNode {
    /// Display label: `"CS101: Intro"` for courses, the name otherwise.
    pub label: String,
    /// Owning department for faculty and courses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<NodeId>,
    #[serde(flatten)]
    pub node: Node,
}

/// An edge as rendered by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEdge {
    /// `<from>_<relation>_<to>`
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub relation: Relation,
}

impl From<&Edge> for ViewEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            id: format!("{}_{}_{}", edge.from, edge.relation, edge.to),
            source: edge.from.clone(),
            target: edge.to.clone(),
            relation: edge.relation,
        }
    }
}

/// Full graph listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<ViewElement<ViewNode>>,
    pub edges: Vec<ViewElement<ViewEdge>>,
}

/// Build the view listing of a graph.
#[must_use]
pub fn export_view<G: GraphStore>(graph: &G) -> GraphView {
    let nodes = graph
        .nodes()
        .iter()
        .map(|node| {
            let label = match node {
                Node::Course(c) => format!("{}: {}", c.code, c.name),
                other => other.name().to_string(),
            };
            let department_id = graph
                .edges_of(node.id(), Relation::BelongsTo, Direction::Outgoing)
                .first()
                .map(|d| d.id().clone());
            ViewElement {
                data: ViewNode {
                    label,
                    department_id,
                    node: node.clone(),
                },
            }
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| ViewElement {
            data: ViewEdge::from(edge),
        })
        .collect();

    GraphView { nodes, edges }
}
