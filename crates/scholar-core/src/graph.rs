//! # Graph Engine
//!
//! The read-only graph store for Scholar CORE.
//!
//! This module implements the `GraphStore` trait over an in-memory `Graph`.
//! Nodes and edges keep their insertion order; every index uses `BTreeMap`
//! so lookups and iteration are deterministic.

use crate::primitives::{HONORIFIC_PREFIXES, MAX_PREREQUISITE_CHAINS};
use crate::{Direction, Edge, Node, NodeId, NodeKind, Relation, ScholarError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// LOOKUP TYPES
// =============================================================================

/// How a faculty name parameter is compared against stored names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Normalized query equals the normalized stored name.
    Exact,
    /// Every normalized query word is a whole word of the stored name.
    Partial,
}

/// Outcome of a faculty name lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum NameLookup<'a> {
    Found(&'a Node),
    NotFound,
    /// More than one faculty member matched; carries the candidates.
    Ambiguous(Vec<&'a Node>),
}

/// Transitive prerequisite closure of a course.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure<'a> {
    /// Every reachable prerequisite, sorted by node id, excluding the start.
    pub nodes: Vec<&'a Node>,
    /// True if the walk met a node that was still on the current path.
    pub cycle_detected: bool,
}

/// Node and edge counts of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub departments: usize,
    pub faculty: usize,
    pub courses: usize,
    pub prerequisites: usize,
}

/// Strip honorifics and normalize case and whitespace of a faculty name.
///
/// `"Dr.  Jane SMITH"` and `"Dr.Jane Smith"` both become `"jane smith"`.
/// Undotted honorifics only match whole words, so `"Drake"` is kept.
#[must_use]
pub fn normalize_faculty_name(name: &str) -> String {
    let mut words: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    let skip = words
        .iter()
        .take_while(|w| HONORIFIC_PREFIXES.contains(&w.as_str()))
        .count();
    let mut words = words.split_off(skip);
    if let Some(first) = words.first_mut() {
        *first = strip_dotted_honorifics(first).to_string();
    }
    words.join(" ")
}

/// Strip dotted honorifics glued to the start of a word (`"dr.jane"`).
fn strip_dotted_honorifics(word: &str) -> &str {
    let mut rest = word;
    while let Some(stripped) = HONORIFIC_PREFIXES
        .iter()
        .filter(|p| p.ends_with('.'))
        .find_map(|p| rest.strip_prefix(*p))
        .filter(|s| !s.is_empty())
    {
        rest = stripped;
    }
    rest
}

// =============================================================================
// GRAPHSTORE TRAIT
// =============================================================================

/// The GraphStore trait defines the read-only query surface.
///
/// Every operation is total: absence is reported as `None`, an empty
/// collection or `NameLookup::NotFound`, never as a failure.
pub trait GraphStore {
    /// Lookup a node by id.
    fn node(&self, id: &NodeId) -> Option<&Node>;

    /// All nodes in insertion order.
    fn nodes(&self) -> &[Node];

    /// All edges in insertion order.
    fn edges(&self) -> &[Edge];

    /// Find a node by its natural key: course code, department code
    /// (both case-insensitive) or exact normalized faculty name.
    fn find_node_by_natural_key(&self, kind: NodeKind, key: &str) -> Option<&Node>;

    /// Find a faculty member by name with the given matching mode.
    fn find_faculty_by_name(&self, name: &str, mode: NameMatch) -> NameLookup<'_>;

    /// Neighbors of `id` along `relation`, in edge insertion order.
    ///
    /// `Outgoing` yields edge targets, `Incoming` yields edge sources.
    fn edges_of(&self, id: &NodeId, relation: Relation, direction: Direction) -> Vec<&Node>;

    /// Case-insensitive course code lookup.
    fn find_course_by_code(&self, code: &str) -> Option<&Node> {
        self.find_node_by_natural_key(NodeKind::Course, code)
    }

    /// Case-insensitive department code lookup.
    fn find_department_by_code(&self, code: &str) -> Option<&Node> {
        self.find_node_by_natural_key(NodeKind::Department, code)
    }

    /// Nodes of one kind in insertion order.
    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.nodes().iter().filter(|n| n.kind() == kind).collect()
    }

    /// Courses that `course` directly requires.
    fn direct_prerequisites(&self, course: &NodeId) -> Vec<&Node> {
        self.edges_of(course, Relation::Prerequisite, Direction::Incoming)
    }

    /// Courses that directly require `course`.
    fn dependent_courses(&self, course: &NodeId) -> Vec<&Node> {
        self.edges_of(course, Relation::Prerequisite, Direction::Outgoing)
    }

    /// Transitive closure of `direct_prerequisites`.
    ///
    /// Iterative depth-first walk with an explicit stack. A node is marked
    /// before it is expanded, so a cycle terminates the walk instead of
    /// looping. The start course is never part of the result.
    fn all_prerequisites(&self, course: &NodeId) -> Closure<'_> {
        #[derive(PartialEq)]
        enum Mark {
            OnPath,
            Done,
        }

        let mut marks: BTreeMap<NodeId, Mark> = BTreeMap::new();
        let mut found: BTreeMap<NodeId, &Node> = BTreeMap::new();
        let mut cycle_detected = false;

        marks.insert(course.clone(), Mark::OnPath);
        let mut stack = vec![(course.clone(), self.direct_prerequisites(course), 0usize)];

        while let Some((current, children, next)) = stack.last_mut() {
            let Some(child) = children.get(*next).copied() else {
                marks.insert(current.clone(), Mark::Done);
                stack.pop();
                continue;
            };
            *next += 1;

            match marks.get(child.id()) {
                Some(Mark::OnPath) => cycle_detected = true,
                Some(Mark::Done) => {}
                None => {
                    marks.insert(child.id().clone(), Mark::OnPath);
                    found.insert(child.id().clone(), child);
                    stack.push((child.id().clone(), self.direct_prerequisites(child.id()), 0));
                }
            }
        }

        Closure {
            nodes: found.into_values().collect(),
            cycle_detected,
        }
    }

    /// Every simple prerequisite path ending at `course`.
    ///
    /// Each chain lists the most foundational course first and the direct
    /// prerequisite last. At most `MAX_PREREQUISITE_CHAINS` are returned.
    fn prerequisite_chains(&self, course: &NodeId) -> Vec<Vec<&Node>> {
        let mut chains = Vec::new();
        let mut stack: Vec<Vec<&Node>> = self
            .direct_prerequisites(course)
            .into_iter()
            .rev()
            .map(|n| vec![n])
            .collect();

        while let Some(path) = stack.pop() {
            if chains.len() >= MAX_PREREQUISITE_CHAINS {
                break;
            }
            let Some(deepest) = path.last() else {
                continue;
            };
            let next: Vec<&Node> = self
                .direct_prerequisites(deepest.id())
                .into_iter()
                .filter(|n| n.id() != course && !path.iter().any(|p| p.id() == n.id()))
                .collect();

            if next.is_empty() {
                let mut chain = path;
                chain.reverse();
                chains.push(chain);
            } else {
                for n in next.into_iter().rev() {
                    let mut extended = path.clone();
                    extended.push(n);
                    stack.push(extended);
                }
            }
        }

        chains
    }

    /// Linear scan returning every node accepted by `predicate`,
    /// in insertion order.
    fn search<F>(&self, predicate: F) -> Vec<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        self.nodes().iter().filter(|n| predicate(n)).collect()
    }

    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Counts by node kind plus the number of prerequisite edges.
    fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            ..GraphStatistics::default()
        };
        for node in self.nodes() {
            match node.kind() {
                NodeKind::Department => stats.departments += 1,
                NodeKind::Faculty => stats.faculty += 1,
                NodeKind::Course => stats.courses += 1,
            }
        }
        stats.prerequisites = self
            .edges()
            .iter()
            .filter(|e| e.relation == Relation::Prerequisite)
            .count();
        stats
    }
}

// =============================================================================
// GRAPH IMPLEMENTATION
// =============================================================================

/// The in-memory university graph.
///
/// Built once by the loader, then shared read-only (`&Graph` or
/// `Arc<Graph>`) for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node storage in insertion order.
    nodes: Vec<Node>,

    /// NodeId -> position in `nodes`
    index: BTreeMap<NodeId, usize>,

    /// Edge storage in insertion order.
    edges: Vec<Edge>,

    /// Exact-duplicate guard for edges.
    edge_set: BTreeSet<Edge>,

    /// Adjacency: node -> positions in `edges` where it is the source
    outgoing: BTreeMap<NodeId, Vec<usize>>,

    /// Adjacency: node -> positions in `edges` where it is the target
    incoming: BTreeMap<NodeId, Vec<usize>>,

    /// Uppercased course code -> position in `nodes`
    course_codes: BTreeMap<String, usize>,

    /// Uppercased department code -> position in `nodes`
    department_codes: BTreeMap<String, usize>,
}

/// Node kinds allowed at each end of a relation.
fn allowed_endpoints(relation: Relation) -> (&'static [NodeKind], NodeKind) {
    match relation {
        Relation::BelongsTo => (&[NodeKind::Faculty, NodeKind::Course], NodeKind::Department),
        Relation::Teaches => (&[NodeKind::Faculty], NodeKind::Course),
        Relation::Prerequisite => (&[NodeKind::Course], NodeKind::Course),
        Relation::Heads => (&[NodeKind::Faculty], NodeKind::Department),
    }
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node.
    ///
    /// Fails on a duplicate id (across all kinds) or a duplicate
    /// course/department code.
    pub fn insert_node(&mut self, node: Node) -> Result<(), ScholarError> {
        if self.index.contains_key(node.id()) {
            return Err(ScholarError::DuplicateNode(node.id().clone()));
        }

        let position = self.nodes.len();
        let code_index = match &node {
            Node::Course(c) => Some((&mut self.course_codes, c.code.to_ascii_uppercase())),
            Node::Department(d) => Some((&mut self.department_codes, d.code.to_ascii_uppercase())),
            Node::Faculty(_) => None,
        };
        if let Some((codes, code)) = code_index {
            if codes.contains_key(&code) {
                return Err(ScholarError::InvalidData(format!(
                    "Duplicate {} code: {}",
                    node.kind(),
                    code
                )));
            }
            codes.insert(code, position);
        }

        self.index.insert(node.id().clone(), position);
        self.nodes.push(node);
        Ok(())
    }

    /// Insert a typed edge between two existing nodes.
    ///
    /// Fails if either endpoint is missing or has the wrong kind for the
    /// relation. Inserting the same edge twice is a no-op.
    pub fn insert_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        relation: Relation,
    ) -> Result<(), ScholarError> {
        let (Some(source), Some(target)) = (self.node(from), self.node(to)) else {
            return Err(ScholarError::DanglingEdge {
                relation,
                from: from.clone(),
                to: to.clone(),
            });
        };

        let (sources, target_kind) = allowed_endpoints(relation);
        if !sources.contains(&source.kind()) || target.kind() != target_kind {
            return Err(ScholarError::InvalidData(format!(
                "{} edge cannot connect {} {} -> {} {}",
                relation,
                source.kind(),
                from,
                target.kind(),
                to
            )));
        }

        let edge = Edge::new(from.clone(), to.clone(), relation);
        if !self.edge_set.insert(edge.clone()) {
            return Ok(());
        }

        let position = self.edges.len();
        self.outgoing.entry(from.clone()).or_default().push(position);
        self.incoming.entry(to.clone()).or_default().push(position);
        self.edges.push(edge);
        Ok(())
    }

    /// Check if the graph contains a node.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    fn faculty_matching(&self, query: &str, mode: NameMatch) -> Vec<&Node> {
        let query_words: Vec<&str> = query.split(' ').collect();
        self.nodes
            .iter()
            .filter(|n| {
                let Some(faculty) = n.as_faculty() else {
                    return false;
                };
                let normalized = normalize_faculty_name(&faculty.name);
                match mode {
                    NameMatch::Exact => normalized == query,
                    NameMatch::Partial => {
                        let name_words: Vec<&str> = normalized.split(' ').collect();
                        query_words.iter().all(|w| name_words.contains(w))
                    }
                }
            })
            .collect()
    }
}

impl GraphStore for Graph {
    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).and_then(|&i| self.nodes.get(i))
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn find_node_by_natural_key(&self, kind: NodeKind, key: &str) -> Option<&Node> {
        let code = key.trim().to_ascii_uppercase();
        match kind {
            NodeKind::Course => self.course_codes.get(&code).and_then(|&i| self.nodes.get(i)),
            NodeKind::Department => self
                .department_codes
                .get(&code)
                .and_then(|&i| self.nodes.get(i)),
            NodeKind::Faculty => match self.find_faculty_by_name(key, NameMatch::Exact) {
                NameLookup::Found(node) => Some(node),
                NameLookup::NotFound | NameLookup::Ambiguous(_) => None,
            },
        }
    }

    fn find_faculty_by_name(&self, name: &str, mode: NameMatch) -> NameLookup<'_> {
        let query = normalize_faculty_name(name);
        if query.is_empty() {
            return NameLookup::NotFound;
        }

        let mut matches = self.faculty_matching(&query, mode);
        match matches.len() {
            0 => NameLookup::NotFound,
            1 => NameLookup::Found(matches.remove(0)),
            _ => NameLookup::Ambiguous(matches),
        }
    }

    fn edges_of(&self, id: &NodeId, relation: Relation, direction: Direction) -> Vec<&Node> {
        let adjacency = match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };
        adjacency
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.edges.get(i))
            .filter(|e| e.relation == relation)
            .filter_map(|e| match direction {
                Direction::Outgoing => self.node(&e.to),
                Direction::Incoming => self.node(&e.from),
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
