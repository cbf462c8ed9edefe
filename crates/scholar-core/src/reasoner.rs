//! # Reasoner
//!
//! Rule dispatch for Scholar CORE.
//!
//! Every `QueryKind` maps to exactly one rule through an exhaustive match.
//! A rule resolves its natural-key parameters, performs its graph reads and
//! records one `ReasoningStep` per logical operation. Any failure stops the
//! rule and is returned as a failed `ReasoningResult`, never as a panic or
//! an `Err` past this boundary.

use crate::graph::{GraphStore, NameLookup, NameMatch};
use crate::query::{ParamError, Query, QueryKind, QueryParams, param, set_param, text_param};
use crate::reasoning::{
    Answer, Comparison, CourseInfo, DepartmentInfo, Eligibility, EntityCount, FacultyInfo,
    ReasoningResult, ReasoningStep, Snapshot,
};
use crate::{Course, Department, Direction, Faculty, Level, Node, NodeId, NodeKind, Relation};
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a rule stopped early.
#[derive(Debug, Error)]
enum RuleError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("No {kind} matches {param} = '{value}'")]
    NotFound {
        kind: NodeKind,
        param: &'static str,
        value: String,
    },

    #[error("{kind} '{value}' is ambiguous, candidates: {candidates}")]
    Ambiguous {
        kind: NodeKind,
        value: String,
        candidates: String,
    },

    #[error("{0}")]
    Invalid(String),
}

type Trace = Vec<ReasoningStep>;

fn courses_of(nodes: &[&Node]) -> Vec<Course> {
    nodes.iter().filter_map(|n| n.as_course()).cloned().collect()
}

fn faculty_of(nodes: &[&Node]) -> Vec<Faculty> {
    nodes.iter().filter_map(|n| n.as_faculty()).cloned().collect()
}

fn labels_or_none(node: Option<&Node>) -> Snapshot {
    node.map_or(Snapshot::None, |n| Snapshot::text(n.label()))
}

fn ambiguous(kind: NodeKind, value: &str, candidates: &[&Node]) -> RuleError {
    RuleError::Ambiguous {
        kind,
        value: value.to_string(),
        candidates: candidates
            .iter()
            .map(|n| n.label())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// The Reasoner answers structured queries over a borrowed graph.
///
/// It holds no state besides the graph reference, so one instance may be
/// used for any number of queries, from any number of threads.
pub struct Reasoner<'g, G: GraphStore> {
    graph: &'g G,
}

impl<'g, G: GraphStore> Reasoner<'g, G> {
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Execute a typed query.
    pub fn execute(&self, query: &Query) -> ReasoningResult {
        self.run(query.kind, &query.params)
    }

    /// Execute a query given its wire name.
    ///
    /// A name outside the closed set yields a failed result with
    /// `query_kind: None`.
    pub fn execute_named(&self, kind: &str, params: &QueryParams) -> ReasoningResult {
        match kind.parse::<QueryKind>() {
            Ok(kind) => self.run(kind, params),
            Err(unknown) => ReasoningResult::failed(None, Vec::new(), unknown.to_string()),
        }
    }

    fn run(&self, kind: QueryKind, params: &QueryParams) -> ReasoningResult {
        let mut trace = Trace::new();
        match self.dispatch(kind, params, &mut trace) {
            Ok(answer) => ReasoningResult::succeeded(kind, answer, trace),
            Err(e) => ReasoningResult::failed(Some(kind), trace, e.to_string()),
        }
    }

    fn dispatch(
        &self,
        kind: QueryKind,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        match kind {
            QueryKind::GetCourseInfo => self.course_info(params, trace),
            QueryKind::GetFacultyInfo => self.faculty_info(params, trace),
            QueryKind::GetDepartmentInfo => self.department_info(params, trace),
            QueryKind::GetPrerequisites => self.prerequisites(params, trace),
            QueryKind::GetAllPrerequisites => self.all_prerequisites(params, trace),
            QueryKind::GetCoursesByDepartment => self.department_courses(params, trace),
            QueryKind::GetFacultyByDepartment => self.department_faculty(params, trace),
            QueryKind::GetCoursesTaughtBy => self.courses_taught_by(params, trace),
            QueryKind::GetCourseInstructors => self.course_instructors(params, trace),
            QueryKind::GetDepartmentHead => self.department_head(params, trace),
            QueryKind::CanTakeCourse => self.can_take_course(params, trace),
            QueryKind::GetCoursesRequiring => self.courses_requiring(params, trace),
            QueryKind::GetCoursesByLevel => self.courses_by_level(params, trace),
            QueryKind::GetFacultyByResearch => self.faculty_by_research(params, trace),
            QueryKind::SearchCourses => self.search_courses(params, trace),
            QueryKind::CountEntities => self.count_entities(params, trace),
            QueryKind::CompareCourses => self.compare_courses(params, trace),
            QueryKind::GetPrerequisiteChains => self.prerequisite_chains(params, trace),
        }
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Course by code, then node id, then exact case-insensitive name.
    ///
    /// A name shared by several courses is an error, never a guess.
    fn find_course(&self, key: &str) -> Result<Option<&'g Course>, RuleError> {
        let direct = self.graph.find_course_by_code(key).or_else(|| {
            self.graph
                .node(&NodeId::new(key))
                .filter(|n| n.kind() == NodeKind::Course)
        });
        if let Some(node) = direct {
            return Ok(node.as_course());
        }

        let wanted = key.to_lowercase();
        let named: Vec<&'g Node> = self
            .graph
            .nodes_of_kind(NodeKind::Course)
            .into_iter()
            .filter(|n| n.name().to_lowercase() == wanted)
            .collect();
        match named.as_slice() {
            [] => Ok(None),
            [node] => Ok(node.as_course()),
            _ => Err(ambiguous(NodeKind::Course, key, &named)),
        }
    }

    fn resolve_course(
        &self,
        params: &QueryParams,
        name: &'static str,
        trace: &mut Trace,
    ) -> Result<&'g Course, RuleError> {
        let key = text_param(params, name)?;
        let course = self.find_course(&key)?.ok_or_else(|| RuleError::NotFound {
            kind: NodeKind::Course,
            param: name,
            value: key.clone(),
        })?;

        trace.push(ReasoningStep::new(
            "RESOLVE_COURSE",
            format!("Resolved course code {} to {}", key, course.name),
            Snapshot::record([(name, Snapshot::text(&key))]),
            Snapshot::text(course.id.as_str()),
        ));
        Ok(course)
    }

    /// Faculty by exact normalized name, then node id, then unique partial name.
    fn resolve_faculty(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<&'g Faculty, RuleError> {
        let key = text_param(params, param::FACULTY_NAME)?;
        let by_id = || {
            self.graph
                .node(&NodeId::new(key.as_str()))
                .filter(|n| n.kind() == NodeKind::Faculty)
        };

        let found = match self.graph.find_faculty_by_name(&key, NameMatch::Exact) {
            NameLookup::Found(node) => Some(node),
            NameLookup::Ambiguous(candidates) => {
                return Err(ambiguous(NodeKind::Faculty, &key, &candidates));
            }
            NameLookup::NotFound => match by_id() {
                Some(node) => Some(node),
                None => match self.graph.find_faculty_by_name(&key, NameMatch::Partial) {
                    NameLookup::Found(node) => Some(node),
                    NameLookup::Ambiguous(candidates) => {
                        return Err(ambiguous(NodeKind::Faculty, &key, &candidates));
                    }
                    NameLookup::NotFound => None,
                },
            },
        };

        let faculty = found
            .and_then(Node::as_faculty)
            .ok_or_else(|| RuleError::NotFound {
                kind: NodeKind::Faculty,
                param: param::FACULTY_NAME,
                value: key.clone(),
            })?;

        trace.push(ReasoningStep::new(
            "RESOLVE_FACULTY",
            format!("Resolved faculty name {} to {}", key, faculty.name),
            Snapshot::record([(param::FACULTY_NAME, Snapshot::text(&key))]),
            Snapshot::text(faculty.id.as_str()),
        ));
        Ok(faculty)
    }

    /// Department by code, then node id.
    fn resolve_department(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<&'g Department, RuleError> {
        let key = text_param(params, param::DEPARTMENT_CODE)?;
        let department = self
            .graph
            .find_department_by_code(&key)
            .or_else(|| {
                self.graph
                    .node(&NodeId::new(key.as_str()))
                    .filter(|n| n.kind() == NodeKind::Department)
            })
            .and_then(Node::as_department)
            .ok_or_else(|| RuleError::NotFound {
                kind: NodeKind::Department,
                param: param::DEPARTMENT_CODE,
                value: key.clone(),
            })?;

        trace.push(ReasoningStep::new(
            "RESOLVE_DEPARTMENT",
            format!("Resolved department code {} to {}", key, department.name),
            Snapshot::record([(param::DEPARTMENT_CODE, Snapshot::text(&key))]),
            Snapshot::text(department.id.as_str()),
        ));
        Ok(department)
    }

    // =========================================================================
    // NEIGHBOR WALKS
    // =========================================================================

    fn department_of(&self, id: &NodeId) -> Option<&'g Node> {
        self.graph
            .edges_of(id, Relation::BelongsTo, Direction::Outgoing)
            .into_iter()
            .find(|n| n.kind() == NodeKind::Department)
    }

    fn members_of(&self, department: &NodeId, kind: NodeKind) -> Vec<&'g Node> {
        self.graph
            .edges_of(department, Relation::BelongsTo, Direction::Incoming)
            .into_iter()
            .filter(|n| n.kind() == kind)
            .collect()
    }

    fn head_of(&self, department: &NodeId) -> Option<&'g Node> {
        self.graph
            .edges_of(department, Relation::Heads, Direction::Incoming)
            .into_iter()
            .next()
    }

    // =========================================================================
    // ENTITY RULES
    // =========================================================================

    fn course_info(&self, params: &QueryParams, trace: &mut Trace) -> Result<Answer, RuleError> {
        let course = self.resolve_course(params, param::COURSE_CODE, trace)?;

        let department = self.department_of(&course.id);
        let instructors = self
            .graph
            .edges_of(&course.id, Relation::Teaches, Direction::Incoming);
        let prerequisites = self.graph.direct_prerequisites(&course.id);

        trace.push(ReasoningStep::new(
            "ENRICH_COURSE_DATA",
            "Retrieving department, instructors, and prerequisites",
            Snapshot::record([("course_id", Snapshot::text(course.id.as_str()))]),
            Snapshot::record([
                ("department", labels_or_none(department)),
                ("instructors", Snapshot::labels(&instructors)),
                ("prerequisites", Snapshot::labels(&prerequisites)),
            ]),
        ));

        Ok(Answer::CourseInfo(Box::new(CourseInfo {
            course: course.clone(),
            department: department.and_then(Node::as_department).cloned(),
            instructors: faculty_of(&instructors),
            prerequisites: courses_of(&prerequisites),
        })))
    }

    fn faculty_info(&self, params: &QueryParams, trace: &mut Trace) -> Result<Answer, RuleError> {
        let faculty = self.resolve_faculty(params, trace)?;

        let department = self.department_of(&faculty.id);
        let courses = self
            .graph
            .edges_of(&faculty.id, Relation::Teaches, Direction::Outgoing);
        let heads = self
            .graph
            .edges_of(&faculty.id, Relation::Heads, Direction::Outgoing)
            .into_iter()
            .next();

        trace.push(ReasoningStep::new(
            "ENRICH_FACULTY_DATA",
            "Retrieving department, courses taught, and leadership role",
            Snapshot::record([("faculty_id", Snapshot::text(faculty.id.as_str()))]),
            Snapshot::record([
                ("department", labels_or_none(department)),
                ("courses", Snapshot::labels(&courses)),
                ("heads", labels_or_none(heads)),
            ]),
        ));

        Ok(Answer::FacultyInfo(Box::new(FacultyInfo {
            faculty: faculty.clone(),
            department: department.and_then(Node::as_department).cloned(),
            courses: courses_of(&courses),
            heads: heads.and_then(Node::as_department).cloned(),
        })))
    }

    fn department_info(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let department = self.resolve_department(params, trace)?;

        let head = self.head_of(&department.id);
        let faculty = self.members_of(&department.id, NodeKind::Faculty);
        let courses = self.members_of(&department.id, NodeKind::Course);

        trace.push(ReasoningStep::new(
            "ENRICH_DEPARTMENT_DATA",
            format!(
                "Retrieving head, {} faculty member(s), and {} course(s)",
                faculty.len(),
                courses.len()
            ),
            Snapshot::record([("department_id", Snapshot::text(department.id.as_str()))]),
            Snapshot::record([
                ("head", labels_or_none(head)),
                ("faculty", Snapshot::labels(&faculty)),
                ("courses", Snapshot::labels(&courses)),
            ]),
        ));

        Ok(Answer::DepartmentInfo(Box::new(DepartmentInfo {
            department: department.clone(),
            head: head.and_then(Node::as_faculty).cloned(),
            faculty: faculty_of(&faculty),
            courses: courses_of(&courses),
        })))
    }

    // =========================================================================
    // PREREQUISITE RULES
    // =========================================================================

    fn prerequisites(&self, params: &QueryParams, trace: &mut Trace) -> Result<Answer, RuleError> {
        let course = self.resolve_course(params, param::COURSE_CODE, trace)?;
        let direct = self.graph.direct_prerequisites(&course.id);

        trace.push(ReasoningStep::new(
            "QUERY_PREREQUISITES",
            format!("Found {} direct prerequisite(s)", direct.len()),
            Snapshot::record([("course_id", Snapshot::text(course.id.as_str()))]),
            Snapshot::labels(&direct),
        ));
        Ok(Answer::nodes(&direct))
    }

    fn all_prerequisites(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let course = self.resolve_course(params, param::COURSE_CODE, trace)?;

        let direct = self.graph.direct_prerequisites(&course.id);
        trace.push(ReasoningStep::new(
            "QUERY_DIRECT_PREREQUISITES",
            format!("Found {} direct prerequisite(s)", direct.len()),
            Snapshot::record([("course_id", Snapshot::text(course.id.as_str()))]),
            Snapshot::labels(&direct),
        ));

        let closure = self.graph.all_prerequisites(&course.id);
        trace.push(ReasoningStep::new(
            "COMPUTE_TRANSITIVE_CLOSURE",
            format!(
                "Computed transitive closure: {} total prerequisite(s)",
                closure.nodes.len()
            ),
            Snapshot::record([("direct_prerequisites", Snapshot::labels(&direct))]),
            Snapshot::labels(&closure.nodes),
        ));

        Ok(Answer::nodes(&closure.nodes))
    }

    fn can_take_course(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let course = self.resolve_course(params, param::COURSE_CODE, trace)?;
        let completed = set_param(params, param::COMPLETED_COURSES)?;

        let mut resolved: Vec<&'g Course> = Vec::new();
        let mut unresolved: Vec<String> = Vec::new();
        let mut completed_ids: BTreeSet<&'g NodeId> = BTreeSet::new();
        for entry in &completed {
            match self.find_course(entry)? {
                Some(c) => {
                    if completed_ids.insert(&c.id) {
                        resolved.push(c);
                    }
                }
                None => unresolved.push(entry.clone()),
            }
        }

        trace.push(ReasoningStep::new(
            "RESOLVE_COMPLETED_COURSES",
            format!("Resolved {} completed course(s)", resolved.len()),
            Snapshot::record([(param::COMPLETED_COURSES, Snapshot::list(completed.clone()))]),
            Snapshot::record([
                ("resolved", Snapshot::list(resolved.iter().map(|c| c.code.as_str()))),
                ("unresolved", Snapshot::List(unresolved)),
            ]),
        ));

        let closure = self.graph.all_prerequisites(&course.id);
        trace.push(ReasoningStep::new(
            "COMPUTE_TRANSITIVE_CLOSURE",
            format!(
                "Computed transitive closure: {} total prerequisite(s)",
                closure.nodes.len()
            ),
            Snapshot::record([("course_id", Snapshot::text(course.id.as_str()))]),
            Snapshot::labels(&closure.nodes),
        ));

        let missing: Vec<String> = closure
            .nodes
            .iter()
            .filter(|n| !completed_ids.contains(n.id()))
            .map(|n| n.label().to_string())
            .collect();
        let can_take = missing.is_empty();

        trace.push(ReasoningStep::new(
            "CHECK_PREREQUISITES",
            format!("Can take: {}, Missing: [{}]", can_take, missing.join(", ")),
            Snapshot::record([
                ("required", Snapshot::labels(&closure.nodes)),
                ("completed", Snapshot::list(resolved.iter().map(|c| c.code.as_str()))),
            ]),
            Snapshot::record([
                ("can_take", Snapshot::Flag(can_take)),
                ("missing", Snapshot::list(missing.clone())),
            ]),
        ));

        Ok(Answer::Eligibility(Eligibility { can_take, missing }))
    }

    fn courses_requiring(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let course = self.resolve_course(params, param::COURSE_CODE, trace)?;
        let dependents = self.graph.dependent_courses(&course.id);

        trace.push(ReasoningStep::new(
            "QUERY_DEPENDENT_COURSES",
            format!("{} course(s) require {}", dependents.len(), course.code),
            Snapshot::record([("course_id", Snapshot::text(course.id.as_str()))]),
            Snapshot::labels(&dependents),
        ));
        Ok(Answer::nodes(&dependents))
    }

    fn prerequisite_chains(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let course = self.resolve_course(params, param::COURSE_CODE, trace)?;
        let chains = self.graph.prerequisite_chains(&course.id);

        let rendered = chains.iter().map(|chain| {
            chain
                .iter()
                .map(|n| n.label())
                .chain(std::iter::once(course.code.as_str()))
                .collect::<Vec<_>>()
                .join(" -> ")
        });
        trace.push(ReasoningStep::new(
            "QUERY_PREREQUISITE_CHAINS",
            format!("Found {} prerequisite chain(s) to {}", chains.len(), course.code),
            Snapshot::record([("course_id", Snapshot::text(course.id.as_str()))]),
            Snapshot::list(rendered),
        ));

        Ok(Answer::Chains(
            chains
                .iter()
                .map(|chain| chain.iter().map(|n| (*n).clone()).collect())
                .collect(),
        ))
    }

    fn compare_courses(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let a = self.resolve_course(params, param::COURSE_CODE_A, trace)?;
        let b = self.resolve_course(params, param::COURSE_CODE_B, trace)?;

        let direct_a = self.graph.direct_prerequisites(&a.id);
        let direct_b = self.graph.direct_prerequisites(&b.id);
        let ids_b: BTreeSet<&NodeId> = direct_b.iter().map(|n| n.id()).collect();
        let mut common: Vec<String> = direct_a
            .iter()
            .filter(|n| ids_b.contains(n.id()))
            .map(|n| n.label().to_string())
            .collect();
        common.sort();
        common.dedup();

        trace.push(ReasoningStep::new(
            "COMPARE_PREREQUISITES",
            format!("Common prerequisites: {}", common.len()),
            Snapshot::record([
                ("prerequisites_a", Snapshot::labels(&direct_a)),
                ("prerequisites_b", Snapshot::labels(&direct_b)),
            ]),
            Snapshot::record([("common", Snapshot::list(common.clone()))]),
        ));

        let department_a = self.department_of(&a.id).map(Node::id);
        let department_b = self.department_of(&b.id).map(Node::id);

        Ok(Answer::Comparison(Box::new(Comparison {
            course_a: a.clone(),
            course_b: b.clone(),
            credits_diff: i64::from(a.credits) - i64::from(b.credits),
            same_level: a.level == b.level,
            same_department: department_a.is_some() && department_a == department_b,
            common_prerequisite_count: common.len(),
            common_prerequisites: common,
        })))
    }

    // =========================================================================
    // DEPARTMENT & FACULTY RULES
    // =========================================================================

    fn department_courses(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let department = self.resolve_department(params, trace)?;
        let courses = self.members_of(&department.id, NodeKind::Course);

        trace.push(ReasoningStep::new(
            "QUERY_DEPARTMENT_COURSES",
            format!("{} offers {} course(s)", department.code, courses.len()),
            Snapshot::record([("department_id", Snapshot::text(department.id.as_str()))]),
            Snapshot::labels(&courses),
        ));
        Ok(Answer::nodes(&courses))
    }

    fn department_faculty(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let department = self.resolve_department(params, trace)?;
        let faculty = self.members_of(&department.id, NodeKind::Faculty);

        trace.push(ReasoningStep::new(
            "QUERY_DEPARTMENT_FACULTY",
            format!("{} has {} faculty member(s)", department.code, faculty.len()),
            Snapshot::record([("department_id", Snapshot::text(department.id.as_str()))]),
            Snapshot::labels(&faculty),
        ));
        Ok(Answer::nodes(&faculty))
    }

    fn department_head(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let department = self.resolve_department(params, trace)?;
        let head = self.head_of(&department.id);

        let description = match head {
            Some(h) => format!("Head of {}: {}", department.code, h.name()),
            None => format!("{} has no head on record", department.code),
        };
        trace.push(ReasoningStep::new(
            "QUERY_DEPARTMENT_HEAD",
            description,
            Snapshot::record([("department_id", Snapshot::text(department.id.as_str()))]),
            labels_or_none(head),
        ));
        Ok(Answer::Node(head.cloned()))
    }

    fn courses_taught_by(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let faculty = self.resolve_faculty(params, trace)?;
        let courses = self
            .graph
            .edges_of(&faculty.id, Relation::Teaches, Direction::Outgoing);

        trace.push(ReasoningStep::new(
            "QUERY_FACULTY_COURSES",
            format!("{} teaches {} course(s)", faculty.name, courses.len()),
            Snapshot::record([("faculty_id", Snapshot::text(faculty.id.as_str()))]),
            Snapshot::labels(&courses),
        ));
        Ok(Answer::nodes(&courses))
    }

    fn course_instructors(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let course = self.resolve_course(params, param::COURSE_CODE, trace)?;
        let instructors = self
            .graph
            .edges_of(&course.id, Relation::Teaches, Direction::Incoming);

        trace.push(ReasoningStep::new(
            "QUERY_COURSE_INSTRUCTORS",
            format!("{} is taught by {} instructor(s)", course.code, instructors.len()),
            Snapshot::record([("course_id", Snapshot::text(course.id.as_str()))]),
            Snapshot::labels(&instructors),
        ));
        Ok(Answer::nodes(&instructors))
    }

    // =========================================================================
    // SEARCH & AGGREGATE RULES
    // =========================================================================

    fn courses_by_level(&self, params: &QueryParams, trace: &mut Trace) -> Result<Answer, RuleError> {
        let raw = text_param(params, param::LEVEL)?;
        let level: Level = raw
            .parse()
            .map_err(|_| RuleError::Invalid(format!("Unknown course level: {}", raw)))?;

        let courses = self
            .graph
            .search(|n| n.as_course().is_some_and(|c| c.level == level));

        trace.push(ReasoningStep::new(
            "FILTER_BY_LEVEL",
            format!("Filtering courses by level: {}", level),
            Snapshot::record([(param::LEVEL, Snapshot::text(level.as_str()))]),
            Snapshot::labels(&courses),
        ));
        Ok(Answer::nodes(&courses))
    }

    fn faculty_by_research(
        &self,
        params: &QueryParams,
        trace: &mut Trace,
    ) -> Result<Answer, RuleError> {
        let area = text_param(params, param::AREA)?;
        let needle = area.to_lowercase();

        let faculty = self.graph.search(|n| {
            n.as_faculty().is_some_and(|f| {
                f.research_areas
                    .iter()
                    .any(|a| a.to_lowercase().contains(&needle))
            })
        });

        trace.push(ReasoningStep::new(
            "SEARCH_RESEARCH_AREA",
            format!("Searching for faculty with research area: {}", area),
            Snapshot::record([(param::AREA, Snapshot::text(&area))]),
            Snapshot::labels(&faculty),
        ));
        Ok(Answer::nodes(&faculty))
    }

    fn search_courses(&self, params: &QueryParams, trace: &mut Trace) -> Result<Answer, RuleError> {
        let query = text_param(params, param::QUERY)?;
        let needle = query.to_lowercase();

        let courses = self.graph.search(|n| {
            n.as_course().is_some_and(|c| {
                c.code.to_lowercase().contains(&needle)
                    || c.name.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
            })
        });

        trace.push(ReasoningStep::new(
            "SEARCH_COURSES",
            format!("Searching for courses matching: {}", query),
            Snapshot::record([(param::QUERY, Snapshot::text(&query))]),
            Snapshot::labels(&courses),
        ));
        Ok(Answer::nodes(&courses))
    }

    /// Counts a node kind (`course`, `faculty`, `departments`, ...) or the
    /// edges of a relation (`prerequisites`, `teaches`, ...).
    fn count_entities(&self, params: &QueryParams, trace: &mut Trace) -> Result<Answer, RuleError> {
        let raw = text_param(params, param::KIND)?;

        let (kind, count) = if let Ok(kind) = raw.parse::<NodeKind>() {
            (kind.as_str(), self.graph.nodes_of_kind(kind).len())
        } else if let Ok(relation) = raw.parse::<Relation>() {
            let count = self
                .graph
                .edges()
                .iter()
                .filter(|e| e.relation == relation)
                .count();
            (relation.as_str(), count)
        } else {
            return Err(RuleError::Invalid(format!("Unknown entity kind: {}", raw)));
        };

        trace.push(ReasoningStep::new(
            "COUNT_ENTITIES",
            format!("Counting {}: {}", kind, count),
            Snapshot::record([(param::KIND, Snapshot::text(&raw))]),
            Snapshot::Count(count),
        ));
        Ok(Answer::Count(EntityCount {
            kind: kind.to_string(),
            count,
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::{Graph, Loader};

    const FIXTURE: &str = r#"{
        "departments": [
            {"id": "cs", "code": "CS", "name": "Computer Science", "faculty_head": "f_smith"},
            {"id": "math", "code": "MATH", "name": "Mathematics"}
        ],
        "faculty": [
            {"id": "f_smith", "name": "Dr. Jane Smith", "title": "Professor",
             "research_areas": ["Machine Learning", "Graphs"], "department": "cs"},
            {"id": "f_jones", "name": "Dr. Alan Jones", "title": "Lecturer",
             "research_areas": ["Number Theory"], "department": "math"},
            {"id": "f_smithe", "name": "Prof. Ada Smith", "title": "Professor",
             "research_areas": ["Topology"], "department": "math"}
        ],
        "courses": [
            {"id": "cs101", "code": "CS101", "name": "Intro to Programming", "credits": 4,
             "level": "undergraduate", "department": "cs", "taught_by": ["f_smith"],
             "description": "Variables and loops"},
            {"id": "cs201", "code": "CS201", "name": "Data Structures", "credits": 4,
             "level": "undergraduate", "department": "cs", "taught_by": ["f_smith"]},
            {"id": "math101", "code": "MATH101", "name": "Calculus I", "credits": 3,
             "level": "undergraduate", "department": "math", "taught_by": ["f_jones"]},
            {"id": "cs501", "code": "CS501", "name": "Graph Mining", "credits": 3,
             "level": "graduate", "department": "cs",
             "description": "Learning on graphs"}
        ],
        "prerequisites": [
            {"course": "cs201", "requires": "cs101"},
            {"course": "cs501", "requires": "cs201"},
            {"course": "cs501", "requires": "math101"}
        ]
    }"#;

    fn graph() -> Graph {
        Loader::from_json_slice(FIXTURE.as_bytes()).expect("fixture")
    }

    fn rules(result: &ReasoningResult) -> Vec<&str> {
        result.steps.iter().map(|s| s.rule_name.as_str()).collect()
    }

    fn codes(answer: &Answer) -> Vec<String> {
        match answer {
            Answer::Nodes(nodes) => nodes.iter().map(|n| n.label().to_string()).collect(),
            other => panic!("expected nodes, got {:?}", other),
        }
    }

    #[test]
    fn all_prerequisites_trace() {
        let graph = graph();
        let result =
            Reasoner::new(&graph).execute(&Query::course(QueryKind::GetAllPrerequisites, "cs501"));

        assert!(result.success);
        assert_eq!(result.query_kind, Some(QueryKind::GetAllPrerequisites));
        assert_eq!(codes(&result.answer), vec!["CS101", "CS201", "MATH101"]);
        assert_eq!(
            rules(&result),
            vec![
                "RESOLVE_COURSE",
                "QUERY_DIRECT_PREREQUISITES",
                "COMPUTE_TRANSITIVE_CLOSURE"
            ]
        );
    }

    #[test]
    fn course_resolves_by_id_and_name() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);
        for key in ["CS201", "cs201", "data structures"] {
            let result = reasoner.execute(&Query::course(QueryKind::GetPrerequisites, key));
            assert_eq!(codes(&result.answer), vec!["CS101"], "{}", key);
        }
    }

    #[test]
    fn shared_course_name_is_ambiguous() {
        let graph = Loader::from_json_slice(
            br#"{
                "departments": [{"id": "cs", "code": "CS", "name": "Computer Science"}],
                "courses": [
                    {"id": "cs290", "code": "CS290", "name": "Special Topics", "credits": 3,
                     "level": "undergraduate", "department": "cs"},
                    {"id": "cs590", "code": "CS590", "name": "Special Topics", "credits": 3,
                     "level": "graduate", "department": "cs"},
                    {"id": "cs600", "code": "CS600", "name": "Thesis", "credits": 6,
                     "level": "graduate", "department": "cs"}
                ],
                "prerequisites": [{"course": "cs600", "requires": "cs590"}]
            }"#,
        )
        .expect("graph");
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::course(QueryKind::GetCourseInfo, "special topics"));
        assert!(!result.success);
        let message = result.error_message.expect("message");
        assert!(message.contains("ambiguous"), "{}", message);
        assert!(message.contains("CS290, CS590"), "{}", message);

        let result = reasoner.execute(&Query::course(QueryKind::GetCourseInfo, "CS590"));
        assert!(result.success);

        let result = reasoner.execute(&Query::can_take("CS600", &["Special Topics"]));
        assert!(!result.success);
        assert!(
            result
                .error_message
                .as_deref()
                .is_some_and(|m| m.contains("ambiguous"))
        );

        let result = reasoner.execute(&Query::can_take("CS600", &["cs590"]));
        assert!(matches!(
            &result.answer,
            Answer::Eligibility(e) if e.can_take
        ));
    }

    #[test]
    fn unresolved_course_names_parameter() {
        let graph = graph();
        let result =
            Reasoner::new(&graph).execute(&Query::course(QueryKind::GetPrerequisites, "XYZ999"));

        assert!(!result.success);
        assert!(result.steps.is_empty());
        assert_eq!(result.answer, Answer::None);
        let message = result.error_message.expect("message");
        assert!(message.contains("course_code"));
        assert!(message.contains("XYZ999"));
    }

    #[test]
    fn missing_parameter_fails() {
        let graph = graph();
        let result = Reasoner::new(&graph).execute(&Query::new(QueryKind::GetCourseInfo));
        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Missing required parameter: course_code")
        );
    }

    #[test]
    fn unknown_kind_is_distinct_failure() {
        let graph = graph();
        let result = Reasoner::new(&graph).execute_named("TELEPORT", &QueryParams::new());
        assert!(!result.success);
        assert_eq!(result.query_kind, None);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Unknown query kind: TELEPORT")
        );
    }

    #[test]
    fn can_take_reports_missing_transitively() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::can_take("CS501", &["cs101", "NOPE1"]));
        assert!(result.success);
        assert_eq!(
            result.answer,
            Answer::Eligibility(Eligibility {
                can_take: false,
                missing: vec!["CS201".to_string(), "MATH101".to_string()],
            })
        );
        assert_eq!(
            rules(&result),
            vec![
                "RESOLVE_COURSE",
                "RESOLVE_COMPLETED_COURSES",
                "COMPUTE_TRANSITIVE_CLOSURE",
                "CHECK_PREREQUISITES"
            ]
        );

        let result = reasoner.execute(&Query::can_take("CS501", &["CS101", "CS201", "math101"]));
        assert_eq!(
            result.answer,
            Answer::Eligibility(Eligibility {
                can_take: true,
                missing: vec![],
            })
        );
    }

    #[test]
    fn can_take_without_completed_courses() {
        let graph = graph();
        let result = Reasoner::new(&graph).execute(&Query::course(QueryKind::CanTakeCourse, "CS101"));
        assert_eq!(
            result.answer,
            Answer::Eligibility(Eligibility {
                can_take: true,
                missing: vec![],
            })
        );
    }

    #[test]
    fn faculty_partial_match_must_be_unique() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::faculty(QueryKind::GetCoursesTaughtBy, "Smith"));
        assert!(!result.success);
        assert!(
            result
                .error_message
                .as_deref()
                .is_some_and(|m| m.contains("ambiguous"))
        );

        let result = reasoner.execute(&Query::faculty(QueryKind::GetCoursesTaughtBy, "Dr. Jones"));
        assert!(result.success);
        assert_eq!(codes(&result.answer), vec!["MATH101"]);
    }

    #[test]
    fn faculty_exact_name_and_id() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::faculty(QueryKind::GetFacultyInfo, "professor jane smith"));
        let Answer::FacultyInfo(info) = &result.answer else {
            panic!("expected faculty info, got {:?}", result.answer);
        };
        assert_eq!(info.faculty.id, NodeId::new("f_smith"));
        assert_eq!(info.heads.as_ref().map(|d| d.code.as_str()), Some("CS"));
        assert_eq!(info.courses.len(), 2);

        let result = reasoner.execute(&Query::faculty(QueryKind::GetFacultyInfo, "f_jones"));
        assert!(result.success);
        assert_eq!(rules(&result), vec!["RESOLVE_FACULTY", "ENRICH_FACULTY_DATA"]);
    }

    #[test]
    fn faculty_title_glued_to_name_resolves() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::faculty(QueryKind::GetCoursesTaughtBy, "Dr.Jane Smith"));
        assert!(result.success, "{:?}", result.error_message);
        assert_eq!(codes(&result.answer), vec!["CS101", "CS201"]);

        let result = reasoner.execute(&Query::faculty(QueryKind::GetCoursesTaughtBy, "Dr.Jones"));
        assert_eq!(codes(&result.answer), vec!["MATH101"]);
    }

    #[test]
    fn department_head_may_be_absent() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::department(QueryKind::GetDepartmentHead, "cs"));
        assert!(matches!(&result.answer, Answer::Node(Some(n)) if n.id() == &NodeId::new("f_smith")));

        let result = reasoner.execute(&Query::department(QueryKind::GetDepartmentHead, "MATH"));
        assert!(result.success);
        assert_eq!(result.answer, Answer::Node(None));
    }

    #[test]
    fn department_listings() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let courses = reasoner.execute(&Query::department(QueryKind::GetCoursesByDepartment, "CS"));
        assert_eq!(codes(&courses.answer), vec!["CS101", "CS201", "CS501"]);

        let faculty = reasoner.execute(&Query::department(QueryKind::GetFacultyByDepartment, "math"));
        assert_eq!(codes(&faculty.answer), vec!["Dr. Alan Jones", "Prof. Ada Smith"]);

        let info = reasoner.execute(&Query::department(QueryKind::GetDepartmentInfo, "CS"));
        let Answer::DepartmentInfo(info) = &info.answer else {
            panic!("expected department info");
        };
        assert_eq!(info.head.as_ref().map(|f| f.name.as_str()), Some("Dr. Jane Smith"));
        assert_eq!(info.courses.len(), 3);
    }

    #[test]
    fn course_info_is_enriched() {
        let graph = graph();
        let result =
            Reasoner::new(&graph).execute(&Query::course(QueryKind::GetCourseInfo, "CS501"));
        let Answer::CourseInfo(info) = &result.answer else {
            panic!("expected course info");
        };
        assert_eq!(info.department.as_ref().map(|d| d.code.as_str()), Some("CS"));
        assert!(info.instructors.is_empty());
        let prereqs: Vec<&str> = info.prerequisites.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(prereqs, vec!["CS201", "MATH101"]);
    }

    #[test]
    fn courses_requiring_and_instructors() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::course(QueryKind::GetCoursesRequiring, "CS201"));
        assert_eq!(codes(&result.answer), vec!["CS501"]);

        let result = reasoner.execute(&Query::course(QueryKind::GetCourseInstructors, "CS101"));
        assert_eq!(codes(&result.answer), vec!["Dr. Jane Smith"]);
    }

    #[test]
    fn compare_uses_direct_prerequisites() {
        let graph = graph();
        let result = Reasoner::new(&graph).execute(&Query::compare("CS501", "CS201"));
        let Answer::Comparison(cmp) = &result.answer else {
            panic!("expected comparison");
        };
        assert_eq!(cmp.credits_diff, -1);
        assert!(!cmp.same_level);
        assert!(cmp.same_department);
        assert_eq!(cmp.common_prerequisite_count, 0);
        assert_eq!(
            rules(&result),
            vec!["RESOLVE_COURSE", "RESOLVE_COURSE", "COMPARE_PREREQUISITES"]
        );
    }

    #[test]
    fn compare_fails_on_second_course() {
        let graph = graph();
        let result = Reasoner::new(&graph).execute(&Query::compare("CS501", "CS999"));
        assert!(!result.success);
        assert_eq!(result.steps.len(), 1);
        assert!(
            result
                .error_message
                .as_deref()
                .is_some_and(|m| m.contains("course_code_b"))
        );
    }

    #[test]
    fn search_rules() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);

        let result = reasoner.execute(&Query::new(QueryKind::SearchCourses).with(param::QUERY, "GRAPH"));
        assert_eq!(codes(&result.answer), vec!["CS501"]);

        let result =
            reasoner.execute(&Query::new(QueryKind::GetFacultyByResearch).with(param::AREA, "learning"));
        assert_eq!(codes(&result.answer), vec!["Dr. Jane Smith"]);

        let result =
            reasoner.execute(&Query::new(QueryKind::GetCoursesByLevel).with(param::LEVEL, "Graduate"));
        assert_eq!(codes(&result.answer), vec!["CS501"]);

        let result =
            reasoner.execute(&Query::new(QueryKind::GetCoursesByLevel).with(param::LEVEL, "postdoc"));
        assert!(!result.success);
    }

    #[test]
    fn count_nodes_and_relations() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);
        let count = |kind: &str| {
            match reasoner
                .execute(&Query::new(QueryKind::CountEntities).with(param::KIND, kind))
                .answer
            {
                Answer::Count(c) => Some(c.count),
                _ => None,
            }
        };

        assert_eq!(count("courses"), Some(4));
        assert_eq!(count("Faculty"), Some(3));
        assert_eq!(count("department"), Some(2));
        assert_eq!(count("prerequisites"), Some(3));
        assert_eq!(count("students"), None);
    }

    #[test]
    fn prerequisite_chains_rule() {
        let graph = graph();
        let result =
            Reasoner::new(&graph).execute(&Query::course(QueryKind::GetPrerequisiteChains, "CS501"));
        let Answer::Chains(chains) = &result.answer else {
            panic!("expected chains");
        };
        assert_eq!(chains.len(), 2);
        assert_eq!(
            result.steps[1].outputs,
            Snapshot::list(["CS101 -> CS201 -> CS501", "MATH101 -> CS501"])
        );
    }

    #[test]
    fn results_are_deterministic() {
        let graph = graph();
        let reasoner = Reasoner::new(&graph);
        let query = Query::can_take("CS501", &["CS101"]);
        assert_eq!(reasoner.execute(&query), reasoner.execute(&query));
    }
}
