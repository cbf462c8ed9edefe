//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, KindsResponse, QueryResponse};
use scholar_core::{
    Answer, Graph, GraphStore, Loader, Node, NodeKind, ParamValue, QueryParams, Reasoner,
    ScholarError, export_view, primitives::MAX_DATASET_BYTES, query::param,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ScholarError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ScholarError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ScholarError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and require a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, ScholarError> {
    let canonical = path.canonicalize().map_err(|e| {
        ScholarError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ScholarError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent directory of an output path.
fn validate_output_path(path: &Path) -> Result<PathBuf, ScholarError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        ScholarError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(ScholarError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| ScholarError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// LOADING
// =============================================================================

/// Read, validate and load the dataset at `path`, warning about cycles.
pub fn load_graph(path: &Path) -> Result<Graph, ScholarError> {
    let graph = read_graph(path)?;
    warn_on_cycles(&graph);
    Ok(graph)
}

fn read_graph(path: &Path) -> Result<Graph, ScholarError> {
    let validated_path = validate_file_path(path)?;
    validate_file_size(&validated_path, MAX_DATASET_BYTES as u64)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| ScholarError::IoError(format!("Read file: {}", e)))?;

    let graph = Loader::from_json_slice(&contents)?;
    tracing::info!(
        path = %validated_path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded university graph"
    );
    Ok(graph)
}

/// Log every course whose prerequisite closure runs into a cycle.
///
/// Returns the number of such courses.
pub fn warn_on_cycles<G: GraphStore>(graph: &G) -> usize {
    let mut affected = 0;
    for course in graph.nodes_of_kind(NodeKind::Course) {
        if graph.all_prerequisites(course.id()).cycle_detected {
            tracing::warn!(
                course = course.label(),
                "Prerequisite cycle reachable from course"
            );
            affected += 1;
        }
    }
    affected
}

/// Turn CLI `key=value` pairs and `--completed` into query parameters.
///
/// Values stay text exactly as typed; the reasoner parses what it needs.
pub fn build_params(pairs: Vec<(String, String)>, completed: Option<&str>) -> QueryParams {
    let mut params: QueryParams = pairs
        .into_iter()
        .map(|(key, value)| (key, ParamValue::Text(value)))
        .collect();

    if let Some(completed) = completed {
        let codes: Vec<String> = completed
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        params.insert(param::COMPLETED_COURSES.to_string(), ParamValue::Set(codes));
    }

    params
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), ScholarError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ScholarError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(data_path: &Path, host: &str, port: u16) -> Result<(), ScholarError> {
    let graph = load_graph(data_path)?;

    println!("Scholar Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:    {}", host);
    println!("  Port:    {}", port);
    println!("  Dataset: {:?}", data_path);
    println!();
    println!("Endpoints:");
    println!("  GET  /health - Health check");
    println!("  GET  /stats  - Graph statistics");
    println!("  GET  /graph  - Graph view");
    println!("  GET  /kinds  - Supported query kinds");
    println!("  POST /query  - Execute a query");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, graph).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show graph statistics.
pub fn cmd_status(data_path: &Path, json_mode: bool) -> Result<(), ScholarError> {
    let graph = load_graph(data_path)?;
    let stats = graph.statistics();

    if json_mode {
        return print_json(&stats);
    }

    println!("Scholar Graph Status");
    println!("====================");
    println!("Dataset: {:?}", data_path);
    println!();
    println!("Nodes:         {}", stats.total_nodes);
    println!("  Departments: {}", stats.departments);
    println!("  Faculty:     {}", stats.faculty);
    println!("  Courses:     {}", stats.courses);
    println!("Edges:         {}", stats.total_edges);
    println!("  Prerequisites: {}", stats.prerequisites);

    Ok(())
}

// =============================================================================
// QUERY COMMAND
// =============================================================================

/// Execute a structured query and print the answer with its trace.
pub fn cmd_query(
    data_path: &Path,
    json_mode: bool,
    verbose: bool,
    kind: &str,
    pairs: Vec<(String, String)>,
    completed: Option<&str>,
) -> Result<(), ScholarError> {
    let graph = load_graph(data_path)?;
    let params = build_params(pairs, completed);

    let result = Reasoner::new(&graph).execute_named(kind, &params);
    let success = result.success;
    let error_message = result.error_message.clone();

    if json_mode {
        print_json(&QueryResponse::from(result))?;
    } else {
        if success {
            println!("{}", render_answer(&result.answer));
            println!();
        }
        println!("{}", result.explanation());

        if verbose {
            for (i, step) in result.steps.iter().enumerate() {
                let inputs = serde_json::to_string(&step.inputs).unwrap_or_default();
                let outputs = serde_json::to_string(&step.outputs).unwrap_or_default();
                println!("  {}. in={} out={}", i + 1, inputs, outputs);
            }
        }
    }

    if success {
        Ok(())
    } else {
        Err(ScholarError::InvalidData(error_message.unwrap_or_default()))
    }
}

/// One-line description of a node.
fn describe(node: &Node) -> String {
    match node {
        Node::Course(c) => format!(
            "{}: {} ({} credits, {})",
            c.code, c.name, c.credits, c.level
        ),
        Node::Faculty(f) if f.title.is_empty() => f.name.clone(),
        Node::Faculty(f) => format!("{} ({})", f.name, f.title),
        Node::Department(d) => format!("{}: {}", d.code, d.name),
    }
}

fn bullet_list(items: impl IntoIterator<Item = String>) -> String {
    let lines: Vec<String> = items.into_iter().map(|s| format!("  - {}", s)).collect();
    if lines.is_empty() {
        "  (none)".to_string()
    } else {
        lines.join("\n")
    }
}

/// Human-readable rendering of an answer payload.
pub fn render_answer(answer: &Answer) -> String {
    match answer {
        Answer::None => "(no answer)".to_string(),
        Answer::Nodes(nodes) => {
            format!(
                "{} result(s):\n{}",
                nodes.len(),
                bullet_list(nodes.iter().map(describe))
            )
        }
        Answer::Node(Some(node)) => describe(node),
        Answer::Node(None) => "(none)".to_string(),
        Answer::CourseInfo(info) => {
            let department = info
                .department
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "(none)".to_string());
            format!(
                "{}: {}\nCredits: {}\nLevel: {}\nDepartment: {}\nDescription: {}\nInstructors:\n{}\nPrerequisites:\n{}",
                info.course.code,
                info.course.name,
                info.course.credits,
                info.course.level,
                department,
                info.course.description,
                bullet_list(info.instructors.iter().map(|f| f.name.clone())),
                bullet_list(
                    info.prerequisites
                        .iter()
                        .map(|c| format!("{}: {}", c.code, c.name))
                ),
            )
        }
        Answer::FacultyInfo(info) => {
            let mut out = format!("{} ({})", info.faculty.name, info.faculty.title);
            if let Some(email) = &info.faculty.email {
                out.push_str(&format!("\nEmail: {}", email));
            }
            if let Some(department) = &info.department {
                out.push_str(&format!("\nDepartment: {}", department.name));
            }
            if let Some(heads) = &info.heads {
                out.push_str(&format!("\nHeads: {}", heads.name));
            }
            out.push_str(&format!(
                "\nResearch areas: {}\nCourses:\n{}",
                info.faculty.research_areas.join(", "),
                bullet_list(
                    info.courses
                        .iter()
                        .map(|c| format!("{}: {}", c.code, c.name))
                ),
            ));
            out
        }
        Answer::DepartmentInfo(info) => {
            let head = info
                .head
                .as_ref()
                .map(|f| f.name.clone())
                .unwrap_or_else(|| "(none)".to_string());
            format!(
                "{}: {}\nHead: {}\nFaculty:\n{}\nCourses:\n{}",
                info.department.code,
                info.department.name,
                head,
                bullet_list(info.faculty.iter().map(|f| f.name.clone())),
                bullet_list(
                    info.courses
                        .iter()
                        .map(|c| format!("{}: {}", c.code, c.name))
                ),
            )
        }
        Answer::Eligibility(eligibility) => {
            if eligibility.can_take {
                "Eligible: all prerequisites completed".to_string()
            } else {
                format!(
                    "Not eligible, missing:\n{}",
                    bullet_list(eligibility.missing.iter().cloned())
                )
            }
        }
        Answer::Comparison(cmp) => format!(
            "{} vs {}\nCredit difference: {}\nSame level: {}\nSame department: {}\nCommon prerequisites ({}):\n{}",
            cmp.course_a.code,
            cmp.course_b.code,
            cmp.credits_diff,
            cmp.same_level,
            cmp.same_department,
            cmp.common_prerequisite_count,
            bullet_list(cmp.common_prerequisites.iter().cloned()),
        ),
        Answer::Count(count) => format!("{}: {}", count.kind, count.count),
        Answer::Chains(chains) => format!(
            "{} chain(s):\n{}",
            chains.len(),
            bullet_list(chains.iter().map(|chain| {
                chain
                    .iter()
                    .map(|n| n.label().to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ")
            }))
        ),
    }
}

// =============================================================================
// KINDS COMMAND
// =============================================================================

/// List the supported query kinds.
pub fn cmd_kinds(json_mode: bool) -> Result<(), ScholarError> {
    let kinds = KindsResponse::default();

    if json_mode {
        return print_json(&kinds);
    }

    for kind in &kinds.kinds {
        let mut line = format!("{:<28} {}", kind.name, kind.required.join(", "));
        if !kind.optional.is_empty() {
            line.push_str(&format!(" [{}]", kind.optional.join(", ")));
        }
        println!("{}", line.trim_end());
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write the graph view (`{nodes, edges}`) to a file.
pub fn cmd_export(data_path: &Path, output: &Path) -> Result<(), ScholarError> {
    let validated_output = validate_output_path(output)?;
    let graph = load_graph(data_path)?;

    let data = serde_json::to_vec_pretty(&export_view(&graph))
        .map_err(|e| ScholarError::SerializationError(e.to_string()))?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| ScholarError::IoError(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Load the dataset and report the outcome.
pub fn cmd_validate(data_path: &Path, json_mode: bool) -> Result<(), ScholarError> {
    let graph = read_graph(data_path)?;
    let stats = graph.statistics();
    let cyclic_courses = warn_on_cycles(&graph);

    if json_mode {
        return print_json(&serde_json::json!({
            "valid": true,
            "node_count": stats.total_nodes,
            "edge_count": stats.total_edges,
            "courses_reaching_cycle": cyclic_courses,
        }));
    }

    println!(
        "Dataset OK: {} nodes, {} edges",
        stats.total_nodes, stats.total_edges
    );
    if cyclic_courses > 0 {
        println!(
            "Warning: {} course(s) reach a prerequisite cycle",
            cyclic_courses
        );
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
