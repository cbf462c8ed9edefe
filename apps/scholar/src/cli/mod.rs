//! # Scholar CLI Module
//!
//! This module implements the CLI interface for Scholar.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `status` - Show graph statistics
//! - `query` - Execute a structured query
//! - `kinds` - List supported query kinds
//! - `export` - Export the graph view to a file
//! - `validate` - Load the dataset and report problems

mod commands;

use clap::{Parser, Subcommand};
use scholar_core::ScholarError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Scholar - university knowledge graph
///
/// Answers structured questions about departments, faculty and courses
/// with an explicit reasoning trace.
#[derive(Parser, Debug)]
#[command(name = "scholar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the university dataset (JSON)
    #[arg(
        short = 'D',
        long,
        global = true,
        env = "SCHOLAR_DATA",
        default_value = "data/university.json"
    )]
    pub data: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show graph statistics
    Status,

    /// Execute a structured query
    Query {
        /// Query kind (e.g. GET_ALL_PREREQUISITES)
        #[arg(short, long)]
        kind: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Completed course codes (comma-separated)
        #[arg(short, long)]
        completed: Option<String>,
    },

    /// List supported query kinds and their parameters
    Kinds,

    /// Export the graph as a {nodes, edges} view
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Load the dataset and report validation problems
    Validate,
}

/// Parse a `key=value` pair.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), ScholarError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(&cli.data, &host, port).await,
        Some(Commands::Status) => cmd_status(&cli.data, json_mode),
        Some(Commands::Query {
            kind,
            params,
            completed,
        }) => cmd_query(
            &cli.data,
            json_mode,
            cli.verbose,
            &kind,
            params,
            completed.as_deref(),
        ),
        Some(Commands::Kinds) => cmd_kinds(json_mode),
        Some(Commands::Export { output }) => cmd_export(&cli.data, &output),
        Some(Commands::Validate) => cmd_validate(&cli.data, json_mode),
        None => cmd_status(&cli.data, json_mode),
    }
}

// =============================================================================
// TESTS
// =============================================================================
