//! # Scholar
//!
//! The main binary for the Scholar university knowledge graph.
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! scholar serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! scholar status
//! scholar query -k GET_ALL_PREREQUISITES -p course_code=CS401
//! scholar query -k CAN_TAKE_COURSE -p course_code=CS301 --completed CS101,CS201
//! scholar export -o graph.json
//! ```

use clap::Parser;
use scholar::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // SCHOLAR_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SCHOLAR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scholar=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Scholar startup banner.
fn print_banner() {
    println!(
        "Scholar v{} - university knowledge graph\n",
        env!("CARGO_PKG_VERSION")
    );
}
