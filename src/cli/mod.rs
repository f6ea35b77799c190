//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "logsift", version, about = "CI failure autoclassification")]
pub struct Cli {
    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and default configuration
    Init(commands::init::InitArgs),
    /// Run autoclassification for one job
    Classify(commands::classify::ClassifyArgs),
    /// Assign a bug number to a classified failure
    Bug(commands::bug::BugArgs),
    /// List a job's error lines and their match evidence
    Errors(commands::errors::ErrorsArgs),
}

/// Print an error and exit non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) {
    if json {
        let output = serde_json::json!({ "error": err.to_string() });
        eprintln!("{output}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
