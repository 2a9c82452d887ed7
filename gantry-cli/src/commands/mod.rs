//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod environments;
mod generate;
mod init;
mod validate;

use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::Read;

use gantry_core::dto::PlanRequest;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a plan from a request file and emit it as JSON
    Generate {
        /// Path to the plan request JSON file, `-` for stdin
        #[arg(short, long, env = "GANTRY_REQUEST")]
        request: String,

        /// Write the plan JSON here instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Validate a request without emitting the plan
    Validate {
        /// Path to the plan request JSON file, `-` for stdin
        #[arg(short, long, env = "GANTRY_REQUEST")]
        request: String,
    },
    /// List the known environment bindings
    Environments,
    /// Write a starter plan request file
    Init {
        /// Output directory for the generated request
        #[arg(short, long, default_value = ".")]
        output: String,

        /// Runtime tag for the generated request
        #[arg(long, default_value = "PHP72")]
        runtime: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            request,
            output,
            compact,
        } => generate::handle_generate(&request, output.as_deref(), compact),
        Commands::Validate { request } => validate::handle_validate(&request),
        Commands::Environments => environments::handle_environments(),
        Commands::Init { output, runtime } => init::handle_init(&output, &runtime),
    }
}

/// Read and parse a plan request from a file path or stdin (`-`)
pub(crate) fn load_request(path: &str) -> Result<PlanRequest> {
    let content = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path))?
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse plan request from `{}`", path))
}
