//! Validate command handler

use anyhow::{Context, Result};
use colored::*;

/// Build the plan for its side effect of validating the request
///
/// Any generation error (unknown environment, bad shard count, duplicate
/// keys, unresolved parameters) surfaces here with a non-zero exit.
pub fn handle_validate(request_path: &str) -> Result<()> {
    let request = super::load_request(request_path)?;

    let plan = gantry_suites::build_plan(&request)
        .with_context(|| format!("Plan request `{}` is invalid", request_path))?;

    println!("{}", "✓ Plan request is valid!".green().bold());
    println!("  Stages: {}", plan.len());
    println!(
        "  Keys:   {}",
        plan.stages()
            .iter()
            .map(|s| s.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
            .dimmed()
    );

    Ok(())
}
