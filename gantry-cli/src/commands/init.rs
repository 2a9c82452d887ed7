//! Init command handler
//!
//! Writes a starter plan request covering the standard pre-merge suite
//! set, ready to be edited and fed back into `gantry generate`.

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

/// Generate a starter plan-request.json
pub fn handle_init(output_dir: &str, runtime: &str) -> Result<()> {
    let request = gantry_suites::pre_merge_request(runtime);
    let content = serde_json::to_string_pretty(&request)?;

    let request_path = Path::new(output_dir).join("plan-request.json");
    std::fs::write(&request_path, content)
        .with_context(|| format!("Failed to write starter request to {:?}", request_path))?;

    println!("{}", "✓ Starter plan request generated!".green().bold());
    println!("  {} {}", "Created".green(), request_path.display());
    println!();
    println!("{}", "Next steps:".bold());
    println!("  1. Adjust suites, backends and shard counts to your pipeline");
    println!(
        "  2. Run {} to check the request",
        format!("gantry validate --request {}", request_path.display()).cyan()
    );
    println!(
        "  3. Run {} and hand the JSON to your CI server",
        format!("gantry generate --request {}", request_path.display()).cyan()
    );

    Ok(())
}
