//! Generate command handler

use anyhow::{Context, Result};
use colored::*;

use gantry_core::domain::plan::Plan;

/// Build the plan and emit it as JSON
///
/// When no output path is given the JSON goes to stdout and the summary
/// to stderr, so the command stays pipeable into the CI server uploader.
pub fn handle_generate(request_path: &str, output: Option<&str>, compact: bool) -> Result<()> {
    let request = super::load_request(request_path)?;

    let plan = gantry_suites::build_plan(&request)
        .with_context(|| format!("Failed to build plan from `{}`", request_path))?;

    let json = if compact {
        serde_json::to_string(&plan)?
    } else {
        serde_json::to_string_pretty(&plan)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write plan to {}", path))?;
            print_summary(request.name.as_deref(), &plan, Some(path));
        }
        None => {
            println!("{}", json);
            eprintln!(
                "{}",
                format!("✓ Plan generated: {} stage(s)", plan.len()).green()
            );
        }
    }

    Ok(())
}

fn print_summary(name: Option<&str>, plan: &Plan, output: Option<&str>) {
    let disabled = plan.stages().iter().filter(|s| !s.enabled).count();

    println!("{}", "✓ Plan generated!".green().bold());
    if let Some(name) = name {
        println!("  Name:   {}", name.bold());
    }
    println!(
        "  Stages: {} {}",
        plan.len(),
        format!("({} disabled)", disabled).dimmed()
    );
    if let Some(path) = output {
        println!("  Output: {}", path.cyan());
    }
}
