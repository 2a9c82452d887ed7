//! Environments command handler

use anyhow::Result;
use colored::*;

use gantry_core::domain::binding::{self, KNOWN_ENVIRONMENTS};

/// List the static environment binding table
pub fn handle_environments() -> Result<()> {
    println!(
        "{}",
        format!("Known environments ({}):", KNOWN_ENVIRONMENTS.len()).bold()
    );
    println!();

    for &id in KNOWN_ENVIRONMENTS {
        let resolved = binding::resolve(id)?;

        println!("{}", id.cyan().bold());
        if resolved.parameters.is_empty() {
            println!("  {}", "(no parameters)".dimmed());
        }
        for (name, value) in &resolved.parameters {
            let shown = if name.as_str() == "password" {
                "********"
            } else {
                value.as_str()
            };
            println!("  {} = {}", name, shown.dimmed());
        }
        println!();
    }

    Ok(())
}
