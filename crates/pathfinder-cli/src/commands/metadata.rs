//! Show the metadata of one edge.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::load_topology;

pub fn run(snapshot: Option<&Path>, a: &str, b: &str) -> Result<()> {
    let topology = load_topology(snapshot)?;

    let Some(metadata) = topology.edge_metadata(a, b)? else {
        println!("{} No edge between {} and {}", "•".yellow(), a.cyan(), b.cyan());
        return Ok(());
    };

    println!("{} Edge {} ↔ {}", "→".blue(), a.cyan().bold(), b.cyan().bold());
    if metadata.is_empty() {
        println!("  {}", "(no metadata)".dimmed());
    }
    for (key, value) in &metadata {
        println!("  {:<14} {}", key, value.to_string().white().bold());
    }

    Ok(())
}
