//! Best paths between two nodes.

use anyhow::{Context, Result};
use colored::Colorize;
use pathfinder::prelude::*;
use std::path::Path;

use super::{format_hops, load_topology};

pub fn run(snapshot: Option<&Path>, query: &BestPathQuery, json: bool) -> Result<()> {
    let topology = load_topology(snapshot)?;
    let results = topology.best_paths(query)?;

    if json {
        let out = serde_json::to_string_pretty(&results).context("Failed to serialize paths")?;
        println!("{out}");
        return Ok(());
    }

    if results.is_empty() {
        println!(
            "{} No path from {} to {}",
            "•".yellow(),
            query.source.cyan(),
            query.destination.cyan()
        );
        return Ok(());
    }

    let weight = query.weight.as_deref().unwrap_or("hops");
    println!(
        "{} Paths from {} to {} by {}:",
        "→".blue(),
        query.source.cyan().bold(),
        query.destination.cyan().bold(),
        weight.cyan()
    );
    println!();

    for (i, result) in results.iter().enumerate() {
        let rank = format!("{}.", i + 1);
        let cost = result.cost.map(|c| format!("(cost {c})")).unwrap_or_default();
        println!("  {} {} {}", rank.blue(), format_hops(&result.hops), cost.dimmed());
    }

    println!();
    println!("{} {} paths", "✓".green(), results.len().to_string().cyan());

    Ok(())
}
