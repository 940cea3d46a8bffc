//! Show topology statistics.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::load_topology;

pub fn run(snapshot: Option<&Path>) -> Result<()> {
    let topology = load_topology(snapshot)?;
    let stats = topology.stats()?;
    let config = topology.search().config();

    println!("{}", "Topology Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Snapshot".cyan().bold());
    println!("  Switches:       {}", stats.switches.to_string().white().bold());
    println!("  Links:          {}", stats.links.to_string().white().bold());
    println!(
        "  Active links:   {} {}",
        stats.active_links.to_string().white().bold(),
        format!("({} inactive)", stats.links - stats.active_links).dimmed()
    );
    println!();

    println!("{}", "Graph".cyan().bold());
    println!("  Nodes:          {}", stats.nodes.to_string().white().bold());
    println!("  Edges:          {}", stats.edges.to_string().white().bold());
    println!();

    println!("{}", "Search".cyan().bold());
    println!("  Default weight: {}", config.default_weight);
    println!("  Max paths:      {}", config.max_paths);
    println!("  Max flexible:   {}", config.max_flexible);

    Ok(())
}
