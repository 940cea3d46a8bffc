//! Initialize a new Pathfinder project.

use anyhow::{Context, Result};
use colored::Colorize;
use pathfinder::prelude::TopologySnapshot;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let base_path = match path {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Pathfinder project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config = Config::default();
    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        config.save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    // An empty snapshot so queries work before a real topology is exported
    let snapshot_path = base_path.join(&config.topology.snapshot);
    if !snapshot_path.exists() {
        let empty = serde_json::to_string_pretty(&TopologySnapshot::new())
            .context("Failed to serialize topology")?;
        std::fs::write(&snapshot_path, empty)
            .with_context(|| format!("Failed to write {}", snapshot_path.display()))?;
        println!("  {} Created {}", "✓".green(), snapshot_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), snapshot_path.display());
    }

    println!();
    println!("{} Pathfinder project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} export your topology to {}", "1.".blue(), snapshot_path.display());
    println!("  {} pathfinder paths <source> <destination>", "2.".blue());
    println!("  {} pathfinder stats", "3.".blue());

    Ok(())
}
