//! CLI command implementations.

pub mod constrained;
pub mod init;
pub mod metadata;
pub mod paths;
pub mod stats;

use anyhow::{Context, Result};
use pathfinder::prelude::*;
use std::path::Path;

use crate::config::Config;

/// Load the config and build the shared topology from its snapshot file.
///
/// `snapshot` overrides the file named in pathfinder.toml.
pub fn load_topology(snapshot: Option<&Path>) -> Result<SharedTopology> {
    let config = Config::load()?;
    let path = snapshot
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.snapshot_path());

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read topology: {}", path.display()))?;
    let snapshot = TopologySnapshot::from_json(&json)?;

    let topology = SharedTopology::new(config.search);
    topology.handle_update(TopologyEvent::updated(snapshot))?;
    Ok(topology)
}

/// `S1 → S1:1 → S2:1 → S2`
pub fn format_hops(hops: &[NodeId]) -> String {
    hops.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" → ")
}
