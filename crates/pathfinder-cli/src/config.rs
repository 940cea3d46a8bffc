//! Configuration management for Pathfinder CLI.

use anyhow::{Context, Result};
use pathfinder::prelude::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "pathfinder.toml";

/// Pathfinder project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub topology: TopologyConfig,
    /// Directory the config was read from; relative paths resolve against it.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Topology snapshot JSON file.
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
}

fn default_snapshot() -> PathBuf { PathBuf::from("topology.json") }

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
        }
    }
}

impl Config {
    /// Load config from pathfinder.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match find_config_file(&cwd) {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Snapshot file, resolved against the config's directory.
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(dir) if self.topology.snapshot.is_relative() => dir.join(&self.topology.snapshot),
            _ => self.topology.snapshot.clone(),
        }
    }
}

/// Find pathfinder.toml in `start` or its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.search.max_paths = 3;
        config.topology.snapshot = PathBuf::from("net/snapshot.json");
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.max_paths, 3);
        assert_eq!(loaded.search.max_flexible, 16);
        assert_eq!(loaded.snapshot_path(), dir.path().join("net/snapshot.json"));
    }

    #[test]
    fn missing_sections_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[search]\ndefault_weight = 2.5\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.default_weight, 2.5);
        assert_eq!(loaded.search.max_paths, 10);
        assert_eq!(loaded.topology.snapshot, PathBuf::from("topology.json"));
    }

    #[test]
    fn config_is_found_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default().save(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(
            find_config_file(&nested),
            Some(dir.path().join(CONFIG_FILE))
        );
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[search\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
