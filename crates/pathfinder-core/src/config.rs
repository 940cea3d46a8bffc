//! Search configuration shared by the runtime and front ends.

use serde::{Deserialize, Serialize};

/// Tunables for path queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Weight used for an edge that lacks the requested weight attribute.
    #[serde(default = "default_weight")]
    pub default_weight: f64,
    /// Number of paths returned by a best-path query when the caller gives none.
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
    /// Upper bound on flexible constraints per query (the search visits 2^n subsets).
    #[serde(default = "default_max_flexible")]
    pub max_flexible: usize,
}

fn default_weight() -> f64 { 1.0 }
fn default_max_paths() -> usize { 10 }
fn default_max_flexible() -> usize { 16 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_weight: default_weight(),
            max_paths: default_max_paths(),
            max_flexible: default_max_flexible(),
        }
    }
}
