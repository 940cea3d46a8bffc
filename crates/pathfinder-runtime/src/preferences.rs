//! Desired and undesired links for best-path answers.
//!
//! Links are named by their snapshot id. A path traverses a link when two
//! consecutive hops are the link's endpoints, in either order.

use pathfinder_core::snapshot::{Link, TopologySnapshot};
use pathfinder_core::types::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Link ids a path must, and must not, traverse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreferences {
    #[serde(default)]
    pub desired: Vec<String>,
    #[serde(default)]
    pub undesired: Vec<String>,
}

impl LinkPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn desire(mut self, link_id: impl Into<String>) -> Self {
        self.desired.push(link_id.into());
        self
    }

    pub fn avoid(mut self, link_id: impl Into<String>) -> Self {
        self.undesired.push(link_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.desired.is_empty() && self.undesired.is_empty()
    }

    /// Keep the paths that traverse every desired link and no undesired one.
    ///
    /// A desired link missing from the snapshot makes every path fail;
    /// an undesired link missing from the snapshot is ignored.
    pub fn retain<P: AsRef<[NodeId]>>(&self, paths: Vec<P>, snapshot: Option<&TopologySnapshot>) -> Vec<P> {
        if self.is_empty() {
            return paths;
        }

        let lookup = |id: &String| snapshot.and_then(|s| s.links.get(id));

        let mut desired = Vec::with_capacity(self.desired.len());
        for id in &self.desired {
            match lookup(id) {
                Some(link) => desired.push(link),
                None => {
                    debug!(link = %id, "desired link not in topology");
                    return Vec::new();
                }
            }
        }
        let undesired: Vec<&Link> = self.undesired.iter().filter_map(lookup).collect();

        paths
            .into_iter()
            .filter(|path| {
                let hops = path.as_ref();
                desired.iter().all(|link| traverses(hops, link))
                    && !undesired.iter().any(|link| traverses(hops, link))
            })
            .collect()
    }
}

fn traverses(hops: &[NodeId], link: &Link) -> bool {
    hops.windows(2)
        .any(|pair| link.connects(pair[0].as_str(), pair[1].as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinder_core::types::{hops, Hops};

    fn snapshot() -> TopologySnapshot {
        TopologySnapshot::new()
            .with_link("1", Link::new("S1:1", "S2:1"))
            .with_link("2", Link::new("S1:2", "S3:1"))
    }

    fn paths() -> Vec<Hops> {
        vec![
            hops(["S1", "S1:1", "S2:1", "S2"]),
            hops(["S1", "S1:2", "S3:1", "S3"]),
        ]
    }

    #[test]
    fn no_preferences_keeps_everything() {
        assert_eq!(LinkPreferences::new().retain(paths(), None).len(), 2);
    }

    #[test]
    fn desired_link_selects_paths_in_either_direction() {
        let prefs = LinkPreferences::new().desire("1");
        let kept = prefs.retain(paths(), Some(&snapshot()));
        assert_eq!(kept, vec![hops(["S1", "S1:1", "S2:1", "S2"])]);

        let reversed = vec![hops(["S2", "S2:1", "S1:1", "S1"])];
        assert_eq!(prefs.retain(reversed, Some(&snapshot())).len(), 1);
    }

    #[test]
    fn undesired_link_removes_paths() {
        let prefs = LinkPreferences::new().avoid("2");
        let kept = prefs.retain(paths(), Some(&snapshot()));
        assert_eq!(kept, vec![hops(["S1", "S1:1", "S2:1", "S2"])]);
    }

    #[test]
    fn unknown_desired_link_empties_the_answer() {
        let prefs = LinkPreferences::new().desire("404");
        assert!(prefs.retain(paths(), Some(&snapshot())).is_empty());
        assert!(LinkPreferences::new().desire("1").retain(paths(), None).is_empty());
    }

    #[test]
    fn unknown_undesired_link_is_ignored() {
        let prefs = LinkPreferences::new().avoid("404");
        assert_eq!(prefs.retain(paths(), Some(&snapshot())).len(), 2);
    }
}
