//! Topology state shared between the update path and path queries.
//!
//! One writer (topology updates) and many readers (queries). A rebuild
//! builds the new graph outside the state lock and swaps it in, so readers
//! see either the old topology or the new one, never a half-built graph.
//! Updates are serialized among themselves: they apply in the order they
//! acquire the update lock, and a slow build cannot land after a later one.

use crate::preferences::LinkPreferences;
use crate::search::{ConstrainedQuery, PathSearch};
use crate::topology_impl::PetTopologyGraph;
use pathfinder_core::config::SearchConfig;
use pathfinder_core::cost::CostModel;
use pathfinder_core::error::{PathError, Result};
use pathfinder_core::snapshot::{TopologyEvent, TopologySnapshot};
use pathfinder_core::topology::{EdgeLookup, TopologyGraph};
use pathfinder_core::types::{EdgeMetadata, Hops, PathResult};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Graph plus the snapshot it was built from.
#[derive(Debug, Clone, Default)]
pub struct TopologyState {
    pub graph: PetTopologyGraph,
    pub snapshot: Option<TopologySnapshot>,
}

/// Parameters of an unconstrained best-path query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestPathQuery {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub weight: Option<String>,
    /// Falls back to the configured `max_paths`.
    #[serde(default)]
    pub max_paths: Option<usize>,
    #[serde(flatten)]
    pub preferences: LinkPreferences,
}

impl BestPathQuery {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn weight(mut self, attribute: impl Into<String>) -> Self {
        self.weight = Some(attribute.into());
        self
    }

    pub fn max_paths(mut self, k: usize) -> Self {
        self.max_paths = Some(k);
        self
    }

    pub fn desire(mut self, link_id: impl Into<String>) -> Self {
        self.preferences = self.preferences.desire(link_id);
        self
    }

    pub fn avoid(mut self, link_id: impl Into<String>) -> Self {
        self.preferences = self.preferences.avoid(link_id);
        self
    }
}

/// Size of the current topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyStats {
    pub nodes: usize,
    pub edges: usize,
    pub switches: usize,
    pub links: usize,
    pub active_links: usize,
}

/// Thread-safe topology with the path search bound to it.
#[derive(Debug, Default)]
pub struct SharedTopology {
    state: RwLock<TopologyState>,
    /// Held by writers from build to swap.
    updates: Mutex<()>,
    search: PathSearch,
}

impl SharedTopology {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_search(PathSearch::new(config))
    }

    pub fn with_search(search: PathSearch) -> Self {
        Self {
            state: RwLock::new(TopologyState::default()),
            updates: Mutex::new(()),
            search,
        }
    }

    pub fn search(&self) -> &PathSearch {
        &self.search
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TopologyState>> {
        self.state.read().map_err(|_| PathError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TopologyState>> {
        self.state.write().map_err(|_| PathError::LockPoisoned)
    }

    fn serialize_updates(&self) -> Result<MutexGuard<'_, ()>> {
        self.updates.lock().map_err(|_| PathError::LockPoisoned)
    }

    /// Replace the topology. On error the previous one stays in place.
    pub fn rebuild(&self, snapshot: TopologySnapshot) -> Result<()> {
        let _update = self.serialize_updates()?;
        let graph = PetTopologyGraph::from_snapshot(&snapshot)?;
        let mut state = self.write()?;
        state.graph = graph;
        state.snapshot = Some(snapshot);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let _update = self.serialize_updates()?;
        let mut state = self.write()?;
        state.graph.clear();
        state.snapshot = None;
        Ok(())
    }

    /// Apply a topology-updated event.
    ///
    /// Returns `false` when the event carries no topology, which leaves
    /// the graph as it was.
    pub fn handle_update(&self, event: TopologyEvent) -> Result<bool> {
        let Some(snapshot) = event.topology else {
            debug!("Topology event without topology, ignored");
            return Ok(false);
        };

        match self.rebuild(snapshot) {
            Ok(()) => {
                debug!("Topology graph updated.");
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Topology update rejected");
                Err(e)
            }
        }
    }

    /// Up to `k` shortest paths, hop count when `weight` is `None`.
    pub fn shortest_paths(
        &self,
        source: &str,
        destination: &str,
        weight: Option<&str>,
        k: usize,
    ) -> Result<Vec<Hops>> {
        let state = self.read()?;
        Ok(self.search.shortest_paths(&state.graph, source, destination, weight, k))
    }

    /// Shortest paths filtered by link preferences, each with its cost.
    pub fn best_paths(&self, query: &BestPathQuery) -> Result<Vec<PathResult>> {
        let state = self.read()?;
        let k = query.max_paths.unwrap_or(self.search.config().max_paths);
        let weight = query.weight.as_deref();

        let paths = self
            .search
            .shortest_paths(&state.graph, &query.source, &query.destination, weight, k);
        let paths = query.preferences.retain(paths, state.snapshot.as_ref());

        let cost = CostModel::for_attribute(weight, self.search.config().default_weight);
        Ok(cost.annotate_all(&state.graph, paths))
    }

    pub fn constrained_shortest_paths(&self, query: &ConstrainedQuery) -> Result<Vec<PathResult>> {
        let state = self.read()?;
        self.search.constrained_shortest_paths(&state.graph, query)
    }

    /// Constrained paths, with a cost attached when the query names a weight.
    pub fn best_constrained_paths(&self, query: &ConstrainedQuery) -> Result<Vec<PathResult>> {
        let state = self.read()?;
        let results = self.search.constrained_shortest_paths(&state.graph, query)?;

        let Some(weight) = query.weight.as_deref() else {
            return Ok(results);
        };
        let cost = CostModel::new(weight, self.search.config().default_weight);
        Ok(cost.annotate_all(&state.graph, results))
    }

    /// Metadata of the edge between `a` and `b`, in either direction.
    pub fn edge_metadata(&self, a: &str, b: &str) -> Result<Option<EdgeMetadata>> {
        let state = self.read()?;
        Ok(state.graph.edge_metadata(a, b).cloned())
    }

    pub fn stats(&self) -> Result<TopologyStats> {
        let state = self.read()?;
        let (switches, links, active_links) = match &state.snapshot {
            Some(s) => (s.switches.len(), s.links.len(), s.active_links().count()),
            None => (0, 0, 0),
        };
        Ok(TopologyStats {
            nodes: state.graph.node_count(),
            edges: state.graph.edge_count(),
            switches,
            links,
            active_links,
        })
    }
}
