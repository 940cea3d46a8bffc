//! Concrete implementation of the TopologyGraph trait using petgraph.
//!
//! This implementation uses petgraph's undirected `Graph` as the backing
//! store with a HashMap index for O(1) node lookup by identifier.
//! The graph is never patched: every topology update rebuilds it.

use pathfinder_core::error::Result;
use pathfinder_core::snapshot::TopologySnapshot;
use pathfinder_core::topology::{EdgeLookup, TopologyGraph};
use pathfinder_core::types::{EdgeMetadata, NodeId};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::debug;

/// Petgraph-backed implementation of the topology graph.
#[derive(Debug, Clone)]
pub struct PetTopologyGraph {
    graph: Graph<NodeId, EdgeMetadata, petgraph::Undirected>,
    /// Map from our NodeId to petgraph's internal index.
    node_index: HashMap<NodeId, NodeIndex>,
}

impl PetTopologyGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new_undirected(),
            node_index: HashMap::new(),
        }
    }

    /// Build a graph straight from a snapshot.
    pub fn from_snapshot(snapshot: &TopologySnapshot) -> Result<Self> {
        let mut graph = Self::new();
        graph.rebuild(snapshot)?;
        Ok(graph)
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(id) {
            return idx;
        }
        let node = NodeId::from(id);
        let idx = self.graph.add_node(node.clone());
        self.node_index.insert(node, idx);
        idx
    }

    /// Add an edge, or merge `metadata` into the existing one.
    fn merge_edge(&mut self, a: &str, b: &str, metadata: &EdgeMetadata) {
        let a_idx = self.ensure_node(a);
        let b_idx = self.ensure_node(b);

        if let Some(edge_idx) = self.graph.find_edge(a_idx, b_idx) {
            self.graph[edge_idx].extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
        } else {
            self.graph.add_edge(a_idx, b_idx, metadata.clone());
        }
    }
}

impl Default for PetTopologyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeLookup for PetTopologyGraph {
    fn edge_metadata(&self, a: &str, b: &str) -> Option<&EdgeMetadata> {
        let a_idx = self.node_index.get(a)?;
        let b_idx = self.node_index.get(b)?;
        let edge_idx = self.graph.find_edge(*a_idx, *b_idx)?;
        Some(&self.graph[edge_idx])
    }
}

impl TopologyGraph for PetTopologyGraph {
    fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
    }

    fn rebuild(&mut self, snapshot: &TopologySnapshot) -> Result<()> {
        snapshot.validate()?;
        self.clear();

        let containment = EdgeMetadata::new();
        for switch in snapshot.switches.values() {
            self.ensure_node(&switch.id);
            for interface in switch.interfaces.values() {
                self.merge_edge(&switch.id, &interface.id, &containment);
            }
        }

        let mut skipped = 0usize;
        for link in snapshot.links.values() {
            if !link.is_active() {
                skipped += 1;
                continue;
            }
            self.merge_edge(&link.endpoint_a.id, &link.endpoint_b.id, &link.metadata);
        }

        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            inactive_links = skipped,
            "Topology graph rebuilt"
        );
        Ok(())
    }

    fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    fn nodes(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    fn edges(&self) -> Vec<(NodeId, NodeId, &EdgeMetadata)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].clone(),
                    self.graph[edge.target()].clone(),
                    edge.weight(),
                )
            })
            .collect()
    }

    fn neighbors(&self, node: &str) -> Vec<(NodeId, &EdgeMetadata)> {
        let Some(&node_idx) = self.node_index.get(node) else {
            return Vec::new();
        };

        self.graph
            .edges(node_idx)
            .map(|edge| {
                let other_idx = if edge.source() == node_idx {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other_idx].clone(), edge.weight())
            })
            .collect()
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinder_core::error::PathError;
    use pathfinder_core::snapshot::{Link, Switch};
    use pathfinder_core::types::MetricValue;

    fn two_switches() -> TopologySnapshot {
        TopologySnapshot::new()
            .with_switch(Switch::new("S1").with_interface("S1:1").with_interface("S1:2"))
            .with_switch(Switch::new("S2").with_interface("S2:1"))
            .with_link(
                "1",
                Link::new("S1:1", "S2:1")
                    .with_metadata("bandwidth", 100.0)
                    .with_metadata("ownership", "A"),
            )
    }

    #[test]
    fn rebuild_adds_switches_interfaces_and_links() {
        let graph = PetTopologyGraph::from_snapshot(&two_switches()).unwrap();

        assert_eq!(graph.node_count(), 5);
        // 3 containment edges + 1 link
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.edge_metadata("S1", "S1:2").unwrap().is_empty());

        let meta = graph.edge_metadata("S2:1", "S1:1").unwrap();
        assert_eq!(meta["bandwidth"], MetricValue::Number(100.0));
        assert_eq!(meta["ownership"], MetricValue::Text("A".into()));
    }

    #[test]
    fn inactive_links_produce_no_edge() {
        let snapshot = two_switches().with_link("2", Link::new("S1:2", "S2:1").inactive());
        let graph = PetTopologyGraph::from_snapshot(&snapshot).unwrap();

        assert!(graph.edge_metadata("S1:2", "S2:1").is_none());
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn rebuild_replaces_instead_of_merging() {
        let mut graph = PetTopologyGraph::from_snapshot(&two_switches()).unwrap();

        let other = TopologySnapshot::new()
            .with_switch(Switch::new("S3").with_interface("S3:1"))
            .with_switch(Switch::new("S4").with_interface("S4:1"))
            .with_link("9", Link::new("S3:1", "S4:1"));
        graph.rebuild(&other).unwrap();

        assert!(!graph.contains_node("S1"));
        assert!(!graph.contains_node("S1:1"));
        assert!(graph.edge_metadata("S1:1", "S2:1").is_none());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn malformed_snapshot_leaves_graph_untouched() {
        let mut graph = PetTopologyGraph::from_snapshot(&two_switches()).unwrap();

        let broken = TopologySnapshot::new().with_link("x", Link::new("", "S2:1"));
        let err = graph.rebuild(&broken).unwrap_err();

        assert!(matches!(err, PathError::MalformedSnapshot(_)));
        assert_eq!(graph.node_count(), 5);
        assert!(graph.edge_metadata("S1:1", "S2:1").is_some());
    }

    #[test]
    fn link_endpoints_outside_switches_become_nodes() {
        let snapshot = TopologySnapshot::new().with_link("1", Link::new("User1", "User2"));
        let graph = PetTopologyGraph::from_snapshot(&snapshot).unwrap();
        assert!(graph.contains_node("User1"));
        assert!(graph.contains_node("User2"));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut graph = PetTopologyGraph::from_snapshot(&two_switches()).unwrap();
        graph.clear();
        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.nodes().is_empty());
    }

    #[test]
    fn neighbors_of_a_switch_are_its_interfaces() {
        let graph = PetTopologyGraph::from_snapshot(&two_switches()).unwrap();
        let mut neighbors: Vec<_> = graph
            .neighbors("S1")
            .into_iter()
            .map(|(id, _)| id.0)
            .collect();
        neighbors.sort();
        assert_eq!(neighbors, vec!["S1:1", "S1:2"]);
        assert!(graph.neighbors("missing").is_empty());
    }
}
