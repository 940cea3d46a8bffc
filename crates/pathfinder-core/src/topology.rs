//! Topology - the network graph structure.
//!
//! Nodes are switches and interfaces; edges are switch↔interface
//! containment and the physical links between interfaces. The graph is
//! derived wholesale from a [`TopologySnapshot`] on every update.

use crate::error::Result;
use crate::snapshot::TopologySnapshot;
use crate::types::{EdgeMetadata, NodeId};

/// Read access to edge metadata between two nodes.
///
/// Kept separate from [`TopologyGraph`] so cost accounting only needs
/// a lookup, not a full graph.
pub trait EdgeLookup {
    /// Metadata of the edge between `a` and `b`, if that edge exists.
    fn edge_metadata(&self, a: &str, b: &str) -> Option<&EdgeMetadata>;
}

/// A handle to the topology graph.
///
/// This is a trait rather than a concrete type so that different
/// backends can sit behind the path search.
pub trait TopologyGraph: EdgeLookup {
    /// Remove all nodes and edges. Idempotent.
    fn clear(&mut self);

    /// Replace the whole graph with the one implied by `snapshot`.
    ///
    /// Only active links become edges. On error the graph is left unchanged.
    fn rebuild(&mut self, snapshot: &TopologySnapshot) -> Result<()>;

    fn contains_node(&self, id: &str) -> bool;

    /// Get all node IDs.
    fn nodes(&self) -> Vec<NodeId>;

    /// Get all edges.
    fn edges(&self) -> Vec<(NodeId, NodeId, &EdgeMetadata)>;

    /// Get all neighbors of a node.
    fn neighbors(&self, node: &str) -> Vec<(NodeId, &EdgeMetadata)>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}
