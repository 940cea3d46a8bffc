//! # Pathfinder
//!
//! Constrained path computation over switch/interface/link network topologies.
//!
//! Pathfinder keeps an undirected graph built from the latest topology
//! snapshot: every switch and interface is a node, every interface is tied
//! to its switch, and every active link joins its two interfaces with the
//! link's metadata on the edge. Queries return loopless paths as lists of
//! node ids.
//!
//! ## Quick Start
//!
//! ```rust
//! use pathfinder::prelude::*;
//! use serde_json::json;
//!
//! let snapshot = TopologySnapshot::from_value(json!({
//!     "switches": {
//!         "S1": {"id": "S1", "interfaces": {"S1:1": {"id": "S1:1"}}},
//!         "S2": {"id": "S2", "interfaces": {"S2:1": {"id": "S2:1"}}}
//!     },
//!     "links": {
//!         "1": {
//!             "endpoint_a": {"id": "S1:1"},
//!             "endpoint_b": {"id": "S2:1"},
//!             "active": true,
//!             "metadata": {"bandwidth": 100, "delay": 5}
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let topology = SharedTopology::default();
//! topology.handle_update(TopologyEvent::updated(snapshot)).unwrap();
//!
//! // Best paths by hop count
//! let best = topology.best_paths(&BestPathQuery::new("S1", "S2")).unwrap();
//! assert_eq!(best[0].hops, hops(["S1", "S1:1", "S2:1", "S2"]));
//! assert_eq!(best[0].cost, Some(3.0));
//!
//! // Bandwidth of at least 400 is relaxed away when nothing satisfies it
//! let query = ConstrainedQuery::new("S1", "S2").flexible("bandwidth", 400.0);
//! let found = topology.constrained_shortest_paths(&query).unwrap();
//! assert_eq!(found.len(), 1);
//! assert!(found[0].metrics.as_ref().unwrap().is_empty());
//! ```
//!
//! ## Architecture
//!
//! - [`pathfinder_core`] - Snapshot model, metric predicates, cost model, errors
//! - [`pathfinder_runtime`] - Petgraph topology, path algorithms, shared state
//!
//! ## Constraints
//!
//! | Metric | Edge must be | Threshold |
//! |--------|--------------|-----------|
//! | bandwidth | at least | number |
//! | reliability | at least | number |
//! | delay | at most | number |
//! | utilization | at most | number |
//! | priority | at most | number |
//! | ownership | equal to, or contain | string |
//!
//! Edges without the attribute are not constrained by it. Unknown metric
//! names are ignored.

// Re-export all subcrates
pub use pathfinder_core as core;
pub use pathfinder_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use pathfinder::prelude::*;
/// ```
pub mod prelude {
    pub use pathfinder_runtime::prelude::*;
}
