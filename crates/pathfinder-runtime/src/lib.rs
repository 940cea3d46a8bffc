//! # Pathfinder Runtime
//!
//! Topology graph, path search and shared state.
//!
//! The runtime owns the graph built from the latest topology snapshot and
//! answers path queries against it. Updates rebuild the graph from scratch;
//! queries only ever read it.

pub mod algo;
pub mod preferences;
pub mod prelude;
pub mod search;
pub mod shared;
pub mod topology_impl;
