//! # Pathfinder Core
//!
//! Core traits and types for constrained path computation over network
//! topologies.
//!
//! - [`snapshot`] - the read-only switch/interface/link view the graph is built from
//! - [`topology`] - the `TopologyGraph` trait the searches run against
//! - [`metric`] - typed metric predicates and the registry that binds them
//! - [`cost`] - path cost accounting over a weight attribute
//! - [`error`] - the error taxonomy surfaced to callers
//!
//! ## Quick Start
//!
//! ```rust
//! use pathfinder_core::prelude::*;
//!
//! let registry = MetricRegistry::default();
//! let mut constraints = Constraints::new();
//! constraints.insert("bandwidth".into(), MetricValue::Number(100.0));
//!
//! let pipeline = registry.compile(&constraints).unwrap();
//! let mut fast = EdgeMetadata::new();
//! fast.insert("bandwidth".into(), MetricValue::Number(400.0));
//! assert!(pipeline.admits(&fast));
//! ```

pub mod config;
pub mod cost;
pub mod error;
pub mod metric;
pub mod prelude;
pub mod snapshot;
pub mod topology;
pub mod types;
