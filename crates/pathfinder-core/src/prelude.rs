//! Pathfinder Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use pathfinder_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    hops, Constraints, EdgeMetadata, Hops, MetricValue, NodeId, PathResult,
};

pub use crate::snapshot::{Interface, Link, Switch, TopologyEvent, TopologySnapshot};

pub use crate::metric::{Comparison, FilterPipeline, MetricFilter, MetricRegistry, ValueKind};

pub use crate::cost::{CostModel, PathRecord};

pub use crate::config::SearchConfig;

// Re-export the graph traits
pub use crate::topology::{EdgeLookup, TopologyGraph};

// Re-export error types
pub use crate::error::{ErrorKind, PathError, Result};
