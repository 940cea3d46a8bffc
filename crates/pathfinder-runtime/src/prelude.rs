//! Pathfinder Runtime Prelude - convenient imports for common usage.
//!
//! ```rust
//! use pathfinder_runtime::prelude::*;
//! ```

// Re-export the graph
pub use crate::topology_impl::PetTopologyGraph;

// Re-export queries
pub use crate::preferences::LinkPreferences;
pub use crate::search::{ConstrainedQuery, PathSearch};

// Re-export shared state
pub use crate::shared::{BestPathQuery, SharedTopology, TopologyState, TopologyStats};

// Re-export from core
pub use pathfinder_core::prelude::*;
