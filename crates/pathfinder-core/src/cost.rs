//! Path cost accounting.
//!
//! The cost of a hop sequence is the sum of a named weight attribute over
//! its consecutive edges. Edges that do not carry a usable weight count as
//! the configured default.

use crate::error::{PathError, Result};
use crate::topology::EdgeLookup;
use crate::types::{Constraints, Hops, NodeId, PathResult};
use serde_json::Value;

/// A path as produced by one of the searches, before cost annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum PathRecord {
    BareHops(Hops),
    HopsWithMetrics { hops: Hops, metrics: Constraints },
}

impl PathRecord {
    pub fn hops(&self) -> &Hops {
        match self {
            PathRecord::BareHops(hops) => hops,
            PathRecord::HopsWithMetrics { hops, .. } => hops,
        }
    }

    /// Read a record from untyped JSON: either an array of node ids,
    /// or an object with `hops` and optional `metrics`.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => {
                let hops: Hops = serde_json::from_value(value)
                    .map_err(|e| PathError::MalformedPathRecord(e.to_string()))?;
                Ok(PathRecord::BareHops(hops))
            }
            Value::Object(mut map) => {
                let hops = map
                    .remove("hops")
                    .ok_or_else(|| PathError::MalformedPathRecord("missing hops".into()))?;
                let hops: Hops = serde_json::from_value(hops)
                    .map_err(|e| PathError::MalformedPathRecord(e.to_string()))?;
                match map.remove("metrics") {
                    Some(metrics) => {
                        let metrics: Constraints = serde_json::from_value(metrics)
                            .map_err(|e| PathError::MalformedPathRecord(e.to_string()))?;
                        Ok(PathRecord::HopsWithMetrics { hops, metrics })
                    }
                    None => Ok(PathRecord::BareHops(hops)),
                }
            }
            other => Err(PathError::MalformedPathRecord(format!(
                "expected a hop list or a path record, got {}",
                other
            ))),
        }
    }
}

impl From<Hops> for PathRecord {
    fn from(hops: Hops) -> Self {
        PathRecord::BareHops(hops)
    }
}

impl From<PathResult> for PathRecord {
    fn from(result: PathResult) -> Self {
        match result.metrics {
            Some(metrics) => PathRecord::HopsWithMetrics {
                hops: result.hops,
                metrics,
            },
            None => PathRecord::BareHops(result.hops),
        }
    }
}

/// Sums a weight attribute along a path.
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    /// `None` counts every hop as one.
    weight: Option<String>,
    default_weight: f64,
}

impl CostModel {
    pub fn new(weight: impl Into<String>, default_weight: f64) -> Self {
        Self {
            weight: Some(weight.into()),
            default_weight,
        }
    }

    pub fn hop_count() -> Self {
        Self {
            weight: None,
            default_weight: 1.0,
        }
    }

    /// Weighted by `weight` when given, hop count otherwise.
    pub fn for_attribute(weight: Option<&str>, default_weight: f64) -> Self {
        match weight {
            Some(weight) => Self::new(weight, default_weight),
            None => Self::hop_count(),
        }
    }

    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    /// Weight of the edge between `a` and `b`.
    pub fn edge_cost<G: EdgeLookup + ?Sized>(&self, graph: &G, a: &str, b: &str) -> f64 {
        let Some(weight) = &self.weight else {
            return 1.0;
        };
        graph
            .edge_metadata(a, b)
            .and_then(|meta| meta.get(weight))
            .and_then(|value| value.as_f64())
            .unwrap_or(self.default_weight)
    }

    pub fn path_cost<G: EdgeLookup + ?Sized>(&self, graph: &G, hops: &[NodeId]) -> f64 {
        hops.windows(2)
            .map(|pair| self.edge_cost(graph, pair[0].as_str(), pair[1].as_str()))
            .sum()
    }

    /// Attach the cost to a record, keeping its metrics.
    pub fn annotate<G: EdgeLookup + ?Sized>(&self, graph: &G, record: PathRecord) -> PathResult {
        let cost = self.path_cost(graph, record.hops());
        let mut result = match record {
            PathRecord::BareHops(hops) => PathResult::new(hops),
            PathRecord::HopsWithMetrics { hops, metrics } => PathResult::with_metrics(hops, metrics),
        };
        result.cost = Some(cost);
        result
    }

    pub fn annotate_all<G, I>(&self, graph: &G, records: I) -> Vec<PathResult>
    where
        G: EdgeLookup + ?Sized,
        I: IntoIterator,
        I::Item: Into<PathRecord>,
    {
        records
            .into_iter()
            .map(|record| self.annotate(graph, record.into()))
            .collect()
    }

    /// Annotate an untyped record.
    pub fn annotate_value<G: EdgeLookup + ?Sized>(&self, graph: &G, value: Value) -> Result<PathResult> {
        Ok(self.annotate(graph, PathRecord::from_value(value)?))
    }
}
