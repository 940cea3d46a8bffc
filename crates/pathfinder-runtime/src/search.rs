//! Path queries against a topology graph.
//!
//! Two kinds of query:
//!
//! 1. **Unconstrained k-shortest** - up to `k` loopless paths ordered by
//!    total weight.
//! 2. **Constrained with flexibility** - every edge must satisfy the
//!    mandatory constraints; flexible constraints are tried all together
//!    first and then relaxed, subset by subset, until some subset of a
//!    given size yields a path.
//!
//! Searches hold no state between calls. Each one copies the edges it may
//! use into a [`SearchGraph`] before running.

use crate::algo::{SearchGraph, WeightRule};
use pathfinder_core::config::SearchConfig;
use pathfinder_core::error::{PathError, Result};
use pathfinder_core::metric::{FilterPipeline, MetricRegistry};
use pathfinder_core::topology::TopologyGraph;
use pathfinder_core::types::{Constraints, EdgeMetadata, Hops, MetricValue, NodeId, PathResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hard ceiling on flexible constraints whatever the config says; a query
/// runs up to 2^n subgraph searches.
const MAX_FLEXIBLE_BITS: usize = 16;

/// Parameters of a constrained path query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstrainedQuery {
    pub source: String,
    pub destination: String,
    /// Must hold on every edge of a returned path.
    #[serde(default)]
    pub mandatory: Constraints,
    /// Tried first, relaxed when no path satisfies them.
    #[serde(default)]
    pub flexible: Constraints,
    /// Fewest flexible constraints a result must satisfy. Clamped to `[0, |flexible|]`.
    #[serde(default)]
    pub minimum_hits: Option<i64>,
    /// Edge attribute to minimise; hop count when absent.
    #[serde(default)]
    pub weight: Option<String>,
}

impl ConstrainedQuery {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn mandatory(mut self, metric: impl Into<String>, threshold: impl Into<MetricValue>) -> Self {
        self.mandatory.insert(metric.into(), threshold.into());
        self
    }

    pub fn flexible(mut self, metric: impl Into<String>, threshold: impl Into<MetricValue>) -> Self {
        self.flexible.insert(metric.into(), threshold.into());
        self
    }

    pub fn minimum_hits(mut self, hits: i64) -> Self {
        self.minimum_hits = Some(hits);
        self
    }

    pub fn weight(mut self, attribute: impl Into<String>) -> Self {
        self.weight = Some(attribute.into());
        self
    }
}

/// Stateless path search bound to a metric registry.
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    registry: MetricRegistry,
    config: SearchConfig,
}

impl PathSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            registry: MetricRegistry::default(),
            config,
        }
    }

    pub fn with_registry(registry: MetricRegistry, config: SearchConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn weight_rule<'a>(&self, weight: Option<&'a str>) -> WeightRule<'a> {
        WeightRule::attribute(weight, self.config.default_weight)
    }

    /// Up to `k` paths from `source` to `destination` in increasing total weight.
    ///
    /// Absent endpoints and disconnected endpoints both give an empty list.
    pub fn shortest_paths<G: TopologyGraph + ?Sized>(
        &self,
        graph: &G,
        source: &str,
        destination: &str,
        weight: Option<&str>,
        k: usize,
    ) -> Vec<Hops> {
        let rule = self.weight_rule(weight);
        let mut search = SearchGraph::new();
        for node in graph.nodes() {
            search.add_node(&node);
        }
        for (a, b, metadata) in graph.edges() {
            search.add_edge(&a, &b, rule.resolve(metadata));
        }

        let paths = search.k_shortest_paths(source, destination, k);
        debug!(%source, %destination, weight = ?weight, k, found = paths.len(), "shortest paths");
        paths
    }

    /// Best paths under mandatory and flexible constraints.
    ///
    /// Levels are scanned from "all flexible constraints" down to
    /// `minimum_hits`; the first level with any path is the answer, with one
    /// result per path per qualifying subset. Threshold type errors abort
    /// the query before any search runs.
    pub fn constrained_shortest_paths<G: TopologyGraph + ?Sized>(
        &self,
        graph: &G,
        query: &ConstrainedQuery,
    ) -> Result<Vec<PathResult>> {
        let flexible: Vec<(&String, &MetricValue)> = query.flexible.iter().collect();
        let n = flexible.len();
        let max = self.config.max_flexible.min(MAX_FLEXIBLE_BITS);
        if n > max {
            return Err(PathError::TooManyFlexible { count: n, max });
        }

        let mandatory = self.registry.compile(&query.mandatory)?;
        let flexible_filters = flexible
            .iter()
            .map(|(metric, threshold)| {
                let single: Constraints = [((*metric).clone(), (*threshold).clone())].into_iter().collect();
                self.registry.compile(&single)
            })
            .collect::<Result<Vec<FilterPipeline<'_>>>>()?;

        let edges = graph.edges();
        let first_pass: Vec<&(NodeId, NodeId, &EdgeMetadata)> = mandatory.filter(edges.iter());
        let minimum_hits = query.minimum_hits.unwrap_or(0).clamp(0, n as i64) as usize;
        let rule = self.weight_rule(query.weight.as_deref());

        for hits in (minimum_hits..=n).rev() {
            let mut results = Vec::new();

            for mask in subsets(n, hits) {
                let combo = selected(mask, n)
                    .fold(FilterPipeline::pass_through(), |acc, i| acc.and(&flexible_filters[i]));
                let links = combo.filter(first_pass.iter().copied());
                let subgraph = SearchGraph::from_edges(links.iter().map(|(a, b, meta)| (a, b, *meta)), rule);

                let paths = self.paths_within(graph, &subgraph, &query.source, &query.destination);
                if paths.is_empty() {
                    continue;
                }

                let mut metrics = query.mandatory.clone();
                for i in selected(mask, n) {
                    metrics.insert(flexible[i].0.clone(), flexible[i].1.clone());
                }
                results.extend(
                    paths
                        .into_iter()
                        .map(|hops| PathResult::with_metrics(hops, metrics.clone())),
                );
            }

            debug!(
                source = %query.source,
                destination = %query.destination,
                hits,
                found = results.len(),
                "constrained search level"
            );
            if !results.is_empty() {
                return Ok(results);
            }
        }

        Ok(Vec::new())
    }

    /// Equal-shortest paths inside a constrained subgraph.
    ///
    /// A node that lost all its qualifying edges is absent from the
    /// subgraph; it still reaches itself if it exists in the full graph.
    fn paths_within<G: TopologyGraph + ?Sized>(
        &self,
        graph: &G,
        subgraph: &SearchGraph,
        source: &str,
        destination: &str,
    ) -> Vec<Hops> {
        if !subgraph.contains(source) || !subgraph.contains(destination) {
            if source == destination && graph.contains_node(source) {
                return vec![vec![NodeId::from(source)]];
            }
            return Vec::new();
        }
        subgraph.all_shortest_paths(source, destination)
    }
}

/// Bitmasks over `n` items with exactly `size` bits set, ascending.
///
/// Walks from one mask to the next of equal popcount (Gosper's hack)
/// instead of scanning all 2^n masks.
fn subsets(n: usize, size: usize) -> impl Iterator<Item = u64> {
    let limit = 1u64 << n;
    let first = (size <= n).then(|| (1u64 << size) - 1);
    std::iter::successors(first, move |&mask| {
        if mask == 0 {
            return None;
        }
        let lowest = mask & mask.wrapping_neg();
        let ripple = mask + lowest;
        let next = (((ripple ^ mask) >> 2) / lowest) | ripple;
        (next < limit).then_some(next)
    })
}

/// Indices of the set bits in `mask`.
fn selected(mask: u64, n: usize) -> impl Iterator<Item = usize> {
    (0..n).filter(move |i| mask & (1u64 << i) != 0)
}
