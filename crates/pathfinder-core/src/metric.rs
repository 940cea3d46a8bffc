//! Metric filters - typed predicates over a single link metric.
//!
//! Each known metric is bound to one [`Comparison`] and one expected
//! [`ValueKind`] in a [`MetricRegistry`]. A constraint set is compiled
//! against the registry into a [`FilterPipeline`], which type-checks every
//! threshold once and then tests edges without further checks.
//!
//! An edge that does not carry the metric at all always qualifies:
//! a link with no recorded delay is not excluded by a delay bound.

use crate::error::{PathError, Result};
use crate::types::{Constraints, EdgeMetadata, MetricValue};
use std::collections::HashMap;
use tracing::{debug, warn};

/// The value type a metric threshold must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Numeric,
    Text,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Numeric => "number",
            ValueKind::Text => "str",
        }
    }

    pub fn accepts(&self, value: &MetricValue) -> bool {
        matches!(
            (self, value),
            (ValueKind::Numeric, MetricValue::Number(_)) | (ValueKind::Text, MetricValue::Text(_))
        )
    }
}

/// How an edge value is compared against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Higher is better: `edge >= threshold`.
    AtLeast,
    /// Lower is better: `edge <= threshold`.
    AtMost,
    /// `edge == threshold`, or `threshold ∈ edge` when the edge holds a list.
    Member,
}

impl Comparison {
    /// `None` when the edge value cannot be compared with the threshold.
    fn holds(&self, edge: &MetricValue, threshold: &MetricValue) -> Option<bool> {
        match (self, edge, threshold) {
            (Comparison::AtLeast, MetricValue::Number(e), MetricValue::Number(t)) => Some(e >= t),
            (Comparison::AtMost, MetricValue::Number(e), MetricValue::Number(t)) => Some(e <= t),
            (Comparison::Member, MetricValue::Text(e), MetricValue::Text(t)) => Some(e == t),
            (Comparison::Member, MetricValue::List(items), MetricValue::Text(t)) => {
                Some(items.iter().any(|item| item == t))
            }
            _ => None,
        }
    }
}

/// Anything that exposes the metadata of one edge.
pub trait MetricSource {
    fn metadata(&self) -> &EdgeMetadata;
}

impl MetricSource for EdgeMetadata {
    fn metadata(&self) -> &EdgeMetadata {
        self
    }
}

impl<T: MetricSource + ?Sized> MetricSource for &T {
    fn metadata(&self) -> &EdgeMetadata {
        (**self).metadata()
    }
}

impl<A, B> MetricSource for (A, B, &EdgeMetadata) {
    fn metadata(&self) -> &EdgeMetadata {
        self.2
    }
}

/// Predicate for one named metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFilter {
    name: String,
    kind: ValueKind,
    comparison: Comparison,
}

impl MetricFilter {
    pub fn new(name: impl Into<String>, kind: ValueKind, comparison: Comparison) -> Self {
        Self {
            name: name.into(),
            kind,
            comparison,
        }
    }

    pub fn at_least(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Numeric, Comparison::AtLeast)
    }

    pub fn at_most(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Numeric, Comparison::AtMost)
    }

    pub fn member(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Text, Comparison::Member)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Reject a threshold whose type does not match this metric.
    pub fn check(&self, threshold: &MetricValue) -> Result<()> {
        if self.kind.accepts(threshold) {
            Ok(())
        } else {
            Err(PathError::MetricType {
                metric: self.name.clone(),
                expected: self.kind.name(),
                found: threshold.type_name(),
            })
        }
    }

    /// Whether an edge qualifies. Assumes `threshold` already passed [`check`](Self::check).
    pub fn admits(&self, threshold: &MetricValue, metadata: &EdgeMetadata) -> bool {
        let Some(value) = metadata.get(&self.name) else {
            return true;
        };
        match self.comparison.holds(value, threshold) {
            Some(ok) => ok,
            None => {
                debug!(
                    metric = %self.name,
                    edge_value = %value,
                    "edge value not comparable with threshold, excluding edge"
                );
                false
            }
        }
    }
}

/// Lookup table from metric name to filter, built once and shared by queries.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    filters: HashMap<String, MetricFilter>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(MetricFilter::at_least("bandwidth"));
        registry.register(MetricFilter::at_least("reliability"));
        registry.register(MetricFilter::at_most("priority"));
        registry.register(MetricFilter::at_most("utilization"));
        registry.register(MetricFilter::at_most("delay"));
        registry.register(MetricFilter::member("ownership"));
        registry
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with no metrics; every constraint passes through.
    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Add or replace the filter for a metric.
    pub fn register(&mut self, filter: MetricFilter) {
        self.filters.insert(filter.name.clone(), filter);
    }

    pub fn get(&self, metric: &str) -> Option<&MetricFilter> {
        self.filters.get(metric)
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.filters.contains_key(metric)
    }

    /// Keep the edges that pass one constraint.
    ///
    /// Unknown metric names apply no filter.
    pub fn filter_edges<T, I>(&self, metric: &str, threshold: &MetricValue, edges: I) -> Result<Vec<T>>
    where
        T: MetricSource,
        I: IntoIterator<Item = T>,
    {
        match self.filters.get(metric) {
            Some(filter) => {
                filter.check(threshold)?;
                Ok(edges
                    .into_iter()
                    .filter(|edge| filter.admits(threshold, edge.metadata()))
                    .collect())
            }
            None => Ok(edges.into_iter().collect()),
        }
    }

    /// Type-check a constraint set and turn it into a pipeline.
    pub fn compile(&self, constraints: &Constraints) -> Result<FilterPipeline<'_>> {
        let mut stages = Vec::with_capacity(constraints.len());
        for (metric, threshold) in constraints {
            match self.filters.get(metric) {
                Some(filter) => {
                    filter.check(threshold)?;
                    stages.push((filter, threshold.clone()));
                }
                None => warn!(metric = %metric, "unknown metric in constraints, not filtering on it"),
            }
        }
        Ok(FilterPipeline { stages })
    }
}

/// A conjunction of type-checked metric constraints.
#[derive(Debug, Clone)]
pub struct FilterPipeline<'r> {
    stages: Vec<(&'r MetricFilter, MetricValue)>,
}

impl<'r> FilterPipeline<'r> {
    /// A pipeline that admits everything.
    pub fn pass_through() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Append the stages of another pipeline.
    pub fn and(mut self, other: &FilterPipeline<'r>) -> Self {
        self.stages.extend(other.stages.iter().cloned());
        self
    }

    pub fn admits(&self, metadata: &EdgeMetadata) -> bool {
        self.stages
            .iter()
            .all(|(filter, threshold)| filter.admits(threshold, metadata))
    }

    pub fn filter<T, I>(&self, edges: I) -> Vec<T>
    where
        T: MetricSource,
        I: IntoIterator<Item = T>,
    {
        edges
            .into_iter()
            .filter(|edge| self.admits(edge.metadata()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(pairs: &[(&str, MetricValue)]) -> EdgeMetadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn num(n: f64) -> MetricValue {
        MetricValue::Number(n)
    }

    #[test]
    fn higher_is_better_metrics() {
        let registry = MetricRegistry::default();
        for metric in ["bandwidth", "reliability"] {
            let low = edge(&[(metric, num(10.0))]);
            let exact = edge(&[(metric, num(50.0))]);
            let high = edge(&[(metric, num(90.0))]);
            let missing = edge(&[]);

            let kept = registry
                .filter_edges(metric, &num(50.0), vec![&low, &exact, &high, &missing])
                .unwrap();
            assert_eq!(kept, vec![&exact, &high, &missing], "metric {metric}");
        }
    }

    #[test]
    fn lower_is_better_metrics() {
        let registry = MetricRegistry::default();
        for metric in ["delay", "utilization", "priority"] {
            let low = edge(&[(metric, num(10.0))]);
            let exact = edge(&[(metric, num(50.0))]);
            let high = edge(&[(metric, num(90.0))]);
            let missing = edge(&[]);

            let kept = registry
                .filter_edges(metric, &num(50.0), vec![&low, &exact, &high, &missing])
                .unwrap();
            assert_eq!(kept, vec![&low, &exact, &missing], "metric {metric}");
        }
    }

    #[test]
    fn ownership_is_equality_or_membership() {
        let filter = MetricFilter::member("ownership");
        let owned_by_b = edge(&[("ownership", "B".into())]);
        let shared = edge(&[(
            "ownership",
            MetricValue::List(vec!["A".into(), "B".into()]),
        )]);

        assert!(!filter.admits(&"A".into(), &owned_by_b));
        assert!(filter.admits(&"B".into(), &owned_by_b));
        assert!(filter.admits(&"A".into(), &shared));
        assert!(!filter.admits(&"C".into(), &shared));
    }

    #[test]
    fn structured_edge_values_never_qualify() {
        let filter = MetricFilter::member("ownership");
        let nested = edge(&[(
            "ownership",
            MetricValue::Other(serde_json::json!({"A": {"vlans": [1, 2]}})),
        )]);
        let null = edge(&[("ownership", MetricValue::Other(serde_json::Value::Null))]);

        assert!(!filter.admits(&"A".into(), &nested));
        assert!(!filter.admits(&"A".into(), &null));

        let err = MetricRegistry::default()
            .filter_edges("ownership", &MetricValue::Other(serde_json::Value::Null), vec![&nested])
            .unwrap_err();
        assert!(err.to_string().contains("found other"));
    }

    #[test]
    fn threshold_type_is_checked() {
        let registry = MetricRegistry::default();
        let edges: Vec<EdgeMetadata> = vec![edge(&[])];

        let err = registry
            .filter_edges("ownership", &num(1.0), edges.iter())
            .unwrap_err();
        assert_eq!(
            err,
            PathError::MetricType {
                metric: "ownership".into(),
                expected: "str",
                found: "number",
            }
        );

        let err = registry
            .filter_edges("bandwidth", &"fast".into(), edges.iter())
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("bandwidth"));
    }

    #[test]
    fn unknown_metric_passes_everything() {
        let registry = MetricRegistry::default();
        let edges = vec![edge(&[("colour", "red".into())]), edge(&[])];
        let kept = registry
            .filter_edges("colour", &num(3.0), edges.iter())
            .unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn incomparable_edge_value_is_excluded() {
        let filter = MetricFilter::at_least("bandwidth");
        let weird = edge(&[("bandwidth", "lots".into())]);
        assert!(!filter.admits(&num(10.0), &weird));
    }

    #[test]
    fn pipeline_is_a_conjunction() {
        let registry = MetricRegistry::default();
        let constraints: Constraints = [
            ("bandwidth".to_string(), num(100.0)),
            ("delay".to_string(), num(20.0)),
            ("misspelt".to_string(), num(1.0)),
        ]
        .into_iter()
        .collect();
        let pipeline = registry.compile(&constraints).unwrap();
        assert_eq!(pipeline.len(), 2);

        assert!(pipeline.admits(&edge(&[("bandwidth", num(150.0)), ("delay", num(5.0))])));
        assert!(!pipeline.admits(&edge(&[("bandwidth", num(150.0)), ("delay", num(25.0))])));
        assert!(!pipeline.admits(&edge(&[("bandwidth", num(50.0))])));
        assert!(pipeline.admits(&edge(&[])));
    }

    #[test]
    fn compile_rejects_bad_threshold() {
        let registry = MetricRegistry::default();
        let constraints: Constraints = [("delay".to_string(), MetricValue::Text("low".into()))]
            .into_iter()
            .collect();
        assert!(registry.compile(&constraints).is_err());
    }

    #[test]
    fn registered_metrics_extend_the_table() {
        let mut registry = MetricRegistry::empty();
        assert!(!registry.contains("jitter"));
        registry.register(MetricFilter::at_most("jitter"));

        let edges = vec![edge(&[("jitter", num(3.0))]), edge(&[("jitter", num(9.0))])];
        let kept = registry
            .filter_edges("jitter", &num(5.0), edges.iter())
            .unwrap();
        assert_eq!(kept.len(), 1);
    }
}
