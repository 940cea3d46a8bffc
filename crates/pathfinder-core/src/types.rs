//! Shared types used across all Pathfinder crates.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a node in the topology graph: a switch or one of its interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A value stored on a link or used as a constraint threshold.
///
/// Untagged so that snapshot metadata can be read straight from JSON.
/// Integers deserialize as [`MetricValue::Number`]. Anything else (null,
/// objects, mixed lists) is kept as [`MetricValue::Other`] and never
/// satisfies a constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            MetricValue::Bool(_) => "bool",
            MetricValue::Number(_) => "number",
            MetricValue::Text(_) => "str",
            MetricValue::List(_) => "list",
            MetricValue::Other(_) => "other",
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(b) => write!(f, "{}", b),
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{:?}", s),
            MetricValue::List(items) => write!(f, "{:?}", items),
            MetricValue::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(n: f64) -> Self {
        MetricValue::Number(n)
    }
}

impl From<i64> for MetricValue {
    fn from(n: i64) -> Self {
        MetricValue::Number(n as f64)
    }
}

impl From<i32> for MetricValue {
    fn from(n: i32) -> Self {
        MetricValue::Number(n as f64)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl From<bool> for MetricValue {
    fn from(b: bool) -> Self {
        MetricValue::Bool(b)
    }
}

/// Metric name → value mapping carried by an edge.
pub type EdgeMetadata = BTreeMap<String, MetricValue>;

/// Metric name → threshold mapping.
///
/// Ordered, so the position of a flexible constraint is stable across calls.
pub type Constraints = BTreeMap<String, MetricValue>;

/// An ordered hop sequence from source to destination.
pub type Hops = Vec<NodeId>;

/// A path answer handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub hops: Hops,
    /// Constraints that held on every edge of this path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl PathResult {
    pub fn new(hops: Hops) -> Self {
        Self {
            hops,
            metrics: None,
            cost: None,
        }
    }

    pub fn with_metrics(hops: Hops, metrics: Constraints) -> Self {
        Self {
            hops,
            metrics: Some(metrics),
            cost: None,
        }
    }

    pub fn source(&self) -> Option<&NodeId> {
        self.hops.first()
    }

    pub fn destination(&self) -> Option<&NodeId> {
        self.hops.last()
    }
}

/// Build a hop list from string slices.
pub fn hops<I, S>(ids: I) -> Hops
where
    I: IntoIterator<Item = S>,
    S: Into<NodeId>,
{
    ids.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_value_reads_json_shapes() {
        let meta: EdgeMetadata = serde_json::from_str(
            r#"{"bandwidth": 100, "delay": 2.5, "ownership": "A", "owners": ["A", "B"], "up": true}"#,
        )
        .unwrap();

        assert_eq!(meta["bandwidth"], MetricValue::Number(100.0));
        assert_eq!(meta["delay"], MetricValue::Number(2.5));
        assert_eq!(meta["ownership"], MetricValue::Text("A".into()));
        assert_eq!(
            meta["owners"],
            MetricValue::List(vec!["A".into(), "B".into()])
        );
        assert_eq!(meta["up"], MetricValue::Bool(true));
    }

    #[test]
    fn unsupported_json_shapes_are_kept_as_other() {
        let meta: EdgeMetadata = serde_json::from_str(
            r#"{"description": null, "ownership": {"A": {"vlans": [1, 2]}}}"#,
        )
        .unwrap();

        assert_eq!(meta["description"], MetricValue::Other(serde_json::Value::Null));
        assert_eq!(meta["ownership"].type_name(), "other");
        assert_eq!(meta["ownership"].as_str(), None);
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            serde_json::json!({"description": null, "ownership": {"A": {"vlans": [1, 2]}}})
        );
    }

    #[test]
    fn node_id_serializes_as_plain_string() {
        let id = NodeId::from("00:00:00:00:00:00:00:01:1");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"00:00:00:00:00:00:00:01:1\""
        );
    }

    #[test]
    fn path_result_omits_absent_fields() {
        let result = PathResult::new(hops(["A", "B"]));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"hops": ["A", "B"]})
        );
    }
}
