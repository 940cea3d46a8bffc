//! Topology snapshot - the read-only network view the graph is built from.
//!
//! Snapshots are owned by the topology data source. Pathfinder only reads
//! them: switches with their interfaces, and links between two interfaces
//! carrying an active flag and a metadata mapping.

use crate::error::{PathError, Result};
use crate::types::{EdgeMetadata, MetricValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A switch port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub id: String,
}

impl Interface {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A switch and the interfaces it owns, keyed by interface id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub id: String,
    #[serde(default)]
    pub interfaces: BTreeMap<String, Interface>,
}

impl Switch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            interfaces: BTreeMap::new(),
        }
    }

    pub fn with_interface(mut self, id: impl Into<String>) -> Self {
        let interface = Interface::new(id);
        self.interfaces.insert(interface.id.clone(), interface);
        self
    }
}

/// A physical link between two interfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub endpoint_a: Interface,
    pub endpoint_b: Interface,
    pub active: bool,
    #[serde(default)]
    pub metadata: EdgeMetadata,
}

impl Link {
    /// An active link without metadata.
    pub fn new(endpoint_a: impl Into<String>, endpoint_b: impl Into<String>) -> Self {
        Self {
            endpoint_a: Interface::new(endpoint_a),
            endpoint_b: Interface::new(endpoint_b),
            active: true,
            metadata: EdgeMetadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether this link joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.endpoint_a.id == a && self.endpoint_b.id == b)
            || (self.endpoint_a.id == b && self.endpoint_b.id == a)
    }
}

/// Full network view: switches keyed by switch id, links keyed by link id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    #[serde(default)]
    pub switches: BTreeMap<String, Switch>,
    #[serde(default)]
    pub links: BTreeMap<String, Link>,
}

impl TopologySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_switch(mut self, switch: Switch) -> Self {
        self.switches.insert(switch.id.clone(), switch);
        self
    }

    pub fn with_link(mut self, id: impl Into<String>, link: Link) -> Self {
        self.links.insert(id.into(), link);
        self
    }

    /// Parse a snapshot from JSON. Shape errors are reported as a malformed snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| PathError::malformed_snapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let snapshot: Self = serde_json::from_value(value)
            .map_err(|e| PathError::malformed_snapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the identifiers the graph is built from.
    pub fn validate(&self) -> Result<()> {
        for (key, switch) in &self.switches {
            if switch.id.is_empty() {
                return Err(PathError::malformed_snapshot(format!(
                    "switch {:?} has an empty id",
                    key
                )));
            }
            if key != &switch.id {
                return Err(PathError::malformed_snapshot(format!(
                    "switch keyed {:?} has id {:?}",
                    key, switch.id
                )));
            }
            for (iface_key, interface) in &switch.interfaces {
                if interface.id.is_empty() || iface_key != &interface.id {
                    return Err(PathError::malformed_snapshot(format!(
                        "interface {:?} of switch {:?} has id {:?}",
                        iface_key, switch.id, interface.id
                    )));
                }
            }
        }

        for (link_id, link) in &self.links {
            if link.endpoint_a.id.is_empty() || link.endpoint_b.id.is_empty() {
                return Err(PathError::malformed_snapshot(format!(
                    "link {:?} has an endpoint without id",
                    link_id
                )));
            }
        }

        Ok(())
    }

    pub fn active_links(&self) -> impl Iterator<Item = (&String, &Link)> {
        self.links.iter().filter(|(_, link)| link.is_active())
    }
}

/// Notification delivered by the topology data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyEvent {
    #[serde(default)]
    pub topology: Option<TopologySnapshot>,
}

impl TopologyEvent {
    pub fn updated(topology: TopologySnapshot) -> Self {
        Self {
            topology: Some(topology),
        }
    }

    pub fn empty() -> Self {
        Self { topology: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_snapshot_json() {
        let snapshot = TopologySnapshot::from_value(json!({
            "switches": {
                "S1": {"id": "S1", "interfaces": {"S1:1": {"id": "S1:1"}}},
                "S2": {"id": "S2", "interfaces": {"S2:1": {"id": "S2:1"}}}
            },
            "links": {
                "1": {
                    "endpoint_a": {"id": "S1:1"},
                    "endpoint_b": {"id": "S2:1"},
                    "active": true,
                    "metadata": {"bandwidth": 100, "ownership": "A"}
                }
            }
        }))
        .unwrap();

        assert_eq!(snapshot.switches.len(), 2);
        let link = &snapshot.links["1"];
        assert!(link.connects("S2:1", "S1:1"));
        assert_eq!(link.metadata["bandwidth"], MetricValue::Number(100.0));
    }

    #[test]
    fn unusual_metadata_values_do_not_reject_the_snapshot() {
        let snapshot = TopologySnapshot::from_value(json!({
            "switches": {},
            "links": {
                "1": {
                    "endpoint_a": {"id": "S1:1"},
                    "endpoint_b": {"id": "S2:1"},
                    "active": true,
                    "metadata": {
                        "bandwidth": 100,
                        "description": null,
                        "ownership": {"A": {"vlans": [1, 2]}}
                    }
                }
            }
        }))
        .unwrap();

        let metadata = &snapshot.links["1"].metadata;
        assert_eq!(metadata["bandwidth"], MetricValue::Number(100.0));
        assert_eq!(metadata["description"], MetricValue::Other(serde_json::Value::Null));
        assert_eq!(metadata["ownership"].type_name(), "other");
    }

    #[test]
    fn missing_link_attribute_is_malformed() {
        let err = TopologySnapshot::from_value(json!({
            "switches": {},
            "links": {"1": {"endpoint_a": {"id": "S1:1"}, "active": true}}
        }))
        .unwrap_err();
        assert!(matches!(err, PathError::MalformedSnapshot(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn switch_key_must_match_id() {
        let snapshot = TopologySnapshot {
            switches: BTreeMap::from([("S1".to_string(), Switch::new("S9"))]),
            links: BTreeMap::new(),
        };
        assert!(matches!(
            snapshot.validate(),
            Err(PathError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn active_links_skips_inactive() {
        let snapshot = TopologySnapshot::new()
            .with_link("up", Link::new("a", "b"))
            .with_link("down", Link::new("b", "c").inactive());
        let ids: Vec<_> = snapshot.active_links().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["up"]);
    }
}
