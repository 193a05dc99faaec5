// SPDX-License-Identifier: MIT

//! Graph workflow type definitions
//!
//! This module defines the plain, serializable shapes of a workflow: the
//! graph, its nodes, ports, edges and output snapshots. Nodes and edges
//! refer to each other only by id; the [`Graph`] owns all storage.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::port_type::PortType;
use crate::engine::operation::PortSpec;

/// Default node footprint on the canvas
pub const DEFAULT_NODE_WIDTH: f64 = 180.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 220.0;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Execution status of a node
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    #[default]
    Invalid,
    Running,
    Success,
    Failed,
}

/// Connection status of a port
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PortStatus {
    #[default]
    NotConnected,
    Connected,
}

/// Canvas coordinates
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node footprint
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
        }
    }
}

/// Pan/zoom of the canvas
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, k: 1.0 }
    }
}

/// A typed input or output slot on a node
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub status: PortStatus,
    #[serde(default)]
    pub value: Option<Vec<Value>>,
}

impl Port {
    /// Fresh, unconnected port instantiated from a declaration
    pub fn from_spec(spec: &PortSpec) -> Self {
        Self {
            id: new_id(),
            port_type: spec.port_type.clone(),
            label: spec.label.clone(),
            is_optional: spec.is_optional,
            status: PortStatus::NotConnected,
            value: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == PortStatus::Connected
    }
}

/// Initial content of a lazily materialized output port
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPortInit {
    pub port_type: PortType,
    pub label: Option<String>,
    pub value: Vec<Value>,
}

/// Saved copy of a node's state and status
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputSnapshot {
    pub id: String,
    pub state: Value,
    pub status_code: StatusCode,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// A live instance of an operation within one workflow
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub workflow_id: String,
    pub operation_type: String,
    pub display_name: String,
    #[serde(default)]
    pub asset_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub inputs: Vec<Port>,
    #[serde(default)]
    pub outputs: Vec<Port>,
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub status_code: StatusCode,
    #[serde(default)]
    pub output_snapshots: Vec<OutputSnapshot>,
    #[serde(default)]
    pub active_snapshot_id: Option<String>,
}

impl Node {
    pub fn input(&self, port_id: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == port_id)
    }

    pub fn input_mut(&mut self, port_id: &str) -> Option<&mut Port> {
        self.inputs.iter_mut().find(|p| p.id == port_id)
    }

    pub fn output(&self, port_id: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.id == port_id)
    }

    pub fn output_mut(&mut self, port_id: &str) -> Option<&mut Port> {
        self.outputs.iter_mut().find(|p| p.id == port_id)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Directed connection from an output port to an input port
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub workflow_id: String,
    pub source: String,
    pub source_port_id: String,
    pub target: String,
    pub target_port_id: String,
    #[serde(default)]
    pub points: Vec<Position>,
}

impl Edge {
    /// True when both endpoints match
    pub fn connects(
        &self,
        source: &str,
        source_port_id: &str,
        target: &str,
        target_port_id: &str,
    ) -> bool {
        self.source == source
            && self.source_port_id == source_port_id
            && self.target == target
            && self.target_port_id == target_port_id
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Partial update applied by `update_node`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub state: Option<Value>,
    pub outputs: Option<Vec<Port>>,
    pub status_code: Option<StatusCode>,
}

/// One workflow: the sole owner of its nodes and edges
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_defaults() {
        assert_eq!(StatusCode::default(), StatusCode::Invalid);
        assert_eq!(PortStatus::default(), PortStatus::NotConnected);
        assert_eq!(Size::default().width, DEFAULT_NODE_WIDTH);
        assert_eq!(Transform::default().k, 1.0);
    }

    #[test]
    fn test_port_from_spec() {
        let spec = PortSpec::new("modelId".parse().unwrap()).with_label("Model");
        let port = Port::from_spec(&spec);
        assert!(!port.id.is_empty());
        assert_eq!(port.label.as_deref(), Some("Model"));
        assert_eq!(port.status, PortStatus::NotConnected);
        assert!(port.value.is_none());
    }

    #[test]
    fn test_port_ids_are_unique() {
        let spec = PortSpec::new("number".parse().unwrap());
        assert_ne!(Port::from_spec(&spec).id, Port::from_spec(&spec).id);
    }

    #[test]
    fn test_serialize_camel_case() {
        let edge = Edge {
            id: "e1".to_string(),
            workflow_id: "w".to_string(),
            source: "a".to_string(),
            source_port_id: "ap".to_string(),
            target: "b".to_string(),
            target_port_id: "bp".to_string(),
            points: vec![Position::new(1.0, 2.0)],
        };
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["sourcePortId"], "ap");
        assert_eq!(json["points"][0]["y"], 2.0);
    }

    #[test]
    fn test_deserialize_port_with_defaults() {
        let port: Port = serde_json::from_value(json!({
            "id": "p1",
            "type": "datasetId|modelId"
        }))
        .unwrap();
        assert_eq!(port.status, PortStatus::NotConnected);
        assert!(port.port_type.is_union());
        assert!(!port.is_connected());
    }

    #[test]
    fn test_status_code_lowercase() {
        assert_eq!(serde_json::to_value(StatusCode::Success).unwrap(), json!("success"));
        assert_eq!(
            serde_json::to_value(PortStatus::NotConnected).unwrap(),
            json!("notConnected")
        );
    }

    #[test]
    fn test_edge_connects() {
        let edge = Edge {
            id: "e1".to_string(),
            workflow_id: "w".to_string(),
            source: "a".to_string(),
            source_port_id: "ap".to_string(),
            target: "b".to_string(),
            target_port_id: "bp".to_string(),
            points: vec![],
        };
        assert!(edge.connects("a", "ap", "b", "bp"));
        assert!(!edge.connects("a", "ap", "b", "other"));
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }
}
