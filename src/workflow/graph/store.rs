// SPDX-License-Identifier: MIT

//! Graph store: the mutation API over one workflow
//!
//! Every mutation that receives an id it cannot resolve returns without
//! touching the graph. Such calls usually come from UI event races, so they
//! are only traced at debug level.

use super::port_type::match_ports;
use super::types::{
    new_id, Edge, Graph, Node, NodePatch, OutputPortInit, Port, PortStatus, Position, Size,
    StatusCode, Transform,
};
use crate::engine::operation::Operation;

/// Create an empty workflow graph
pub fn create_graph() -> Graph {
    Graph::new("")
}

impl Graph {
    /// Create an empty graph with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            description: String::new(),
            transform: Transform::default(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    /// Instantiate `operation` as a new node.
    ///
    /// Input ports are created from the declared inputs. Output ports start
    /// empty and are materialized once the node produces a value.
    pub fn add_node(
        &mut self,
        operation: &dyn Operation,
        position: Position,
        size: Option<Size>,
        asset_id: Option<String>,
    ) -> String {
        let size = size.unwrap_or_default();
        let node = Node {
            id: new_id(),
            workflow_id: self.id.clone(),
            operation_type: operation.name().to_string(),
            display_name: operation.name().to_string(),
            asset_id,
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
            inputs: operation.inputs().iter().map(Port::from_spec).collect(),
            outputs: Vec::new(),
            state: operation.init_state(),
            status_code: StatusCode::Invalid,
            output_snapshots: Vec::new(),
            active_snapshot_id: None,
        };

        log::debug!(
            "Added node {} ({}) to workflow {}",
            node.id,
            node.operation_type,
            self.id
        );
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Materialize an output port on `node_id` holding `init.value`.
    pub fn append_output_port(&mut self, node_id: &str, init: OutputPortInit) -> Option<String> {
        let Some(node) = self.node_mut(node_id) else {
            log::debug!("append_output_port: node {} not found", node_id);
            return None;
        };

        let port = Port {
            id: new_id(),
            port_type: init.port_type,
            label: init.label,
            is_optional: false,
            status: PortStatus::NotConnected,
            value: Some(init.value),
        };
        let id = port.id.clone();
        node.outputs.push(port);
        Some(id)
    }

    /// Connect an output port to an input port.
    ///
    /// Returns the new edge id, or `None` when nothing changed: an endpoint
    /// is missing, the edge exists, the input is already fed, the source has
    /// no value yet, or the port types do not match.
    pub fn add_edge(
        &mut self,
        source: &str,
        source_port_id: &str,
        target: &str,
        target_port_id: &str,
        points: Vec<Position>,
    ) -> Option<String> {
        let source_port = self.node(source)?.output(source_port_id)?;
        let target_port = self.node(target)?.input(target_port_id)?;

        if self
            .edges
            .iter()
            .any(|e| e.connects(source, source_port_id, target, target_port_id))
        {
            log::debug!("add_edge: edge {}->{} already exists", source, target);
            return None;
        }
        if self
            .edges
            .iter()
            .any(|e| e.target == target && e.target_port_id == target_port_id)
        {
            log::debug!("add_edge: input {} on {} already connected", target_port_id, target);
            return None;
        }

        let value = source_port.value.as_ref()?;
        let port_match = match_ports(&source_port.port_type, &target_port.port_type);
        if !port_match.is_compatible() {
            log::debug!(
                "add_edge: '{}' cannot feed '{}'",
                source_port.port_type,
                target_port.port_type
            );
            return None;
        }
        let transferred = port_match.transfer(value);
        let label = source_port.label.clone();

        if let Some(port) = self
            .node_mut(target)
            .and_then(|n| n.input_mut(target_port_id))
        {
            port.value = Some(transferred);
            port.label = label;
            port.status = PortStatus::Connected;
        }
        if let Some(port) = self
            .node_mut(source)
            .and_then(|n| n.output_mut(source_port_id))
        {
            port.status = PortStatus::Connected;
        }

        let edge = Edge {
            id: new_id(),
            workflow_id: self.id.clone(),
            source: source.to_string(),
            source_port_id: source_port_id.to_string(),
            target: target.to_string(),
            target_port_id: target_port_id.to_string(),
            points,
        };
        let id = edge.id.clone();
        self.edges.push(edge);
        Some(id)
    }

    /// Disconnect an edge.
    ///
    /// The consumer loses its value; nothing is restored. The source port
    /// keeps its `Connected` status even when this was its last edge.
    pub fn remove_edge(&mut self, edge_id: &str) -> bool {
        let Some(index) = self.edges.iter().position(|e| e.id == edge_id) else {
            log::debug!("remove_edge: edge {} not found", edge_id);
            return false;
        };
        let edge = self.edges.remove(index);

        if let Some(port) = self
            .node_mut(&edge.target)
            .and_then(|n| n.input_mut(&edge.target_port_id))
        {
            port.value = None;
            port.status = PortStatus::NotConnected;
        }
        true
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        if self.node(node_id).is_none() {
            log::debug!("remove_node: node {} not found", node_id);
            return false;
        }

        let edge_ids: Vec<String> = self
            .edges
            .iter()
            .filter(|e| e.touches(node_id))
            .map(|e| e.id.clone())
            .collect();
        for edge_id in &edge_ids {
            self.remove_edge(edge_id);
        }

        self.nodes.retain(|n| n.id != node_id);
        true
    }

    /// Assign the fields present in `patch`.
    pub fn update_node(&mut self, node_id: &str, patch: NodePatch) -> bool {
        let Some(node) = self.node_mut(node_id) else {
            log::debug!("update_node: node {} not found", node_id);
            return false;
        };

        if let Some(state) = patch.state {
            node.state = state;
        }
        if let Some(outputs) = patch.outputs {
            node.outputs = outputs;
        }
        if let Some(status_code) = patch.status_code {
            node.status_code = status_code;
        }
        true
    }

    /// Re-copy the current value of every outgoing edge of `node_id` into
    /// its target input. Returns the number of inputs refreshed.
    pub fn propagate_outputs(&mut self, node_id: &str) -> usize {
        let transfers: Vec<(String, String, Vec<serde_json::Value>, Option<String>)> = self
            .edges
            .iter()
            .filter(|e| e.source == node_id)
            .filter_map(|e| {
                let source_port = self.node(&e.source)?.output(&e.source_port_id)?;
                let target_port = self.node(&e.target)?.input(&e.target_port_id)?;
                let value = source_port.value.as_ref()?;
                let port_match = match_ports(&source_port.port_type, &target_port.port_type);
                port_match.is_compatible().then(|| {
                    (
                        e.target.clone(),
                        e.target_port_id.clone(),
                        port_match.transfer(value),
                        source_port.label.clone(),
                    )
                })
            })
            .collect();

        let mut refreshed = 0;
        for (target, target_port_id, value, label) in transfers {
            if let Some(port) = self
                .node_mut(&target)
                .and_then(|n| n.input_mut(&target_port_id))
            {
                port.value = Some(value);
                port.label = label;
                port.status = PortStatus::Connected;
                refreshed += 1;
            }
        }

        if refreshed > 0 {
            log::debug!("Propagated {} value(s) downstream of {}", refreshed, node_id);
        }
        refreshed
    }
}
