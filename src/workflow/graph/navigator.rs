// SPDX-License-Identifier: MIT

//! Read-only neighbor queries used for step-to-step navigation

use std::collections::HashSet;

use super::types::{Graph, Node};

/// Immediate neighbors of a node, in edge insertion order
#[derive(Debug, Default)]
pub struct NeighborNodes<'a> {
    pub upstream_nodes: Vec<&'a Node>,
    pub downstream_nodes: Vec<&'a Node>,
}

/// Nodes feeding `node_id` and nodes fed by it.
///
/// One pass over the edges; each neighbor appears once. Unknown ids, and
/// edges pointing at nodes that no longer exist, contribute nothing.
pub fn get_neighbor_nodes<'a>(graph: &'a Graph, node_id: &str) -> NeighborNodes<'a> {
    let mut neighbors = NeighborNodes::default();
    let mut seen_up = HashSet::new();
    let mut seen_down = HashSet::new();

    for edge in &graph.edges {
        if edge.target == node_id && seen_up.insert(edge.source.as_str()) {
            if let Some(node) = graph.node(&edge.source) {
                neighbors.upstream_nodes.push(node);
            }
        }
        if edge.source == node_id && seen_down.insert(edge.target.as_str()) {
            if let Some(node) = graph.node(&edge.target) {
                neighbors.downstream_nodes.push(node);
            }
        }
    }

    neighbors
}

impl Graph {
    pub fn neighbor_nodes(&self, node_id: &str) -> NeighborNodes<'_> {
        get_neighbor_nodes(self, node_id)
    }
}
