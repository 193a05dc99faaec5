// SPDX-License-Identifier: MIT

//! Workflow graph engine
//!
//! This module provides the graph model, the mutation API, port type
//! matching, output versioning and neighbor navigation.

pub mod navigator;
pub mod port_type;
mod store;
pub mod types;
mod versioning;

pub use navigator::{get_neighbor_nodes, NeighborNodes};
pub use port_type::{match_ports, PortMatch, PortType};
pub use store::create_graph;
pub use types::{
    Edge, Graph, Node, NodePatch, OutputPortInit, OutputSnapshot, Port, PortStatus, Position,
    Size, StatusCode, Transform,
};
pub use versioning::is_operator_state_in_sync;
