// SPDX-License-Identifier: MIT

//! Caller-side execution of a single node
//!
//! The graph store never invokes actions. This runner does it on the
//! caller's behalf: it resolves the node's operation, hands the action its
//! input ports and state, writes the results back through `update_node`,
//! and re-propagates the new output values downstream.

use crate::engine::error::FlowError;
use crate::engine::operation::{ActionContext, ActionOutput};
use crate::workflow::graph::{Graph, NodePatch, OutputPortInit, StatusCode};
use crate::workflow::registry::OperationRegistry;

/// What one run changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Output slots written
    pub outputs: usize,
    /// Downstream inputs refreshed
    pub propagated: usize,
}

/// Runs nodes of a graph against a registry of operations
pub struct ExecutionRunner<'r> {
    registry: &'r OperationRegistry,
}

impl<'r> ExecutionRunner<'r> {
    pub fn new(registry: &'r OperationRegistry) -> Self {
        Self { registry }
    }

    /// Execute `node_id` once.
    ///
    /// A node whose required inputs are not populated is left untouched. A
    /// failing action marks the node `Failed` and the error is returned.
    pub fn run_node(&self, graph: &mut Graph, node_id: &str) -> Result<RunSummary, FlowError> {
        let node = graph
            .node(node_id)
            .ok_or_else(|| FlowError::node_not_found(node_id))?;
        let operation = self
            .registry
            .get(&node.operation_type)
            .ok_or_else(|| FlowError::unknown_operation(&node.operation_type))?;

        if let Some(port) = node
            .inputs
            .iter()
            .find(|p| !p.is_optional && p.value.is_none())
        {
            return Err(FlowError::MissingInput {
                node_id: node_id.to_string(),
                port_id: port.id.clone(),
            });
        }

        log::info!("Executing node: {} ({})", node_id, operation.name());
        graph.update_node(
            node_id,
            NodePatch {
                status_code: Some(StatusCode::Running),
                ..Default::default()
            },
        );

        let result = {
            let node = graph
                .node(node_id)
                .ok_or_else(|| FlowError::node_not_found(node_id))?;
            let ctx = ActionContext {
                node_id,
                inputs: &node.inputs,
                state: &node.state,
            };
            operation.action(&ctx)
        };

        match result {
            Ok(output) => {
                let summary = self.apply_output(graph, node_id, output);
                log::info!("Node {} completed", node_id);
                Ok(summary)
            }
            Err(e) => {
                log::error!("Node {} failed: {}", node_id, e);
                graph.update_node(
                    node_id,
                    NodePatch {
                        status_code: Some(StatusCode::Failed),
                        ..Default::default()
                    },
                );
                Err(e.into())
            }
        }
    }

    /// Write action results into the node and push them downstream
    fn apply_output(&self, graph: &mut Graph, node_id: &str, output: ActionOutput) -> RunSummary {
        let written = output.outputs.len();

        for (index, out) in output.outputs.into_iter().enumerate() {
            let existing = graph
                .node_mut(node_id)
                .and_then(|n| n.outputs.get_mut(index));
            match existing {
                // Port shape is fixed once materialized; only the value moves.
                Some(port) => port.value = Some(out.value),
                None => {
                    graph.append_output_port(
                        node_id,
                        OutputPortInit {
                            port_type: out.port_type,
                            label: out.label,
                            value: out.value,
                        },
                    );
                }
            }
        }

        graph.update_node(
            node_id,
            NodePatch {
                state: output.state,
                outputs: None,
                status_code: Some(StatusCode::Success),
            },
        );
        if let Some(node) = graph.node_mut(node_id) {
            node.refresh_active_snapshot();
        }

        RunSummary {
            outputs: written,
            propagated: graph.propagate_outputs(node_id),
        }
    }
}
