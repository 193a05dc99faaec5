// SPDX-License-Identifier: MIT

//! Typed error handling for flowforge-rs
//!
//! The graph store itself never fails: unresolvable ids and rejected
//! connections are silent no-ops. These types cover the recoverable
//! conditions that are surfaced to callers (unknown snapshots), the
//! caller-side runner, and the loader.

use thiserror::Error;

/// Top-level error type for flowforge-rs
#[derive(Debug, Error)]
pub enum FlowError {
    /// Node id could not be resolved (runner only; the store is silent)
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    /// No operation registered under the node's operation type
    #[error("Operation '{name}' is not registered")]
    UnknownOperation { name: String },

    /// `select_output` was given an id absent from the node's snapshots
    #[error("Snapshot '{snapshot_id}' not found on node '{node_id}'")]
    SnapshotNotFound { node_id: String, snapshot_id: String },

    /// A required input port carries no value
    #[error("Required input '{port_id}' of node '{node_id}' has no value")]
    MissingInput { node_id: String, port_id: String },

    /// Invalid port type tag
    #[error("Invalid port type: {0}")]
    PortType(#[from] PortTypeError),

    /// Failure reported by an operation action
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while parsing a port type tag such as `"datasetId|modelId"`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortTypeError {
    #[error("port type tag is empty")]
    Empty,

    #[error("port type tag '{0}' contains an empty kind")]
    EmptyKind(String),
}

/// Errors reported by operation actions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    /// The operation declares no action
    #[error("Operation '{0}' has no action")]
    NoAction(String),

    /// The action could not interpret its inputs or state
    #[error("Invalid input for '{operation}': {message}")]
    InvalidInput { operation: String, message: String },

    /// The action ran and failed
    #[error("{0}")]
    Failed(String),
}

impl FlowError {
    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound(id.into())
    }

    /// Create an unknown operation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }
}

impl OperationError {
    /// Create an invalid input error
    pub fn invalid_input(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
