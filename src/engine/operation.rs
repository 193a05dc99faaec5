// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::error::OperationError;
use crate::workflow::graph::port_type::PortType;
use crate::workflow::graph::types::Port;

/// Declared shape of one input or output slot of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
}

impl PortSpec {
    /// A required port
    pub fn new(port_type: PortType) -> Self {
        Self {
            port_type,
            label: None,
            is_optional: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// What an action sees when the runner invokes it
#[derive(Debug)]
pub struct ActionContext<'a> {
    pub node_id: &'a str,
    pub inputs: &'a [Port],
    pub state: &'a Value,
}

impl ActionContext<'_> {
    /// Value of the input port at `index`, if connected and populated
    pub fn input(&self, index: usize) -> Option<&[Value]> {
        self.inputs.get(index).and_then(|p| p.value.as_deref())
    }
}

/// A value produced for one output slot
#[derive(Debug, Clone, PartialEq)]
pub struct OutputValue {
    pub port_type: PortType,
    pub label: Option<String>,
    pub value: Vec<Value>,
}

/// Result of running an action
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionOutput {
    /// One entry per output slot, in slot order
    pub outputs: Vec<OutputValue>,
    /// Replacement node state, if the action changed it
    pub state: Option<Value>,
}

/// Descriptor of a workflow step.
///
/// Implementations are supplied by the application; the graph store reads
/// only the declared ports and default state. `action` is invoked by
/// [`crate::workflow::runner::ExecutionRunner`], never by the store.
pub trait Operation: Send + Sync {
    /// Unique operation-type identifier
    fn name(&self) -> &str;

    /// Ordered input slots
    fn inputs(&self) -> &[PortSpec];

    /// Ordered output slots
    fn outputs(&self) -> &[PortSpec];

    /// Default mutable state for a fresh node
    fn init_state(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }

    /// Run the operation. Operations without behaviour keep the default.
    fn action(&self, _ctx: &ActionContext<'_>) -> Result<ActionOutput, OperationError> {
        Err(OperationError::NoAction(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Inert {
        inputs: Vec<PortSpec>,
    }

    impl Operation for Inert {
        fn name(&self) -> &str {
            "inert"
        }

        fn inputs(&self) -> &[PortSpec] {
            &self.inputs
        }

        fn outputs(&self) -> &[PortSpec] {
            &[]
        }
    }

    #[test]
    fn test_default_state_is_empty_object() {
        let op = Inert { inputs: vec![] };
        assert_eq!(op.init_state(), json!({}));
    }

    #[test]
    fn test_default_action_reports_no_action() {
        let op = Inert { inputs: vec![] };
        let state = json!({});
        let ctx = ActionContext {
            node_id: "n",
            inputs: &[],
            state: &state,
        };
        assert_eq!(
            op.action(&ctx),
            Err(OperationError::NoAction("inert".to_string()))
        );
    }

    #[test]
    fn test_port_spec_builders() {
        let spec = PortSpec::new("datasetId".parse().unwrap())
            .with_label("Dataset")
            .optional();
        assert_eq!(spec.label.as_deref(), Some("Dataset"));
        assert!(spec.is_optional);
    }

    #[test]
    fn test_port_spec_deserialize() {
        let spec: PortSpec =
            serde_json::from_value(json!({"type": "datasetId|modelId", "label": "Asset"}))
                .unwrap();
        assert!(spec.port_type.is_union());
        assert!(!spec.is_optional);
    }
}
