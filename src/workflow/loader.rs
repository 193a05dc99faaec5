//! Graph loader - JSON/YAML reading and writing
//!
//! The engine never persists itself. This module converts a [`Graph`] to and
//! from its plain serialized shape for callers that do.

use super::graph::Graph;
use crate::engine::error::FlowError;
use std::fs;
use std::path::Path;

/// Reads and writes workflow graphs
pub struct GraphLoader;

impl GraphLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a graph from a file; `.yaml`/`.yml` are read as YAML, anything
    /// else as JSON.
    pub fn load_graph<P: AsRef<Path>>(&self, path: P) -> Result<Graph, FlowError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        let graph = if is_yaml {
            Self::parse_yaml(&content)?
        } else {
            Self::parse_json(&content)?
        };
        log::info!(
            "Loaded workflow '{}' ({} nodes, {} edges) from {}",
            graph.name,
            graph.nodes.len(),
            graph.edges.len(),
            path.display()
        );
        Ok(graph)
    }

    /// Parse a graph from a JSON string
    pub fn parse_json(content: &str) -> Result<Graph, FlowError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a graph from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Graph, FlowError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Pretty-printed JSON
    pub fn to_json(graph: &Graph) -> Result<String, FlowError> {
        Ok(serde_json::to_string_pretty(graph)?)
    }

    /// Write a graph as pretty-printed JSON
    pub fn save_graph<P: AsRef<Path>>(&self, graph: &Graph, path: P) -> Result<(), FlowError> {
        fs::write(path, Self::to_json(graph)?)?;
        Ok(())
    }
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self::new()
    }
}
