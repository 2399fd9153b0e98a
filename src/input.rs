//! Task input values and their normalization
//!
//! The API accepts the same logical input list in three shapes: a plain
//! object map, a flat `{handle, value}` list, or a per-node list. They
//! are modeled as one untagged union with a single normalization into
//! the canonical per-node form; nothing downstream branches on shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node id used when the caller did not address a specific node
pub const DEFAULT_NODE_ID: &str = "_";

/// One named input value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputValue {
    pub handle: String,
    pub value: Value,
}

/// Input values addressed to one flow node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInputs {
    #[serde(rename = "nodeId")]
    pub node_id: String,
    pub inputs: Vec<InputValue>,
}

/// The three interchangeable shapes of a task's input values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskInputValues {
    /// `[{nodeId, inputs: [...]}]`, the canonical wire form
    Nodes(Vec<NodeInputs>),
    /// `[{handle, value}]`, a flat list attached to the default node
    Handles(Vec<InputValue>),
    /// `{handle: value, ...}`, an object map attached to the default node
    Map(Map<String, Value>),
}

impl TaskInputValues {
    /// Normalize to the canonical per-node representation
    pub fn normalize(&self) -> Vec<NodeInputs> {
        match self {
            Self::Nodes(nodes) => nodes.clone(),
            Self::Handles(inputs) => vec![NodeInputs {
                node_id: DEFAULT_NODE_ID.to_string(),
                inputs: inputs.clone(),
            }],
            Self::Map(map) => vec![NodeInputs {
                node_id: DEFAULT_NODE_ID.to_string(),
                inputs: map
                    .iter()
                    .map(|(handle, value)| InputValue {
                        handle: handle.clone(),
                        value: value.clone(),
                    })
                    .collect(),
            }],
        }
    }

    /// Flatten to an object map, used when merging applet presets
    ///
    /// Per-node lists flatten the first node only; the applet surface
    /// supports single-node blocks.
    pub fn flatten(&self) -> Map<String, Value> {
        match self {
            Self::Map(map) => map.clone(),
            Self::Handles(inputs) => inputs
                .iter()
                .map(|input| (input.handle.clone(), input.value.clone()))
                .collect(),
            Self::Nodes(nodes) => nodes
                .first()
                .map(|node| {
                    node.inputs
                        .iter()
                        .map(|input| (input.handle.clone(), input.value.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl From<Map<String, Value>> for TaskInputValues {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<InputValue>> for TaskInputValues {
    fn from(inputs: Vec<InputValue>) -> Self {
        Self::Handles(inputs)
    }
}

impl From<Vec<NodeInputs>> for TaskInputValues {
    fn from(nodes: Vec<NodeInputs>) -> Self {
        Self::Nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_map() {
        let values: TaskInputValues =
            serde_json::from_value(json!({"text": "hello", "count": 3})).unwrap();
        let nodes = values.normalize();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node_id, DEFAULT_NODE_ID);
        assert_eq!(nodes[0].inputs.len(), 2);
    }

    #[test]
    fn test_normalize_handle_list() {
        let values: TaskInputValues =
            serde_json::from_value(json!([{"handle": "text", "value": "hello"}])).unwrap();
        let nodes = values.normalize();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node_id, DEFAULT_NODE_ID);
        assert_eq!(nodes[0].inputs[0].handle, "text");
    }

    #[test]
    fn test_normalize_node_list_passthrough() {
        let values: TaskInputValues = serde_json::from_value(json!([
            {"nodeId": "n-1", "inputs": [{"handle": "text", "value": "hello"}]},
            {"nodeId": "n-2", "inputs": []},
        ]))
        .unwrap();
        let nodes = values.normalize();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].node_id, "n-1");
        assert_eq!(nodes[1].node_id, "n-2");
    }

    #[test]
    fn test_untagged_shapes_distinguished() {
        let map: TaskInputValues = serde_json::from_value(json!({"a": 1})).unwrap();
        assert!(matches!(map, TaskInputValues::Map(_)));

        let handles: TaskInputValues =
            serde_json::from_value(json!([{"handle": "a", "value": 1}])).unwrap();
        assert!(matches!(handles, TaskInputValues::Handles(_)));

        let nodes: TaskInputValues =
            serde_json::from_value(json!([{"nodeId": "n", "inputs": []}])).unwrap();
        assert!(matches!(nodes, TaskInputValues::Nodes(_)));
    }

    #[test]
    fn test_flatten_prefers_first_node() {
        let values = TaskInputValues::Nodes(vec![
            NodeInputs {
                node_id: "n-1".to_string(),
                inputs: vec![InputValue {
                    handle: "text".to_string(),
                    value: json!("hello"),
                }],
            },
            NodeInputs {
                node_id: "n-2".to_string(),
                inputs: vec![InputValue {
                    handle: "other".to_string(),
                    value: json!("ignored"),
                }],
            },
        ]);

        let flat = values.flatten();
        assert_eq!(flat.get("text"), Some(&json!("hello")));
        assert!(!flat.contains_key("other"));
    }

    #[test]
    fn test_flatten_empty_nodes() {
        let values = TaskInputValues::Nodes(Vec::new());
        assert!(values.flatten().is_empty());
    }

    #[test]
    fn test_canonical_serialization() {
        let values: TaskInputValues = serde_json::from_value(json!({"text": "hi"})).unwrap();
        let wire = serde_json::to_value(values.normalize()).unwrap();

        assert_eq!(
            wire,
            json!([{"nodeId": "_", "inputs": [{"handle": "text", "value": "hi"}]}])
        );
    }
}
