use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionDto {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NodeDataDto {
    #[serde(default)]
    pub label: String,

    /// Nodes created on the canvas carry no statements until edited.
    #[serde(default)]
    pub statements: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDto {
    pub id: String,

    #[serde(default)]
    pub position: PositionDto,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    #[serde(default)]
    pub data: NodeDataDto,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Captures canvas attributes (positionAbsolute, dragging, ...) that are stored but not interpreted
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDto {
    /// May be missing in hand-written records; derived from the endpoints then.
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Body of the save request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkflowDraftDto {
    pub name: String,
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

/// Body of the run request. Same graph as a draft, without a name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphPayloadDto {
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

/// The workflow as embedded in a stored record. Node and edge arrays may be absent or null.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredWorkflowDto {
    pub name: String,

    #[serde(default)]
    pub nodes: Option<Vec<NodeDto>>,

    #[serde(default)]
    pub edges: Option<Vec<EdgeDto>>,
}

/// One entry of the workflow listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkflowRecordDto {
    /// Opaque store id, usually a string but kept as raw JSON.
    #[serde(rename = "_id", alias = "id")]
    pub id: Value,

    pub workflow: StoredWorkflowDto,
}

impl WorkflowRecordDto {
    pub fn record_id(&self) -> String {
        match &self.id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }
}

/// Acknowledgement of a save. The service may answer with any JSON body, or none.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SaveAckDto {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RunResponseDto {
    #[serde(rename = "pyspark_code", alias = "generatedCode", default)]
    pub generated_code: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tolerates_missing_and_null_collections() {
        let json = r#"[
            { "_id": "65f0", "workflow": { "name": "A" } },
            { "_id": { "$oid": "65f1" }, "workflow": { "name": "B", "nodes": null, "edges": [] } }
        ]"#;

        let records: Vec<WorkflowRecordDto> = serde_json::from_str(json).unwrap();

        assert_eq!(records[0].record_id(), "65f0");
        assert!(records[0].workflow.nodes.is_none());
        assert_eq!(records[1].record_id(), r#"{"$oid":"65f1"}"#);
        assert_eq!(records[1].workflow.edges.as_deref(), Some(&[][..]));
    }

    #[test]
    fn node_keeps_unknown_canvas_attributes() {
        let json = r#"{
            "id": "n1",
            "position": { "x": 1.5, "y": 2.0 },
            "data": { "label": "Read" },
            "positionAbsolute": { "x": 1.5, "y": 2.0 },
            "width": 150
        }"#;

        let node: NodeDto = serde_json::from_str(json).unwrap();

        assert!(node.node_type.is_none());
        assert!(node.data.statements.is_empty());
        assert_eq!(node.width, Some(150.0));
        assert!(node.extra.contains_key("positionAbsolute"));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["positionAbsolute"]["x"], 1.5);
        assert!(back.get("type").is_none());
    }

    #[test]
    fn run_response_accepts_both_code_field_names() {
        let legacy: RunResponseDto = serde_json::from_str(r#"{ "pyspark_code": "print(1)" }"#).unwrap();
        let camel: RunResponseDto = serde_json::from_str(r#"{ "generatedCode": "print(2)" }"#).unwrap();
        let empty: RunResponseDto = serde_json::from_str("{}").unwrap();

        assert_eq!(legacy.generated_code.as_deref(), Some("print(1)"));
        assert_eq!(camel.generated_code.as_deref(), Some("print(2)"));
        assert!(empty.generated_code.is_none());
    }
}
