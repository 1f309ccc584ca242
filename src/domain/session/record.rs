use std::fmt;

use crate::api::workflow_dto::{EdgeDto, GraphPayloadDto, NodeDto, WorkflowDraftDto, WorkflowRecordDto};
use crate::domain::graph::{Edge, GraphModel, Node};
use crate::domain::utils::id::RecordId;
use crate::error::{Error, Result};

/// A validated, non-blank workflow name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowName(String);

impl WorkflowName {
    /// Accepts the raw prompt input. Absent, empty and whitespace-only input is rejected.
    pub fn parse(input: Option<&str>) -> Result<Self> {
        match input.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(WorkflowName(name.to_string())),
            _ => Err(Error::InvalidWorkflowName),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted workflow as listed by the workflow service.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRecord {
    pub id: RecordId,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl TryFrom<WorkflowRecordDto> for WorkflowRecord {
    type Error = Error;

    fn try_from(dto: WorkflowRecordDto) -> Result<Self> {
        let id = RecordId::new(dto.record_id());
        let workflow = dto.workflow;

        let nodes = workflow
            .nodes
            .unwrap_or_default()
            .into_iter()
            .map(Node::try_from)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| Error::ModelConstructionError(format!("Workflow '{}' ({}): {}", workflow.name, id, e)))?;

        let edges = workflow.edges.unwrap_or_default().into_iter().map(Edge::from).collect();

        Ok(WorkflowRecord { id, name: workflow.name, nodes, edges })
    }
}

// Snapshots sent to the workflow service.
impl GraphModel {
    pub fn payload(&self) -> GraphPayloadDto {
        GraphPayloadDto {
            nodes: self.nodes().iter().map(NodeDto::from).collect(),
            edges: self.edges().iter().map(EdgeDto::from).collect(),
        }
    }

    pub fn draft(&self, name: &WorkflowName) -> WorkflowDraftDto {
        let GraphPayloadDto { nodes, edges } = self.payload();
        WorkflowDraftDto { name: name.to_string(), nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_name_rejects_blank_input() {
        assert!(matches!(WorkflowName::parse(None), Err(Error::InvalidWorkflowName)));
        assert!(matches!(WorkflowName::parse(Some("")), Err(Error::InvalidWorkflowName)));
        assert!(matches!(WorkflowName::parse(Some("   ")), Err(Error::InvalidWorkflowName)));
        assert_eq!(WorkflowName::parse(Some(" etl ")).unwrap().as_str(), "etl");
    }

    #[test]
    fn record_with_unknown_node_type_is_rejected() {
        let dto: WorkflowRecordDto = serde_json::from_value(serde_json::json!({
            "_id": "r1",
            "workflow": { "name": "A", "nodes": [{ "id": "g", "type": "group", "position": { "x": 0, "y": 0 } }] }
        }))
        .unwrap();

        assert!(matches!(WorkflowRecord::try_from(dto), Err(Error::ModelConstructionError(_))));
    }

    #[test]
    fn draft_carries_name_and_full_graph() {
        let graph = GraphModel::new();
        let name = WorkflowName::parse(Some("nightly")).unwrap();

        let draft = graph.draft(&name);

        assert_eq!(draft.name, "nightly");
        assert_eq!(draft.nodes.len(), 2);
        assert_eq!(draft.nodes[0].id, "start");
        assert_eq!(draft.nodes[0].node_type.as_deref(), Some("input"));
        assert!(draft.edges.is_empty());
    }
}
