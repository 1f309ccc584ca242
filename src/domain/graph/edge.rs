use std::collections::HashMap;

use crate::api::workflow_dto::EdgeDto;
use crate::domain::utils::id::{EdgeId, NodeId};

/// A candidate edge produced by a connect gesture on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Connection { source, target, source_handle: None, target_handle: None }
    }

    /// Derives the edge id the same way the canvas does, so ids stay stable across saves.
    pub fn edge_id(&self) -> EdgeId {
        EdgeId::new(format!(
            "reactflow__edge-{}{}-{}{}",
            self.source,
            self.source_handle.as_deref().unwrap_or(""),
            self.target,
            self.target_handle.as_deref().unwrap_or("")
        ))
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub selected: bool,
    pub extra: HashMap<String, serde_json::Value>,
}

impl Edge {
    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }
}

impl From<Connection> for Edge {
    fn from(connection: Connection) -> Self {
        Edge {
            id: connection.edge_id(),
            source: connection.source,
            target: connection.target,
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            selected: false,
            extra: HashMap::new(),
        }
    }
}

impl From<EdgeDto> for Edge {
    fn from(dto: EdgeDto) -> Self {
        let connection = Connection {
            source: NodeId::new(dto.source),
            target: NodeId::new(dto.target),
            source_handle: dto.source_handle,
            target_handle: dto.target_handle,
        };

        let id = if dto.id.is_empty() { connection.edge_id() } else { EdgeId::new(dto.id) };

        Edge {
            id,
            source: connection.source,
            target: connection.target,
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            selected: dto.selected,
            extra: dto.extra,
        }
    }
}

impl From<&Edge> for EdgeDto {
    fn from(edge: &Edge) -> Self {
        EdgeDto {
            id: edge.id.to_string(),
            source: edge.source.to_string(),
            target: edge.target.to_string(),
            source_handle: edge.source_handle.clone(),
            target_handle: edge.target_handle.clone(),
            selected: edge.selected,
            extra: edge.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_id_includes_handles_when_present() {
        let mut connection = Connection::new(NodeId::new("a"), NodeId::new("b"));
        assert_eq!(connection.edge_id(), EdgeId::new("reactflow__edge-a-b"));

        connection.source_handle = Some("out".to_string());
        assert_eq!(connection.edge_id(), EdgeId::new("reactflow__edge-aout-b"));
    }

    #[test]
    fn touches_either_endpoint() {
        let edge = Edge::from(Connection::new(NodeId::new("a"), NodeId::new("b")));
        assert!(edge.touches(&NodeId::new("a")));
        assert!(edge.touches(&NodeId::new("b")));
        assert!(!edge.touches(&NodeId::new("c")));
    }

    #[test]
    fn dto_without_id_gets_derived_id() {
        let dto = EdgeDto {
            id: String::new(),
            source: "start".to_string(),
            target: "x".to_string(),
            source_handle: None,
            target_handle: None,
            selected: false,
            extra: HashMap::new(),
        };

        let edge = Edge::from(dto);
        assert_eq!(edge.id, EdgeId::new("reactflow__edge-start-x"));
    }
}
