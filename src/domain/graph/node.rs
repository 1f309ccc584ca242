use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::api::workflow_dto::{NodeDataDto, NodeDto, PositionDto};
use crate::domain::utils::id::NodeId;
use crate::error::Error;

/// Id of the entry sentinel present in every workflow.
pub const START_NODE_ID: &str = "start";

/// Id of the exit sentinel present in every workflow.
pub const END_NODE_ID: &str = "end";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Size of a node as measured by the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Role of a node on the canvas. `Input` and `Output` are used by the sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeType {
    Input,
    Output,
    #[default]
    Default,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Input => "input",
            NodeType::Output => "output",
            NodeType::Default => "default",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(NodeType::Input),
            "output" => Ok(NodeType::Output),
            "default" => Ok(NodeType::Default),
            other => Err(Error::ModelConstructionError(format!("Unknown node type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeData {
    pub label: String,

    /// Opaque units of logic, interpreted only by the remote code generator.
    pub statements: Vec<String>,
}

/// A step of the workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub node_type: NodeType,
    pub data: NodeData,

    /// Set once the canvas has measured the rendered node.
    pub dimensions: Option<Dimensions>,

    /// Canvas attributes that are not interpreted here but must survive a save.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Node {
    pub fn new(id: NodeId, position: Position, node_type: NodeType, label: impl Into<String>) -> Self {
        Node {
            id,
            position,
            node_type,
            data: NodeData { label: label.into(), statements: Vec::new() },
            dimensions: None,
            extra: HashMap::new(),
        }
    }

    pub fn start() -> Self {
        Node::new(NodeId::new(START_NODE_ID), Position::new(250.0, 50.0), NodeType::Input, "Start")
    }

    pub fn end() -> Self {
        Node::new(NodeId::new(END_NODE_ID), Position::new(250.0, 400.0), NodeType::Output, "End")
    }

    pub fn is_sentinel(&self) -> bool {
        is_sentinel_id(&self.id)
    }
}

pub fn is_sentinel_id(id: &NodeId) -> bool {
    id.as_str() == START_NODE_ID || id.as_str() == END_NODE_ID
}

impl TryFrom<NodeDto> for Node {
    type Error = Error;

    fn try_from(dto: NodeDto) -> Result<Self, Self::Error> {
        let node_type = match dto.node_type.as_deref() {
            Some(kind) => kind.parse()?,
            None => NodeType::Default,
        };

        let dimensions = match (dto.width, dto.height) {
            (Some(width), Some(height)) => Some(Dimensions { width, height }),
            _ => None,
        };

        Ok(Node {
            id: NodeId::new(dto.id),
            position: Position::new(dto.position.x, dto.position.y),
            node_type,
            data: NodeData { label: dto.data.label, statements: dto.data.statements },
            dimensions,
            extra: dto.extra,
        })
    }
}

impl From<&Node> for NodeDto {
    fn from(node: &Node) -> Self {
        NodeDto {
            id: node.id.to_string(),
            position: PositionDto { x: node.position.x, y: node.position.y },
            node_type: Some(node.node_type.as_str().to_string()),
            data: NodeDataDto { label: node.data.label.clone(), statements: node.data.statements.clone() },
            width: node.dimensions.map(|d| d.width),
            height: node.dimensions.map(|d| d.height),
            extra: node.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_have_fixed_roles() {
        let start = Node::start();
        let end = Node::end();

        assert!(start.is_sentinel());
        assert!(end.is_sentinel());
        assert_eq!(start.node_type, NodeType::Input);
        assert_eq!(end.node_type, NodeType::Output);
        assert_eq!(start.data.label, "Start");
        assert!(end.data.statements.is_empty());
    }

    #[test]
    fn node_type_parsing_rejects_unknown_kinds() {
        assert_eq!("output".parse::<NodeType>().unwrap(), NodeType::Output);
        assert!(matches!("group".parse::<NodeType>(), Err(Error::ModelConstructionError(_))));
    }

    #[test]
    fn dto_without_type_becomes_default_node() {
        let dto = NodeDto {
            id: "n1".to_string(),
            position: PositionDto { x: 3.0, y: 4.0 },
            node_type: None,
            data: NodeDataDto { label: "Node 2".to_string(), statements: vec!["a".to_string()] },
            width: Some(150.0),
            height: None,
            extra: HashMap::new(),
        };

        let node = Node::try_from(dto).unwrap();

        assert_eq!(node.node_type, NodeType::Default);
        assert_eq!(node.position, Position::new(3.0, 4.0));
        assert_eq!(node.data.statements, vec!["a".to_string()]);
        assert!(node.dimensions.is_none());

        let back = NodeDto::from(&node);
        assert_eq!(back.node_type.as_deref(), Some("default"));
        assert_eq!(back.data.label, "Node 2");
    }
}
