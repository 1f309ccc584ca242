use crate::domain::graph::edge::Edge;
use crate::domain::graph::node::{Dimensions, Node, Position};
use crate::domain::utils::id::{EdgeId, NodeId};

/// Structural delta reported by the canvas for a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// Drag updates. `position` is `None` while the canvas is still measuring.
    Position { id: NodeId, position: Option<Position> },
    Dimensions { id: NodeId, dimensions: Option<Dimensions> },
    Select { id: NodeId, selected: bool },
    Remove { id: NodeId },
    Add { node: Node },
}

/// Structural delta reported by the canvas for an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeChange {
    Select { id: EdgeId, selected: bool },
    Remove { id: EdgeId },
    Add { edge: Edge },
}
