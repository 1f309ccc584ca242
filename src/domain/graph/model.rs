use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::graph::changes::{EdgeChange, NodeChange};
use crate::domain::graph::edge::{Connection, Edge};
use crate::domain::graph::node::{Node, NodeType, Position, is_sentinel_id};
use crate::domain::utils::id::{EdgeId, NodeId};

/// Visible area in which new nodes are placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasBounds {
    fn default() -> Self {
        CanvasBounds { width: 600.0, height: 400.0 }
    }
}

/// Authoritative node/edge collections of the editor plus the current selection.
///
/// Every mutation keeps two invariants:
/// - each edge references two existing nodes, and
/// - the `start` and `end` sentinels can not be removed.
///
/// Operations never fail. A call whose precondition does not hold
/// (no selection, sentinel target, empty input) leaves the model unchanged and
/// reports this through its return value.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    selection: Option<NodeId>,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphModel {
    /// A fresh graph containing only the two sentinels.
    pub fn new() -> Self {
        GraphModel { nodes: vec![Node::start(), Node::end()], edges: Vec::new(), selection: None }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| &node.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn incident_edges<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.touches(id))
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.selection.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.as_ref().and_then(|id| self.node(id))
    }

    /// Node-click handler. Returns false if the node does not exist.
    pub fn select_node(&mut self, id: &NodeId) -> bool {
        if !self.contains_node(id) {
            log::debug!("Ignoring selection of unknown node {}", id);
            return false;
        }
        self.selection = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Applies a batch of node deltas produced by the canvas.
    pub fn apply_node_changes<I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = NodeChange>,
    {
        for change in changes {
            match change {
                NodeChange::Position { id, position } => {
                    if let (Some(node), Some(position)) = (self.node_mut(&id), position) {
                        node.position = position;
                    }
                }
                NodeChange::Dimensions { id, dimensions } => {
                    if let Some(node) = self.node_mut(&id) {
                        node.dimensions = dimensions;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if selected {
                        self.select_node(&id);
                    } else if self.selection.as_ref() == Some(&id) {
                        self.selection = None;
                    }
                }
                NodeChange::Remove { id } => {
                    if self.remove_node(&id).is_none() {
                        log::warn!("Canvas requested removal of node {} which is protected or unknown", id);
                    }
                }
                NodeChange::Add { node } => {
                    if self.contains_node(&node.id) {
                        log::warn!("Canvas added node {} twice, keeping the existing one", node.id);
                    } else {
                        self.nodes.push(node);
                    }
                }
            }
        }
    }

    /// Applies a batch of edge deltas produced by the canvas.
    pub fn apply_edge_changes<I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = EdgeChange>,
    {
        for change in changes {
            match change {
                EdgeChange::Select { id, selected } => {
                    for edge in self.edges.iter_mut().filter(|edge| edge.id == id) {
                        edge.selected = selected;
                    }
                }
                EdgeChange::Remove { id } => {
                    self.edges.retain(|edge| edge.id != id);
                }
                EdgeChange::Add { edge } => {
                    if self.contains_node(&edge.source) && self.contains_node(&edge.target) {
                        self.edges.push(edge);
                    } else {
                        log::warn!("Dropping edge {} with a missing endpoint", edge.id);
                    }
                }
            }
        }
    }

    /// Appends an edge for the connection if both endpoints exist.
    ///
    /// Several edges between the same ordered pair are allowed; they share the derived id.
    pub fn connect(&mut self, connection: Connection) -> Option<EdgeId> {
        if !self.contains_node(&connection.source) || !self.contains_node(&connection.target) {
            log::debug!("Ignoring connection {} -> {}: unknown endpoint", connection.source, connection.target);
            return None;
        }

        let edge = Edge::from(connection);
        let id = edge.id.clone();
        self.edges.push(edge);
        Some(id)
    }

    /// Adds a `default` node at a random spot inside `bounds`.
    pub fn add_node(&mut self, bounds: &CanvasBounds) -> NodeId {
        self.add_node_with_rng(bounds, &mut rand::rng())
    }

    pub fn add_node_with_rng<R: Rng>(&mut self, bounds: &CanvasBounds, rng: &mut R) -> NodeId {
        let id = NodeId::new(Uuid::new_v4().to_string());
        let position = Position::new(coordinate(rng, bounds.width), coordinate(rng, bounds.height));
        let label = format!("Node {}", self.nodes.len());

        self.nodes.push(Node::new(id.clone(), position, NodeType::Default, label));
        log::debug!("Added node {} at ({:.1}, {:.1})", id, position.x, position.y);
        id
    }

    /// Removes a node together with every edge that references it.
    ///
    /// Sentinels are never removed. Returns the removed node.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        if is_sentinel_id(id) {
            return None;
        }

        let index = self.nodes.iter().position(|node| &node.id == id)?;
        let node = self.nodes.remove(index);

        let edges_before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));

        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }

        log::debug!("Removed node {} and {} incident edge(s)", id, edges_before - self.edges.len());
        Some(node)
    }

    /// Deletes the selected node unless nothing or a sentinel is selected.
    pub fn delete_selected_node(&mut self) -> Option<Node> {
        let id = self.selection.clone()?;
        self.remove_node(&id)
    }

    /// Sets the selected node's label. Empty or absent labels are ignored.
    pub fn rename_selected(&mut self, label: Option<&str>) -> bool {
        match self.selection.clone() {
            Some(id) => self.rename_node(&id, label),
            None => false,
        }
    }

    pub fn rename_node(&mut self, id: &NodeId, label: Option<&str>) -> bool {
        let Some(label) = label.filter(|label| !label.is_empty()) else {
            return false;
        };

        match self.node_mut(id) {
            Some(node) => {
                node.data.label = label.to_string();
                true
            }
            None => false,
        }
    }

    /// Replaces the selected node's statements wholesale.
    pub fn set_statements(&mut self, statements: Vec<String>) -> bool {
        match self.selection.clone() {
            Some(id) => self.set_node_statements(&id, statements),
            None => false,
        }
    }

    pub fn set_node_statements(&mut self, id: &NodeId, statements: Vec<String>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.data.statements = statements;
                true
            }
            None => false,
        }
    }

    /// Swaps in a complete graph, e.g. a workflow loaded from the catalog.
    ///
    /// Edges whose endpoints are missing from `nodes` are dropped. Selection is cleared.
    pub fn replace_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.selection = None;

        let (kept, dangling): (Vec<Edge>, Vec<Edge>) =
            edges.into_iter().partition(|edge| self.contains_node(&edge.source) && self.contains_node(&edge.target));

        for edge in &dangling {
            log::warn!("Dropping edge {} ({} -> {}): endpoint not part of the graph", edge.id, edge.source, edge.target);
        }
        self.edges = kept;
    }
}

fn coordinate<R: Rng>(rng: &mut R, extent: f64) -> f64 {
    if extent > 0.0 { rng.random_range(0.0..extent) } else { 0.0 }
}
