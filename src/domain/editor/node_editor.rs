use crate::domain::graph::GraphModel;
use crate::domain::utils::id::NodeId;

/// Working copy of a node's label and statements while the node dialog is open.
///
/// The graph is only touched by `apply_label` and `commit`. Dropping the editor
/// (cancel) discards every pending edit.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEditor {
    node_id: NodeId,
    label_input: String,
    statements: Vec<String>,
}

impl NodeEditor {
    /// Seeds the editor from the selected node. Sentinels are not editable.
    pub fn open(graph: &GraphModel) -> Option<Self> {
        let node = graph.selected_node()?;
        if node.is_sentinel() {
            return None;
        }

        Some(NodeEditor {
            node_id: node.id.clone(),
            label_input: node.data.label.clone(),
            statements: node.data.statements.clone(),
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn label_input(&self) -> &str {
        &self.label_input
    }

    pub fn set_label_input(&mut self, label: impl Into<String>) {
        self.label_input = label.into();
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn add_statement(&mut self) {
        self.statements.push(String::new());
    }

    pub fn update_statement(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.statements.get_mut(index) {
            Some(statement) => {
                *statement = value.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_statement(&mut self, index: usize) -> bool {
        if index < self.statements.len() {
            self.statements.remove(index);
            true
        } else {
            false
        }
    }

    /// Renames the node right away, leaving the statement buffer pending.
    pub fn apply_label(&self, graph: &mut GraphModel) -> bool {
        graph.rename_node(&self.node_id, Some(&self.label_input))
    }

    /// Writes label and statements back to the node. Returns false if the node is gone.
    pub fn commit(self, graph: &mut GraphModel) -> bool {
        self.apply_label(graph);
        graph.set_node_statements(&self.node_id, self.statements)
    }
}
