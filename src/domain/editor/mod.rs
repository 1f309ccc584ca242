pub mod code_viewer;
pub mod node_editor;

pub use code_viewer::CodeViewer;
pub use node_editor::NodeEditor;
