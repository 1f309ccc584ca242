pub mod changes;
pub mod edge;
pub mod model;
pub mod node;


pub use changes::{EdgeChange, NodeChange};
pub use edge::{Connection, Edge};
pub use model::{CanvasBounds, GraphModel};
pub use node::{Dimensions, END_NODE_ID, Node, NodeData, NodeType, Position, START_NODE_ID};
