pub mod editor;
pub mod graph;
pub mod session;
pub mod utils;
