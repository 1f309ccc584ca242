pub mod controller;
pub mod gate;
pub mod record;
pub mod state;

pub use controller::{RunOutcome, SaveOutcome, WorkflowSession};
pub use gate::{RequestGate, RequestKind, RequestToken};
pub use record::{WorkflowName, WorkflowRecord};
pub use state::{Notice, NoticeLevel, RunState, SessionState};
