use crate::domain::editor::{CodeViewer, NodeEditor};
use crate::domain::graph::GraphModel;
use crate::domain::session::gate::RequestToken;
use crate::domain::session::record::WorkflowRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user, shown once by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Error, message: message.into() }
    }
}

/// `Idle -> Submitting -> ViewingCode | Idle`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Submitting(RequestToken),
    ViewingCode(CodeViewer),
}

/// Everything the editor holds between two user events.
#[derive(Debug, Default)]
pub struct SessionState {
    pub graph: GraphModel,

    /// Last successfully fetched workflow listing.
    pub catalog: Vec<WorkflowRecord>,

    /// Name of the workflow most recently loaded from the catalog.
    pub active_workflow: Option<String>,

    pub node_editor: Option<NodeEditor>,
    pub run_state: RunState,

    /// True while the save dialog waits for a workflow name.
    pub name_prompt_open: bool,

    notices: Vec<Notice>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn code_viewer(&self) -> Option<&CodeViewer> {
        match &self.run_state {
            RunState::ViewingCode(viewer) => Some(viewer),
            _ => None,
        }
    }

    pub fn find_record(&self, name: &str) -> Option<&WorkflowRecord> {
        self.catalog.iter().find(|record| record.name == name)
    }
}
