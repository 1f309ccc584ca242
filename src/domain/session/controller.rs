use std::sync::Arc;

use crate::api::workflow_dto::{GraphPayloadDto, RunResponseDto, SaveAckDto, WorkflowDraftDto, WorkflowRecordDto};
use crate::domain::editor::{CodeViewer, NodeEditor};
use crate::domain::graph::{CanvasBounds, GraphModel, Node, NodeChange};
use crate::domain::session::gate::{RequestGate, RequestKind, RequestToken};
use crate::domain::session::record::{WorkflowName, WorkflowRecord};
use crate::domain::session::state::{Notice, RunState, SessionState};
use crate::domain::utils::id::NodeId;
use crate::error::{Error, Result};
use crate::service::WorkflowService;

/// How a run request ended, as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    CodeReady(String),
    MissingCode,
    Failed(String),
    /// A newer run was issued before this one settled; its result was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    InvalidName,
    Failed(String),
}

/// Drives one editing session: owns the session state and talks to the workflow service.
///
/// Every remote call is split into `begin_*`, which snapshots what is sent and
/// issues a [`RequestToken`], and `finish_*`, which applies the settled result.
/// Results for runs and catalog listings that were overtaken by a newer request
/// of the same kind are discarded. `run`, `save` and `refresh_catalog` chain both
/// halves for callers that do not interleave requests.
#[derive(Debug)]
pub struct WorkflowSession {
    service: Arc<dyn WorkflowService>,
    state: SessionState,
    gate: RequestGate,
    bounds: CanvasBounds,
}

impl WorkflowSession {
    pub fn new(service: Arc<dyn WorkflowService>, bounds: CanvasBounds) -> Self {
        WorkflowSession { service, state: SessionState::new(), gate: RequestGate::new(), bounds }
    }

    /// Creates the session and fetches the workflow catalog once.
    pub async fn open(service: Arc<dyn WorkflowService>, bounds: CanvasBounds) -> Self {
        let mut session = Self::new(service, bounds);
        session.refresh_catalog().await;
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn graph(&self) -> &GraphModel {
        &self.state.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphModel {
        &mut self.state.graph
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.state.drain_notices()
    }

    pub fn add_node(&mut self) -> NodeId {
        self.state.graph.add_node(&self.bounds)
    }

    /// Deletes the selected node. An open node dialog for it is closed as well.
    pub fn delete_selected_node(&mut self) -> Option<Node> {
        let removed = self.state.graph.delete_selected_node()?;
        self.close_orphaned_editor();
        Some(removed)
    }

    /// Applies canvas node deltas. A node dialog whose node was removed is closed.
    pub fn apply_node_changes<I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = NodeChange>,
    {
        self.state.graph.apply_node_changes(changes);
        self.close_orphaned_editor();
    }

    fn close_orphaned_editor(&mut self) {
        let orphaned = self.state.node_editor.as_ref().is_some_and(|editor| !self.state.graph.contains_node(editor.node_id()));
        if orphaned {
            log::debug!("Closing node dialog, its node was removed");
            self.state.node_editor = None;
        }
    }

    // --- catalog ---

    pub async fn refresh_catalog(&mut self) -> bool {
        let token = self.begin_catalog_refresh();
        let result = Arc::clone(&self.service).list_workflows().await;
        self.finish_catalog_refresh(token, result)
    }

    pub fn begin_catalog_refresh(&mut self) -> RequestToken {
        self.issue(RequestKind::Catalog)
    }

    /// Replaces the cached catalog on success. Failures are logged only and keep the old cache.
    pub fn finish_catalog_refresh(&mut self, token: RequestToken, result: Result<Vec<WorkflowRecordDto>>) -> bool {
        if !self.accept(&token) {
            return false;
        }

        match result {
            Ok(records) => {
                let mut catalog = Vec::with_capacity(records.len());
                for dto in records {
                    match WorkflowRecord::try_from(dto) {
                        Ok(record) => catalog.push(record),
                        Err(e) => log::warn!("Skipping unreadable workflow record: {}", e),
                    }
                }
                log::info!("Fetched {} workflow(s)", catalog.len());
                self.state.catalog = catalog;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching workflows");
                false
            }
        }
    }

    /// Replaces the graph with the cached workflow named `name`.
    ///
    /// Unknown or empty names leave the current graph untouched.
    pub fn load(&mut self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }

        let Some(record) = self.state.find_record(name).cloned() else {
            log::debug!("No cached workflow named '{}'", name);
            return false;
        };

        self.state.graph.replace_graph(record.nodes, record.edges);
        self.state.node_editor = None;
        self.state.active_workflow = Some(record.name);
        log::info!("Loaded workflow '{}' ({})", name, record.id);
        true
    }

    // --- save ---

    /// Opens the name prompt of the save dialog.
    pub fn begin_save(&mut self) {
        self.state.name_prompt_open = true;
    }

    pub fn cancel_save(&mut self) {
        self.state.name_prompt_open = false;
    }

    /// Validates the prompt input and saves under that name.
    ///
    /// Blank input is reported to the user and never reaches the service.
    pub async fn submit_save_name(&mut self, input: Option<&str>) -> SaveOutcome {
        self.state.name_prompt_open = false;

        match WorkflowName::parse(input) {
            Ok(name) => self.save(name).await,
            Err(e) => {
                self.state.notify(Notice::error(format!("{}!", e)));
                SaveOutcome::InvalidName
            }
        }
    }

    /// Saves the current graph and refreshes the catalog if that worked.
    pub async fn save(&mut self, name: WorkflowName) -> SaveOutcome {
        let (token, draft) = self.begin_save_request(&name);
        let result = Arc::clone(&self.service).save_workflow(&draft).await;
        let outcome = self.finish_save(token, &name, result);

        // A newer save refreshes the catalog itself.
        if outcome == SaveOutcome::Saved && self.gate.is_current(&token) {
            self.refresh_catalog().await;
        }
        outcome
    }

    pub fn begin_save_request(&mut self, name: &WorkflowName) -> (RequestToken, WorkflowDraftDto) {
        let token = self.issue(RequestKind::Save);
        (token, self.state.graph.draft(name))
    }

    /// Reports the save result. The local graph is never changed here.
    pub fn finish_save(&mut self, token: RequestToken, name: &WorkflowName, result: Result<SaveAckDto>) -> SaveOutcome {
        tracing::debug!(kind = ?token.kind, generation = token.generation, current = self.gate.is_current(&token), "request settled");

        match result {
            Ok(ack) => {
                log::info!("Workflow '{}' saved ({})", name, ack.message.as_deref().unwrap_or("no message"));
                self.state.notify(Notice::info(format!("Workflow \"{}\" saved.", name)));
                SaveOutcome::Saved
            }
            Err(e) => {
                log::error!("Error saving workflow '{}': {}", name, e);
                self.state.notify(Notice::error("Failed to save workflow."));
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    // --- run ---

    pub async fn run(&mut self) -> RunOutcome {
        let (token, payload) = self.begin_run();
        let result = Arc::clone(&self.service).run_workflow(&payload).await;
        self.finish_run(token, result)
    }

    /// Enters `Submitting` and snapshots the graph for the run request.
    pub fn begin_run(&mut self) -> (RequestToken, GraphPayloadDto) {
        let token = self.issue(RequestKind::Run);
        self.state.run_state = RunState::Submitting(token);
        (token, self.state.graph.payload())
    }

    pub fn finish_run(&mut self, token: RequestToken, result: Result<RunResponseDto>) -> RunOutcome {
        if !self.accept(&token) {
            return RunOutcome::Stale;
        }

        // An empty code string counts as no code at all.
        let code = result.and_then(|response| {
            response.generated_code.filter(|code| !code.is_empty()).ok_or(Error::MissingGeneratedCode)
        });

        match code {
            Ok(code) => {
                self.state.notify(Notice::info("Workflow executed! Code generated."));
                self.state.run_state = RunState::ViewingCode(CodeViewer::new(code.clone()));
                RunOutcome::CodeReady(code)
            }
            Err(Error::MissingGeneratedCode) => {
                log::warn!("Run finished without generated code");
                self.state.notify(Notice::error("Failed to generate code."));
                self.state.run_state = RunState::Idle;
                RunOutcome::MissingCode
            }
            Err(e) => {
                log::error!("Error running workflow: {}", e);
                self.state.notify(Notice::error("Failed to run workflow."));
                self.state.run_state = RunState::Idle;
                RunOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn close_code_viewer(&mut self) {
        if matches!(self.state.run_state, RunState::ViewingCode(_)) {
            self.state.run_state = RunState::Idle;
        }
    }

    // --- node dialog ---

    pub fn open_node_editor(&mut self) -> bool {
        self.state.node_editor = NodeEditor::open(&self.state.graph);
        self.state.node_editor.is_some()
    }

    pub fn node_editor_mut(&mut self) -> Option<&mut NodeEditor> {
        self.state.node_editor.as_mut()
    }

    /// The dialog's "Save Node Name" button.
    pub fn apply_node_label(&mut self) -> bool {
        match &self.state.node_editor {
            Some(editor) => editor.apply_label(&mut self.state.graph),
            None => false,
        }
    }

    pub fn commit_node_editor(&mut self) -> bool {
        match self.state.node_editor.take() {
            Some(editor) => editor.commit(&mut self.state.graph),
            None => false,
        }
    }

    pub fn cancel_node_editor(&mut self) {
        self.state.node_editor = None;
    }

    fn issue(&mut self, kind: RequestKind) -> RequestToken {
        let token = self.gate.issue(kind);
        tracing::debug!(kind = ?token.kind, generation = token.generation, "request issued");
        token
    }

    fn accept(&self, token: &RequestToken) -> bool {
        if self.gate.is_current(token) {
            return true;
        }
        tracing::info!(kind = ?token.kind, generation = token.generation, "discarding stale response");
        false
    }
}
