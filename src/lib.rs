use std::sync::Arc;

use crate::config::EditorConfig;
use crate::domain::session::WorkflowSession;
use crate::error::Result;
use crate::service::HttpWorkflowService;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod service;
pub mod shell;

/// Connects to the configured workflow service and opens an editing session
/// with a freshly fetched catalog.
pub async fn open_session(config: &EditorConfig) -> Result<WorkflowSession> {
    let service = HttpWorkflowService::new(&config.service)?;
    log::info!("Using workflow service at {}", config.service.base_url);

    Ok(WorkflowSession::open(Arc::new(service), config.canvas).await)
}
