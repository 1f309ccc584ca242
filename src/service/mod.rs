pub mod endpoint;
pub mod http;

use async_trait::async_trait;

use crate::api::workflow_dto::{GraphPayloadDto, RunResponseDto, SaveAckDto, WorkflowDraftDto, WorkflowRecordDto};
use crate::error::Result;

pub use endpoint::WorkflowEndpoint;
pub use http::HttpWorkflowService;

/// Remote store and code generator for workflows.
///
/// A successful `run_workflow` without generated code is not an error at this
/// level; the session reports it separately.
#[async_trait]
pub trait WorkflowService: std::fmt::Debug + Send + Sync {
    async fn list_workflows(&self) -> Result<Vec<WorkflowRecordDto>>;

    async fn save_workflow(&self, draft: &WorkflowDraftDto) -> Result<SaveAckDto>;

    async fn run_workflow(&self, payload: &GraphPayloadDto) -> Result<RunResponseDto>;
}
