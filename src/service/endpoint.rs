use reqwest::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEndpoint {
    ListWorkflows,
    SaveWorkflow,
    RunWorkflow,
}

impl WorkflowEndpoint {
    pub fn path(&self) -> &str {
        match self {
            Self::ListWorkflows | Self::SaveWorkflow => "/workflows",
            Self::RunWorkflow => "/run-workflow",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::ListWorkflows => Method::GET,
            Self::SaveWorkflow | Self::RunWorkflow => Method::POST,
        }
    }
}
