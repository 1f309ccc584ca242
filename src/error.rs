use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse workflow JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to build internal graph model: {0}")]
    ModelConstructionError(String),

    #[error("Request to workflow service failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Workflow service answered with status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Workflow service response did not contain generated code")]
    MissingGeneratedCode,

    #[error("Workflow name is required")]
    InvalidWorkflowName,

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
