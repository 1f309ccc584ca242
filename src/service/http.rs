use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;

use crate::api::workflow_dto::{GraphPayloadDto, RunResponseDto, SaveAckDto, WorkflowDraftDto, WorkflowRecordDto};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::service::WorkflowService;
use crate::service::endpoint::WorkflowEndpoint;

/// `WorkflowService` backed by the workflow REST API.
#[derive(Debug, Clone)]
pub struct HttpWorkflowService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkflowService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(HttpWorkflowService { client: builder.build()?, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    pub fn url(&self, endpoint: WorkflowEndpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn request(&self, endpoint: WorkflowEndpoint) -> RequestBuilder {
        self.client.request(endpoint.method(), self.url(endpoint))
    }

    /// Sends the request and returns the body of a successful response.
    async fn execute(&self, endpoint: WorkflowEndpoint, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            log::debug!("{:?} answered {} ({} bytes)", endpoint, status, body_text.len());
            Ok(body_text)
        } else {
            log::error!(
                "Request to workflow service failed.\nEndpoint: <<{:?}>>\nUrl: <<{}>>\nResponse-Status-Code: <<{}>>\nResponse-Body: <<{}>>",
                endpoint,
                self.url(endpoint),
                status,
                body_text
            );
            Err(Error::RemoteStatus { status: status.as_u16(), body: body_text })
        }
    }
}

#[async_trait]
impl WorkflowService for HttpWorkflowService {
    async fn list_workflows(&self) -> Result<Vec<WorkflowRecordDto>> {
        let endpoint = WorkflowEndpoint::ListWorkflows;
        let body = self.execute(endpoint, self.request(endpoint)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn save_workflow(&self, draft: &WorkflowDraftDto) -> Result<SaveAckDto> {
        let endpoint = WorkflowEndpoint::SaveWorkflow;
        let body = self.execute(endpoint, self.request(endpoint).json(draft)).await?;

        // Any 2xx counts as an acknowledgement, whatever the body looks like.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn run_workflow(&self, payload: &GraphPayloadDto) -> Result<RunResponseDto> {
        let endpoint = WorkflowEndpoint::RunWorkflow;
        let body = self.execute(endpoint, self.request(endpoint).json(payload)).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn service(base_url: String) -> HttpWorkflowService {
        HttpWorkflowService::new(&ServiceConfig { base_url, timeout_secs: Some(5) }).unwrap()
    }

    fn empty_payload() -> GraphPayloadDto {
        GraphPayloadDto { nodes: Vec::new(), edges: Vec::new() }
    }

    #[test]
    fn url_joins_base_and_endpoint_path() {
        let service = service("http://localhost:5000/api/".to_string());
        assert_eq!(service.url(WorkflowEndpoint::RunWorkflow), "http://localhost:5000/api/run-workflow");
        assert_eq!(service.url(WorkflowEndpoint::ListWorkflows), "http://localhost:5000/api/workflows");
    }

    #[tokio::test]
    async fn lists_workflow_records() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/workflows")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{ "_id": "r1", "workflow": { "name": "A", "nodes": [], "edges": [] } }]"#)
            .create_async()
            .await;

        let records = service(server.url()).list_workflows().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].workflow.name, "A");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn save_posts_draft_and_accepts_plain_text_ack() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/workflows")
            .match_body(Matcher::PartialJson(serde_json::json!({ "name": "nightly" })))
            .with_status(201)
            .with_body("Workflow saved")
            .create_async()
            .await;

        let draft = WorkflowDraftDto { name: "nightly".to_string(), nodes: Vec::new(), edges: Vec::new() };
        let ack = service(server.url()).save_workflow(&draft).await.unwrap();

        assert_eq!(ack, SaveAckDto::default());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn run_returns_generated_code() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/run-workflow")
            .match_body(Matcher::Json(serde_json::json!({ "nodes": [], "edges": [] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "pyspark_code": "print(1)" }"#)
            .create_async()
            .await;

        let response = service(server.url()).run_workflow(&empty_payload()).await.unwrap();

        assert_eq!(response.generated_code.as_deref(), Some("print(1)"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_becomes_remote_status_error() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("POST", "/run-workflow").with_status(500).with_body("boom").create_async().await;

        let result = service(server.url()).run_workflow(&empty_payload()).await;

        match result {
            Err(Error::RemoteStatus { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
