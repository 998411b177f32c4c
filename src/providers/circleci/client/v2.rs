//! Resource calls against the modern (v2) API.

use reqwest::StatusCode;

use crate::error::Result;
use crate::providers::circleci::filters::{JobFilter, PipelineFilter, WorkflowFilter};
use crate::providers::circleci::types::{Job, JobInfo, Pipeline, Workflow};

use super::CircleClient;

impl CircleClient {
    /// List the project's pipelines, keeping those accepted by `filter`.
    pub async fn list_pipelines(
        &self,
        filter: &PipelineFilter,
        max_calls: u32,
    ) -> Result<Vec<Pipeline>> {
        let url = format!("{}/project/{}/pipeline", self.api_v2_url(), self.slug());
        self.get_paged(&url, |p: &Pipeline| filter.matches(p), max_calls)
            .await
    }

    /// List a pipeline's workflows, keeping those accepted by `filter`.
    pub async fn list_workflows(
        &self,
        pipeline_id: &str,
        filter: &WorkflowFilter,
        max_calls: u32,
    ) -> Result<Vec<Workflow>> {
        let url = format!("{}/pipeline/{}/workflow", self.api_v2_url(), pipeline_id);
        self.get_paged(&url, |w: &Workflow| filter.matches(w), max_calls)
            .await
    }

    /// List a workflow's jobs, keeping those accepted by `filter`.
    pub async fn list_jobs(
        &self,
        workflow_id: &str,
        filter: &JobFilter,
        max_calls: u32,
    ) -> Result<Vec<Job>> {
        let url = format!("{}/workflow/{}/job", self.api_v2_url(), workflow_id);
        self.get_paged(&url, |j: &Job| filter.matches(j), max_calls)
            .await
    }

    /// Fetch one job's metadata.
    ///
    /// A 404 means the job number has no retrievable metadata and yields
    /// `None`; any other non-success status is an error.
    pub async fn get_job_info(&self, job_number: u64) -> Result<Option<JobInfo>> {
        let url = format!(
            "{}/project/{}/job/{}",
            self.api_v2_url(),
            self.slug(),
            job_number
        );

        let response = self.authed_get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(Some(response.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Token;
    use crate::config::CircleConfig;
    use crate::providers::circleci::client::CircleClient;
    use crate::providers::circleci::filters::PipelineFilter;

    fn test_client(base_url: &str) -> CircleClient {
        let config = CircleConfig {
            token: None,
            api_v2_url: base_url.to_string(),
            api_v1_url: base_url.to_string(),
            vcs: "github".to_string(),
            username: Some("facebook".to_string()),
            project: Some("rocksdb".to_string()),
        };
        CircleClient::new(&config, Token::from("test-token")).unwrap()
    }

    #[tokio::test]
    async fn test_list_pipelines_filters_by_branch() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/project/github/facebook/rocksdb/pipeline")
            .with_status(200)
            .with_body(
                r#"{
                    "items": [
                        {"id": "p-1", "vcs": {"branch": "pull/9676"}},
                        {"id": "p-2", "vcs": {"branch": "main"}},
                        {"id": "p-3"}
                    ],
                    "next_page_token": null
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let filter = PipelineFilter::Branch("pull/9676".to_string());
        let pipelines = client.list_pipelines(&filter, 5).await.unwrap();

        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].id, "p-1");
    }

    #[tokio::test]
    async fn test_get_job_info_maps_404_to_none() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/project/github/facebook/rocksdb/job/42")
            .with_status(404)
            .with_body(r#"{"message": "Job not found"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let info = client.get_job_info(42).await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_get_job_info_parses_started_at() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/project/github/facebook/rocksdb/job/42")
            .with_status(200)
            .with_body(r#"{"job_number": 42, "started_at": "2023-01-02T00:00:00Z"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let info = client.get_job_info(42).await.unwrap().unwrap();
        assert_eq!(info.job_number, 42);
        assert_eq!(info.started_at.unwrap().timestamp(), 1_672_617_600);
    }
}
