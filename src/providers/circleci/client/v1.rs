//! Calls against the legacy (v1.1) API.
//!
//! The step/action tree of a build, and with it the named log-output
//! artifact, is still only reachable through this generation.

use log::debug;

use crate::error::Result;
use crate::providers::circleci::types::BuildInfo;

use super::CircleClient;

impl CircleClient {
    /// Fetch the full legacy build record for one job number.
    pub async fn get_build_info(&self, job_number: u64) -> Result<BuildInfo> {
        let url = format!(
            "{}/project/{}/{}",
            self.api_v1_url(),
            self.slug(),
            job_number
        );

        let response = self.authed_get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Locate the log artifact URL for one job by scanning its legacy
    /// step/action tree for the first matching action that produced output.
    ///
    /// `Ok(None)` means the job has no such log, which callers treat as a
    /// normal outcome.
    pub async fn get_log_output_url(
        &self,
        job_number: u64,
        action_name: &str,
    ) -> Result<Option<String>> {
        let info = self.get_build_info(job_number).await?;
        let url = info.find_output_url(action_name).map(str::to_string);
        if url.is_none() {
            debug!("Job {job_number} has no '{action_name}' output");
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Token;
    use crate::config::CircleConfig;
    use crate::error::CirclogError;
    use crate::providers::circleci::client::CircleClient;

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
    async fn test_get_log_output_url_found() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/project/github/facebook/rocksdb/101")
            .with_status(200)
            .with_body(
                r#"{
                    "steps": [
                        {
                            "name": "Report",
                            "actions": [
                                {"name": "Output logs as MIME", "has_output": true, "output_url": "https://logs/101"}
                            ]
                        }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let url = client
            .get_log_output_url(101, "Output logs as MIME")
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://logs/101"));
    }

    #[tokio::test]
    async fn test_get_log_output_url_not_found_is_ok_none() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/project/github/facebook/rocksdb/102")
            .with_status(200)
            .with_body(r#"{"steps": [{"name": "Build", "actions": [{"name": "make", "has_output": true}]}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let url = client
            .get_log_output_url(102, "Output logs as MIME")
            .await
            .unwrap();
        assert!(url.is_none());
    }

    #[tokio::test]
    async fn test_get_build_info_http_error_aborts() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/project/github/facebook/rocksdb/103")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.get_build_info(103).await;

        match result {
            Err(CirclogError::Api { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected Api error, got {:?}", other.map(|_| ())),
        }
    }
}
