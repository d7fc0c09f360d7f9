//! HTTP client helpers for tests.

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
const JOB_ID_HEADER: &str = "x-appraiser-job-id";

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

/// Status, job id header and JSON body of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub job_id: Option<String>,
    pub body: serde_json::Value,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<TestResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let job_id = resp
            .headers()
            .get(JOB_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let body = resp.json().await?;

        Ok(TestResponse {
            status,
            job_id,
            body,
        })
    }

    pub async fn get_appraisal(
        &self,
        request: &serde_json::Value,
    ) -> Result<TestResponse, TestClientError> {
        self.post("/get_appraisal", request).await
    }

    pub async fn async_get_appraisal(
        &self,
        request: &serde_json::Value,
    ) -> Result<TestResponse, TestClientError> {
        self.post("/async_get_appraisal", request).await
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}
