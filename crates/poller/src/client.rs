use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use herald_common::config::AppConfig;
use herald_common::error::PipelineError;

/// Source of raw status payloads.
pub trait StatusSource {
    /// Fetch everything that changed since `cursor` (seconds since epoch).
    /// The payload is returned unvalidated.
    fn fetch(&self, cursor: i64) -> impl Future<Output = Result<Value, PipelineError>> + Send;
}

/// Authenticated HTTP client for the review-status endpoint.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl ApiClient {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            config.status_endpoint.clone(),
            config.practicum_token.clone(),
            config.http_timeout,
        )
    }
}

impl StatusSource for ApiClient {
    async fn fetch(&self, cursor: i64) -> Result<Value, PipelineError> {
        tracing::debug!(endpoint = %self.endpoint, from_date = cursor, "Polling status endpoint");

        let resp = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", cursor)])
            .send()
            .await
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(PipelineError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| PipelineError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| PipelineError::Decode(e.to_string()))
    }
}
