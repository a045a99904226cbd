//! Status fetcher for the homework review API
//!
//! One `GET` per call, no retry: a failed fetch is retried only by the
//! next poll cycle.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::PollError;

/// Source of raw (not yet validated) status payloads
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch every submission updated inside the poll window ending at `window_start`.
    async fn fetch_status(&self, window_start: i64) -> Result<Value, PollError>;
}

/// Build the HTTP client shared by the status fetcher and the bot transport
pub fn http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("homework-notifier/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// HTTP client for the Practicum homework status endpoint
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    authorization: String,
    poll_interval_secs: i64,
}

impl PracticumClient {
    /// `http` is expected to come from [`http_client`].
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            authorization: format!("OAuth {}", config.practicum_token),
            poll_interval_secs: config.poll_interval_secs(),
        }
    }

    /// Lower bound of the poll window sent as `from_date`
    pub fn from_date(&self, window_start: i64) -> i64 {
        window_start.saturating_sub(self.poll_interval_secs)
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch_status(&self, window_start: i64) -> Result<Value, PollError> {
        let from_date = self.from_date(window_start);
        debug!("Requesting homework statuses from_date={}", from_date);

        let response = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| {
                error!("Status endpoint unreachable: {}", e);
                PollError::EndpointUnreachable(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("Status endpoint answered {}", status);
            return Err(PollError::UnexpectedStatus { status });
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read status response body: {}", e);
            PollError::EndpointUnreachable(e)
        })?;
        let payload: Value = serde_json::from_slice(&body).map_err(|e| {
            error!("Status response is not JSON: {}", e);
            PollError::MalformedResponse(format!("body is not valid JSON: {e}"))
        })?;

        debug!("Received status payload ({} bytes)", body.len());
        Ok(payload)
    }
}
