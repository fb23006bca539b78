//! HTTP gateway to the deliberation backend.
//!
//! Implements [`DeliberationGateway`] over three endpoints:
//!
//! - `GET  /health` — boolean reachability probe
//! - `POST /api/conference` — submit a job, returns `{ jobId, streamUrl }`
//! - `GET  /api/conference/{id}/events` — the per-job SSE stream

use super::error::BackendError;
use super::protocol::{StartConferenceBody, StartConferenceResponse};
use super::stream::SseEventStream;
use async_trait::async_trait;
use conclave_application::{DeliberationGateway, EventStream, GatewayError};
use conclave_domain::{ConferenceRequest, JobId, JobTicket};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default connect timeout for backend requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound for non-streaming requests (health, job submission).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP adapter for the deliberation backend.
pub struct HttpDeliberationGateway {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpDeliberationGateway {
    /// Build a gateway against `base_url` (scheme + host + port).
    pub fn new(base_url: impl Into<String>) -> Self {
        // Only the connect phase is bounded globally: the event stream
        // response stays open for the whole conference. Non-streaming
        // requests get a per-request timeout instead.
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the timeout applied to health and job-submission requests.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DeliberationGateway for HttpDeliberationGateway {
    async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health probe failed: {}", e);
                false
            }
        }
    }

    async fn start_conference(
        &self,
        request: &ConferenceRequest,
    ) -> Result<JobTicket, GatewayError> {
        let url = format!("{}/api/conference", self.base_url);
        let body = StartConferenceBody::from(request);

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(BackendError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: if message.is_empty() {
                    "request refused".to_string()
                } else {
                    message
                },
            }
            .into());
        }

        let ticket: StartConferenceResponse = response
            .json()
            .await
            .map_err(|e| BackendError::UnexpectedResponse(e.to_string()))?;
        Ok(ticket.into())
    }

    async fn open_stream(&self, job_id: &JobId) -> Result<Box<dyn EventStream>, GatewayError> {
        let url = format!("{}/api/conference/{}/events", self.base_url, job_id);
        debug!("Opening event stream: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(BackendError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: "stream refused".to_string(),
            }
            .into());
        }

        Ok(Box::new(SseEventStream::spawn(job_id.clone(), response)))
    }
}
