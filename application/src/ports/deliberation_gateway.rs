//! Deliberation backend port
//!
//! The backend pipeline itself (routing, generation, synthesis, …) is an
//! external collaborator; this port is the entire surface the client
//! needs from it.

use super::event_stream::EventStream;
use async_trait::async_trait;
use conclave_domain::{ConferenceRequest, JobId, JobTicket};
use thiserror::Error;

/// Errors surfaced by the backend gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Backend rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Gateway to the deliberation backend.
///
/// Implementations live in the infrastructure layer. One open stream per
/// job id; starting a new job must first close any prior stream.
#[async_trait]
pub trait DeliberationGateway: Send + Sync {
    /// Boolean reachability probe, independent of any job.
    async fn health(&self) -> bool;

    /// Submit a job description; the backend answers with an opaque ticket.
    async fn start_conference(&self, request: &ConferenceRequest)
    -> Result<JobTicket, GatewayError>;

    /// Open the live event stream for an accepted job.
    async fn open_stream(&self, job_id: &JobId) -> Result<Box<dyn EventStream>, GatewayError>;
}
