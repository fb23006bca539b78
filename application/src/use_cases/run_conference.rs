//! Run Conference use case
//!
//! Orchestrates one conference from start request to terminal state:
//! submit the job, open its event stream, and pump every decoded event
//! through the monitor, fanning effective transitions out to the
//! observer.
//!
//! There is no automatic reconnection and no resume-from-offset: a
//! dropped connection surfaces as a terminal failure, and trying again
//! is a human decision that restarts the whole job.

use crate::ports::deliberation_gateway::{DeliberationGateway, GatewayError};
use crate::ports::observer::ConferenceObserver;
use crate::use_cases::monitor::ConferenceMonitor;
use crate::activity::ActivityEvent;
use conclave_domain::{ConferenceRequest, ConferenceState, DomainError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while running a conference
#[derive(Error, Debug)]
pub enum RunConferenceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Final result handed back to the caller: the frozen aggregate plus the
/// full ordered activity history.
#[derive(Debug, Clone, Serialize)]
pub struct ConferenceOutcome {
    pub state: ConferenceState,
    pub activity: Vec<ActivityEvent>,
}

/// Use case for running and monitoring one conference
pub struct RunConferenceUseCase<G: DeliberationGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: DeliberationGateway + 'static> RunConferenceUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute without external cancellation.
    pub async fn execute(
        &self,
        request: ConferenceRequest,
        observer: &dyn ConferenceObserver,
    ) -> Result<ConferenceOutcome, RunConferenceError> {
        self.execute_with_cancellation(request, observer, CancellationToken::new())
            .await
    }

    /// Execute, aborting early when `cancellation` fires.
    ///
    /// Cancellation closes the stream before returning; the idempotent
    /// close contract makes the redundant close on natural termination
    /// harmless.
    pub async fn execute_with_cancellation(
        &self,
        request: ConferenceRequest,
        observer: &dyn ConferenceObserver,
        cancellation: CancellationToken,
    ) -> Result<ConferenceOutcome, RunConferenceError> {
        request.validate()?;

        let ticket = self.gateway.start_conference(&request).await?;
        info!("Conference accepted: job {}", ticket.job_id);

        let mut monitor = ConferenceMonitor::new();
        monitor.begin(
            ticket.job_id.clone(),
            request.retrieval_enabled,
            request.fragility_enabled,
        );

        let mut stream = self.gateway.open_stream(&ticket.job_id).await?;

        loop {
            let event = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    info!("Conference {} cancelled by caller", ticket.job_id);
                    stream.close();
                    return Err(RunConferenceError::Cancelled);
                }
                event = stream.next_event() => event,
            };

            let Some(event) = event else {
                // Stream drained without a terminal event. The adapter
                // surfaces transport failure as its own terminal event, so
                // reaching here just means there is nothing left to fold.
                warn!("Conference {} stream ended early", ticket.job_id);
                break;
            };

            debug!("Conference {}: {}", stream.job_id(), event.name());
            let terminal = event.is_terminal();

            if let Some(transition) = monitor.ingest(&event) {
                observer.on_transition(&transition, monitor.state());
                if let Some(entry) = monitor.last_activity() {
                    observer.on_activity(entry);
                }
            }

            if terminal {
                stream.close();
                break;
            }
        }

        Ok(ConferenceOutcome {
            state: monitor.snapshot(),
            activity: monitor.activity().entries().to_vec(),
        })
    }
}
