//! Live event stream port
//!
//! One stream per job id. The adapter behind this port owns the
//! connection lifecycle: it decodes wire messages into
//! [`ConferenceEvent`]s, drops malformed ones without tearing the
//! connection down, and converts transport failure into a single
//! terminal [`ConferenceEvent::ConferenceFailed`] with message
//! `"connection lost"`.

use async_trait::async_trait;
use conclave_domain::{ConferenceEvent, JobId};

/// A live, already-open event stream for one conference.
#[async_trait]
pub trait EventStream: Send {
    /// Receive the next decoded event.
    ///
    /// Returns `None` once the stream has ended — after a terminal event
    /// was delivered, after `close()`, or after the transport failed (in
    /// which case a `ConferenceFailed` event precedes the `None`).
    async fn next_event(&mut self) -> Option<ConferenceEvent>;

    /// Close the stream. Idempotent: safe to call repeatedly and after
    /// natural termination.
    fn close(&mut self);

    /// The job this stream is scoped to.
    fn job_id(&self) -> &JobId;
}
