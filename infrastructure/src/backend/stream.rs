//! Live event stream client.
//!
//! [`SseEventStream`] implements the application layer's [`EventStream`]
//! port over one long-lived HTTP response. A background reader task owns
//! the byte stream exclusively and forwards decoded events over an
//! unbounded mpsc channel; the port side just drains that channel.
//!
//! Failure semantics, per the stream contract:
//! - a malformed payload drops that one event; the connection stays up
//! - a transport error (or premature EOF) emits exactly one terminal
//!   `ConferenceFailed { "connection lost" }` and ends the task — there
//!   is no automatic reconnection and no resume-from-offset
//! - a terminal event from the backend ends the task immediately
//! - [`close`](SseEventStream::close) is idempotent and also runs on Drop

use super::decode::decode_event;
use super::sse::SseParser;
use async_trait::async_trait;
use conclave_application::EventStream;
use conclave_domain::{ConferenceEvent, JobId};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One open server-sent event stream, scoped to one job.
pub struct SseEventStream {
    job_id: JobId,
    rx: mpsc::UnboundedReceiver<ConferenceEvent>,
    cancel: CancellationToken,
    _reader_handle: JoinHandle<()>,
}

impl SseEventStream {
    /// Take ownership of an already-open streaming response and start the
    /// background reader.
    pub fn spawn(job_id: JobId, response: reqwest::Response) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let reader_job = job_id.clone();
        let reader_cancel = cancel.clone();
        let reader_handle = tokio::spawn(async move {
            Self::reader_loop(reader_job, response, tx, reader_cancel).await;
        });

        Self {
            job_id,
            rx,
            cancel,
            _reader_handle: reader_handle,
        }
    }

    /// Background reader loop — single owner of the HTTP byte stream.
    ///
    /// Ends on cancellation, terminal event, transport error, or EOF.
    /// When it ends, the sender drops and the port side observes `None`.
    async fn reader_loop(
        job_id: JobId,
        response: reqwest::Response,
        tx: mpsc::UnboundedSender<ConferenceEvent>,
        cancel: CancellationToken,
    ) {
        let mut parser = SseParser::new();
        let mut bytes = response.bytes_stream();

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Stream {}: closed by caller", job_id);
                    return;
                }
                chunk = bytes.next() => chunk,
            };

            match chunk {
                Some(Ok(chunk)) => {
                    for frame in parser.feed(&chunk) {
                        let payload: serde_json::Value = if frame.data.is_empty() {
                            serde_json::Value::Null
                        } else {
                            match serde_json::from_str(&frame.data) {
                                Ok(value) => value,
                                Err(e) => {
                                    // One corrupt message must not take down
                                    // an otherwise healthy stream.
                                    warn!(
                                        "Stream {}: dropping malformed '{}' payload: {}",
                                        job_id, frame.event, e
                                    );
                                    continue;
                                }
                            }
                        };

                        let Some(event) = decode_event(&frame.event, &payload) else {
                            continue;
                        };
                        let terminal = event.is_terminal();
                        if tx.send(event).is_err() {
                            // Receiver gone; nobody is listening anymore.
                            return;
                        }
                        if terminal {
                            debug!("Stream {}: terminal event received, closing", job_id);
                            return;
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!("Stream {}: transport error: {}", job_id, e);
                    let _ = tx.send(ConferenceEvent::ConferenceFailed {
                        message: "connection lost".to_string(),
                    });
                    return;
                }
                None => {
                    // EOF before any terminal event: the job is unrecoverable.
                    warn!("Stream {}: connection closed by backend", job_id);
                    let _ = tx.send(ConferenceEvent::ConferenceFailed {
                        message: "connection lost".to_string(),
                    });
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl EventStream for SseEventStream {
    async fn next_event(&mut self) -> Option<ConferenceEvent> {
        self.rx.recv().await
    }

    fn close(&mut self) {
        // CancellationToken::cancel is idempotent; so is re-closing rx.
        self.cancel.cancel();
        self.rx.close();
    }

    fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl Drop for SseEventStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
