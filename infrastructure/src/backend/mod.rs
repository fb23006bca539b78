//! Deliberation backend adapter.
//!
//! Implements the application layer's [`DeliberationGateway`] and
//! [`EventStream`] ports over plain HTTP plus server-sent events:
//!
//! - [`gateway`] — health probe, job submission, stream opening
//! - [`stream`] — the live per-job event stream client
//! - [`sse`] — wire framing (pure, incremental SSE parser)
//! - [`decode`] — wire event name + JSON → typed [`ConferenceEvent`]
//! - [`protocol`] — request/response DTOs
//!
//! [`DeliberationGateway`]: conclave_application::DeliberationGateway
//! [`EventStream`]: conclave_application::EventStream
//! [`ConferenceEvent`]: conclave_domain::ConferenceEvent

pub mod decode;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod sse;
pub mod stream;
