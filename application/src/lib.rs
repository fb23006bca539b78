//! Application layer for conclave
//!
//! This crate contains use cases, port definitions, and the activity log.
//! It depends only on the domain layer.

pub mod activity;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use activity::{ActivityEvent, ActivityKind, ActivityLog};
pub use ports::{
    deliberation_gateway::{DeliberationGateway, GatewayError},
    event_stream::EventStream,
    observer::{ConferenceObserver, NoObserver},
};
pub use use_cases::monitor::ConferenceMonitor;
pub use use_cases::run_conference::{ConferenceOutcome, RunConferenceError, RunConferenceUseCase};
