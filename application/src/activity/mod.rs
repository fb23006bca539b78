//! Append-only activity history for operator observability.

pub mod log;

pub use log::{ActivityEvent, ActivityKind, ActivityLog};
