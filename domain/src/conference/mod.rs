//! Conference subdomain — what the client can observe about one
//! deliberation run.
//!
//! - [`phase`] — the top-level pipeline stages and their lifecycle
//! - [`agent`] — deliberation participants and their streaming state
//! - [`event`] — the typed taxonomy of backend stream events
//! - [`state`] — the reducer folding events into the aggregate view
//! - [`request`] — the client→server job description

pub mod agent;
pub mod event;
pub mod phase;
pub mod request;
pub mod state;
