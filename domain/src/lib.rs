//! Domain layer for conclave
//!
//! This crate contains the core entities and pure logic of the conference
//! client. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conference
//!
//! A conference is one end-to-end run of the backend's multi-stage
//! deliberation pipeline, identified by a job id. The backend does the
//! actual work; this layer models what the client can observe about it:
//!
//! - **Phases**: the named top-level pipeline stages (routing, retrieval,
//!   generation lanes, cross-examination, synthesis, fragility testing)
//! - **Agents**: the deliberation participants, each with independent
//!   streaming progress and a final confidence score
//! - **Reducer**: the state machine that folds the live event stream into
//!   one coherent, monotonic aggregate view

pub mod conference;
pub mod core;
pub mod progress;

// Re-export commonly used types
pub use conference::{
    agent::{AgentRole, AgentState, AgentStatus, Lane},
    event::{
        ConferenceEvent, Critique, DeliberationMode, FragilityReport, RoutingDecision, Verdict,
    },
    phase::{Phase, PhaseKey, PhaseStatus, default_pipeline},
    request::{ConferenceRequest, JobTicket, ParticipantSpec},
    state::{ConferenceState, ConferenceStatus, Transition},
};
pub use core::{error::DomainError, job::JobId};
pub use progress::{DEFAULT_PHASE_WEIGHT, estimate_time_remaining, overall_progress};
