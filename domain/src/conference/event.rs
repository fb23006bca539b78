//! Typed stream events for backend communication.
//!
//! [`ConferenceEvent`] is the single tagged union every downstream
//! component dispatches on. The wire protocol's named push-events are
//! decoded into these variants at the infrastructure boundary; from there
//! on, one `match` replaces per-event-name handler registration.

use super::agent::{AgentRole, Lane};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deliberation mode chosen by the backend's router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliberationMode {
    /// Single-lane quick answer
    QuickConsult,
    /// Standard two-lane deliberation
    StandardReview,
    /// Full pipeline with cross-examination and fragility probing
    ComplexDilemma,
}

impl DeliberationMode {
    pub fn as_str(&self) -> &str {
        match self {
            DeliberationMode::QuickConsult => "QUICK_CONSULT",
            DeliberationMode::StandardReview => "STANDARD_REVIEW",
            DeliberationMode::ComplexDilemma => "COMPLEX_DILEMMA",
        }
    }
}

impl fmt::Display for DeliberationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeliberationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUICK_CONSULT" => Ok(DeliberationMode::QuickConsult),
            "STANDARD_REVIEW" => Ok(DeliberationMode::StandardReview),
            "COMPLEX_DILEMMA" => Ok(DeliberationMode::ComplexDilemma),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}

/// Routing decision payload: how the backend chose to run this dilemma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Chosen mode, if the router reported one it knows
    pub mode: Option<DeliberationMode>,
    /// Active participant roster
    pub roster: Vec<AgentRole>,
    /// Whether the literature scout was activated
    pub scout_enabled: bool,
}

/// One cross-examination critique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critique {
    pub critic: Option<AgentRole>,
    pub target: Option<AgentRole>,
    pub summary: String,
}

/// Outcome of the fragility (robustness) probing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragilityReport {
    /// Probes the verdict survived
    pub survived: u32,
    /// Probes run in total
    pub total: u32,
}

/// Final verdict payload of a completed conference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Verdict {
    pub summary: String,
    pub confidence: Option<f64>,
    pub mode: Option<DeliberationMode>,
    pub fragility: Option<FragilityReport>,
}

/// A decoded backend stream event.
///
/// Exactly one of these is produced per well-formed wire message; unknown
/// event names and malformed payloads never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConferenceEvent {
    /// The backend accepted the job and began the pipeline
    ConferenceStarted,

    // === Routing ===
    RoutingStarted,
    RoutingDecided(RoutingDecision),

    // === Literature retrieval ===
    ScoutStarted,
    ScoutCompleted { sources_found: Option<u64> },

    // === Per-agent lifecycle (flat or lane-scoped addressing) ===
    AgentStarted {
        role: AgentRole,
        lane: Option<Lane>,
    },
    AgentProgress {
        role: AgentRole,
        lane: Option<Lane>,
        tokens_generated: Option<u64>,
        tokens_estimated: Option<u64>,
        content_delta: Option<String>,
    },
    AgentCompleted {
        role: AgentRole,
        lane: Option<Lane>,
        confidence: Option<f64>,
        content: Option<String>,
    },
    AgentFailed {
        role: AgentRole,
        lane: Option<Lane>,
        message: String,
    },

    // === Cross-examination ===
    CrossExamStarted,
    CritiqueRaised(Critique),
    CrossExamCompleted,

    // === Synthesis (arbitration) ===
    ArbitrationStarted,
    ArbitrationDelta { content: String },
    ArbitrationCompleted { verdict: Option<Verdict> },

    // === Robustness testing ===
    FragilityStarted,
    FragilityProbed { probe: String, held: bool },
    FragilityCompleted { report: FragilityReport },

    // === Terminal ===
    ConferenceCompleted { result: Option<Verdict> },
    ConferenceFailed { message: String },
}

impl ConferenceEvent {
    /// Returns true if receiving this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConferenceEvent::ConferenceCompleted { .. } | ConferenceEvent::ConferenceFailed { .. }
        )
    }

    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            ConferenceEvent::ConferenceStarted => "conference_started",
            ConferenceEvent::RoutingStarted => "routing_started",
            ConferenceEvent::RoutingDecided(_) => "routing_decided",
            ConferenceEvent::ScoutStarted => "scout_started",
            ConferenceEvent::ScoutCompleted { .. } => "scout_completed",
            ConferenceEvent::AgentStarted { .. } => "agent_started",
            ConferenceEvent::AgentProgress { .. } => "agent_progress",
            ConferenceEvent::AgentCompleted { .. } => "agent_completed",
            ConferenceEvent::AgentFailed { .. } => "agent_failed",
            ConferenceEvent::CrossExamStarted => "cross_exam_started",
            ConferenceEvent::CritiqueRaised(_) => "critique_raised",
            ConferenceEvent::CrossExamCompleted => "cross_exam_completed",
            ConferenceEvent::ArbitrationStarted => "arbitration_started",
            ConferenceEvent::ArbitrationDelta { .. } => "arbitration_delta",
            ConferenceEvent::ArbitrationCompleted { .. } => "arbitration_completed",
            ConferenceEvent::FragilityStarted => "fragility_started",
            ConferenceEvent::FragilityProbed { .. } => "fragility_probed",
            ConferenceEvent::FragilityCompleted { .. } => "fragility_completed",
            ConferenceEvent::ConferenceCompleted { .. } => "conference_completed",
            ConferenceEvent::ConferenceFailed { .. } => "conference_failed",
        }
    }
}
