//! Pipeline phase entities
//!
//! A phase is one named top-level stage of the backend's deliberation
//! pipeline. The client never drives phases; it only reconciles the
//! backend's boundary events into a forward-only lifecycle per phase.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a top-level pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKey {
    /// Dilemma triage - picks the deliberation mode and roster
    Routing,
    /// Literature retrieval
    Scout,
    /// Evidence-based generation lane
    LaneA,
    /// Exploratory generation lane
    LaneB,
    /// Agents critique each other's positions
    CrossExam,
    /// Arbiter synthesizes a verdict
    Synthesis,
    /// Robustness probing of the verdict
    Fragility,
}

impl PhaseKey {
    pub fn as_str(&self) -> &str {
        match self {
            PhaseKey::Routing => "routing",
            PhaseKey::Scout => "scout",
            PhaseKey::LaneA => "lane_a",
            PhaseKey::LaneB => "lane_b",
            PhaseKey::CrossExam => "cross_exam",
            PhaseKey::Synthesis => "synthesis",
            PhaseKey::Fragility => "fragility",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PhaseKey::Routing => "Routing",
            PhaseKey::Scout => "Literature Scout",
            PhaseKey::LaneA => "Evidence Lane",
            PhaseKey::LaneB => "Exploratory Lane",
            PhaseKey::CrossExam => "Cross-Examination",
            PhaseKey::Synthesis => "Synthesis",
            PhaseKey::Fragility => "Fragility Testing",
        }
    }
}

impl fmt::Display for PhaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PhaseKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "routing" => Ok(PhaseKey::Routing),
            "scout" => Ok(PhaseKey::Scout),
            "lane_a" => Ok(PhaseKey::LaneA),
            "lane_b" => Ok(PhaseKey::LaneB),
            "cross_exam" => Ok(PhaseKey::CrossExam),
            "synthesis" => Ok(PhaseKey::Synthesis),
            "fragility" => Ok(PhaseKey::Fragility),
            other => Err(DomainError::UnknownPhase(other.to_string())),
        }
    }
}

/// Lifecycle status of a phase — a strict forward-only state machine.
///
/// No phase ever transitions backward; `Complete` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Pending,
    Running,
    Complete,
    Error,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::Running => "running",
            PhaseStatus::Complete => "complete",
            PhaseStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PhaseStatus::Complete | PhaseStatus::Error)
    }

    fn rank(&self) -> u8 {
        match self {
            PhaseStatus::Pending => 0,
            PhaseStatus::Running => 1,
            PhaseStatus::Complete | PhaseStatus::Error => 2,
        }
    }

    /// Whether the lifecycle may move from `self` to `target`.
    ///
    /// `Pending -> Complete` is legal: a `*_complete` received while still
    /// pending is the implicit fast transition through `Running` (the
    /// backend is not guaranteed to emit every boundary event).
    pub fn can_advance_to(&self, target: PhaseStatus) -> bool {
        if self.is_terminal() || *self == target {
            return false;
        }
        target.rank() > self.rank()
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One top-level pipeline stage as observed by the client (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Stable identifier
    pub key: PhaseKey,
    /// Display name, carried through for presentation
    pub label: String,
    /// Forward-only lifecycle status
    pub status: PhaseStatus,
    /// Measured elapsed seconds, set once the phase completes.
    ///
    /// Measured against the client receipt clock; the wire carries no
    /// backend-side origination timestamps, so network jitter skews this.
    pub duration: Option<f64>,
    /// A-priori weight in seconds used for progress estimation
    pub estimated_duration: Option<f64>,
}

impl Phase {
    pub fn new(key: PhaseKey, estimated_duration: Option<f64>) -> Self {
        Self {
            key,
            label: key.display_name().to_string(),
            status: PhaseStatus::Pending,
            duration: None,
            estimated_duration,
        }
    }

    /// Advance the lifecycle, refusing backward or redundant moves.
    ///
    /// Returns `true` if the status actually changed.
    pub fn advance(&mut self, target: PhaseStatus) -> bool {
        if !self.status.can_advance_to(target) {
            return false;
        }
        self.status = target;
        true
    }
}

impl PhaseKey {
    /// Built-in a-priori weight in seconds.
    ///
    /// Deliberately coarse: it only shapes the progress estimate, never
    /// any control flow.
    pub fn default_estimate(&self) -> f64 {
        match self {
            PhaseKey::Routing => 6.0,
            PhaseKey::Scout => 20.0,
            PhaseKey::LaneA | PhaseKey::LaneB => 45.0,
            PhaseKey::CrossExam => 30.0,
            PhaseKey::Synthesis => 25.0,
            PhaseKey::Fragility => 20.0,
        }
    }
}

/// Build the canonical top-level pipeline.
///
/// The scout and fragility stages are optional backend features; when
/// disabled they are omitted entirely rather than shown as pending forever.
pub fn default_pipeline(scout_enabled: bool, fragility_enabled: bool) -> Vec<Phase> {
    let mut keys = vec![PhaseKey::Routing];
    if scout_enabled {
        keys.push(PhaseKey::Scout);
    }
    keys.extend([PhaseKey::LaneA, PhaseKey::LaneB, PhaseKey::CrossExam, PhaseKey::Synthesis]);
    if fragility_enabled {
        keys.push(PhaseKey::Fragility);
    }
    keys.into_iter()
        .map(|key| Phase::new(key, Some(key.default_estimate())))
        .collect()
}
