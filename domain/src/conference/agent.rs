//! Deliberation agent entities
//!
//! Agents are the participants of the generation phases. Each one streams
//! tokens independently; the client only mirrors what the backend reports,
//! enforcing that the mirror never moves backward.

use super::phase::PhaseKey;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed vocabulary of deliberation participants (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Argues from published evidence
    Empiricist,
    /// Argues from first principles
    Theorist,
    /// Attacks the strongest claims
    Skeptic,
    /// Reconciles lane positions
    Synthesist,
    /// Literature retrieval agent
    Scout,
    /// Produces the final verdict
    Arbiter,
}

impl AgentRole {
    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::Empiricist => "empiricist",
            AgentRole::Theorist => "theorist",
            AgentRole::Skeptic => "skeptic",
            AgentRole::Synthesist => "synthesist",
            AgentRole::Scout => "scout",
            AgentRole::Arbiter => "arbiter",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            AgentRole::Empiricist => "Empiricist",
            AgentRole::Theorist => "Theorist",
            AgentRole::Skeptic => "Skeptic",
            AgentRole::Synthesist => "Synthesist",
            AgentRole::Scout => "Scout",
            AgentRole::Arbiter => "Arbiter",
        }
    }

    /// Roles that can be enabled as deliberators in a start request.
    ///
    /// Scout and Arbiter are pipeline fixtures, not selectable participants.
    pub fn deliberators() -> Vec<AgentRole> {
        vec![
            AgentRole::Empiricist,
            AgentRole::Theorist,
            AgentRole::Skeptic,
            AgentRole::Synthesist,
        ]
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AgentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empiricist" => Ok(AgentRole::Empiricist),
            "theorist" => Ok(AgentRole::Theorist),
            "skeptic" => Ok(AgentRole::Skeptic),
            "synthesist" => Ok(AgentRole::Synthesist),
            "scout" => Ok(AgentRole::Scout),
            "arbiter" => Ok(AgentRole::Arbiter),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// Deliberation track an agent event is addressed through.
///
/// Lanes only scope event addressing; they never change the shape of the
/// per-agent state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Evidence-based track ("lane_a")
    Evidence,
    /// Exploratory track ("lane_b")
    Exploratory,
}

impl Lane {
    pub fn as_str(&self) -> &str {
        match self {
            Lane::Evidence => "lane_a",
            Lane::Exploratory => "lane_b",
        }
    }

    /// The pipeline phase this lane's agents stream under.
    pub fn phase_key(&self) -> PhaseKey {
        match self {
            Lane::Evidence => PhaseKey::LaneA,
            Lane::Exploratory => PhaseKey::LaneB,
        }
    }
}

impl FromStr for Lane {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lane_a" => Ok(Lane::Evidence),
            "lane_b" => Ok(Lane::Exploratory),
            other => Err(DomainError::UnknownPhase(other.to_string())),
        }
    }
}

/// Lifecycle status of an agent — forward-progressing only.
///
/// `Complete` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    Waiting,
    Thinking,
    Streaming,
    Complete,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Waiting => "waiting",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Streaming => "streaming",
            AgentStatus::Complete => "complete",
            AgentStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStatus::Complete | AgentStatus::Error)
    }

    fn rank(&self) -> u8 {
        match self {
            AgentStatus::Idle => 0,
            AgentStatus::Waiting => 1,
            AgentStatus::Thinking => 2,
            AgentStatus::Streaming => 3,
            AgentStatus::Complete | AgentStatus::Error => 4,
        }
    }

    pub fn can_advance_to(&self, target: AgentStatus) -> bool {
        if self.is_terminal() || *self == target {
            return false;
        }
        target.rank() > self.rank()
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observed state of one deliberation participant (Entity)
///
/// Invariants enforced here rather than trusted from the wire:
/// - token counters never decrease within one lifecycle
/// - `content` is append-only while streaming
/// - `confidence` is only ever set at completion, clamped to [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub role: AgentRole,
    pub status: AgentStatus,
    pub tokens_generated: u64,
    pub tokens_estimated: u64,
    /// Set once `status == Complete`; undefined before that
    pub confidence: Option<f64>,
    /// Accumulated streamed text
    pub content: String,
    /// Lane this agent was last addressed through, if any
    pub lane: Option<Lane>,
}

impl AgentState {
    pub fn new(role: AgentRole) -> Self {
        Self {
            role,
            status: AgentStatus::Idle,
            tokens_generated: 0,
            tokens_estimated: 0,
            confidence: None,
            content: String::new(),
            lane: None,
        }
    }

    /// Roster-initialized entry: the routing decision parks every
    /// participant at `Waiting` until its lane starts.
    pub fn waiting(role: AgentRole) -> Self {
        Self {
            status: AgentStatus::Waiting,
            ..Self::new(role)
        }
    }

    /// The agent started reasoning. Returns `true` if the status moved.
    pub fn begin_thinking(&mut self) -> bool {
        if !self.status.can_advance_to(AgentStatus::Thinking) {
            return false;
        }
        self.status = AgentStatus::Thinking;
        true
    }

    /// Fold a streaming progress report into this agent.
    ///
    /// Token counters are clamped to be non-decreasing, so out-of-order or
    /// duplicated progress events never move them backward. A duplicate
    /// that changes nothing returns `false` and appends no content.
    pub fn record_progress(
        &mut self,
        tokens_generated: Option<u64>,
        tokens_estimated: Option<u64>,
        content_delta: Option<&str>,
    ) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        let status_moved = if self.status.can_advance_to(AgentStatus::Streaming) {
            self.status = AgentStatus::Streaming;
            true
        } else {
            false
        };

        let generated_moved = match tokens_generated {
            Some(n) if n > self.tokens_generated => {
                self.tokens_generated = n;
                true
            }
            _ => false,
        };
        let estimated_moved = match tokens_estimated {
            Some(n) if n > self.tokens_estimated => {
                self.tokens_estimated = n;
                true
            }
            _ => false,
        };

        // Append text only when the counters actually moved (or the backend
        // sends no counters at all); a replayed event must not duplicate it.
        let mut appended = false;
        if let Some(delta) = content_delta
            && !delta.is_empty()
            && (generated_moved || tokens_generated.is_none())
        {
            self.content.push_str(delta);
            appended = true;
        }

        status_moved || generated_moved || estimated_moved || appended
    }

    /// The agent finished. Sets confidence (clamped to [0, 1]) and falls
    /// back to the event's full content only when nothing was streamed.
    pub fn complete(&mut self, confidence: Option<f64>, content: Option<&str>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = AgentStatus::Complete;
        self.confidence = confidence.map(|c| c.clamp(0.0, 1.0));
        if self.content.is_empty()
            && let Some(full) = content
            && !full.is_empty()
        {
            self.content.push_str(full);
        }
        true
    }

    /// The agent failed. Local to this agent; never terminates the job.
    pub fn fail(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = AgentStatus::Error;
        true
    }
}
