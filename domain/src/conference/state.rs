//! Conference state reducer
//!
//! [`ConferenceState`] is the aggregate view of one running conference.
//! [`ConferenceState::apply`] is the single reducer entry point: it folds
//! each decoded stream event into the aggregate, enforcing the phase and
//! agent invariants, and reports at most one [`Transition`] per event so
//! downstream consumers (activity log, observers) key off actual value
//! change rather than event receipt.
//!
//! The reducer is the aggregate's only writer. It is synchronous and
//! infallible: an event that cannot legally apply is a no-op, never a
//! fault that could leave the aggregate half-updated. The receipt clock
//! is an explicit parameter so the whole state machine stays
//! deterministic under test.

use super::agent::{AgentRole, AgentState, AgentStatus, Lane};
use super::event::{ConferenceEvent, DeliberationMode, FragilityReport, Verdict};
use super::phase::{Phase, PhaseKey, PhaseStatus, default_pipeline};
use crate::core::job::JobId;
use crate::progress::overall_progress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Overall lifecycle of a conference run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConferenceStatus {
    #[default]
    Idle,
    /// Job accepted, stream not yet delivering
    Starting,
    Running,
    Complete,
    Error,
}

impl ConferenceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConferenceStatus::Idle => "idle",
            ConferenceStatus::Starting => "starting",
            ConferenceStatus::Running => "running",
            ConferenceStatus::Complete => "complete",
            ConferenceStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConferenceStatus::Complete | ConferenceStatus::Error)
    }
}

impl fmt::Display for ConferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One meaningful state change, reported by [`ConferenceState::apply`].
///
/// Exactly zero or one of these is produced per ingested event. A
/// re-applied event that changes nothing produces none.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The conference began delivering events
    Started,
    /// The router decided mode and roster
    RoutingDecided {
        mode: Option<DeliberationMode>,
        roster: Vec<AgentRole>,
    },
    /// A pipeline phase moved forward
    PhaseAdvanced { key: PhaseKey, status: PhaseStatus },
    /// An agent's lifecycle moved forward
    AgentAdvanced { role: AgentRole, status: AgentStatus },
    /// An agent reported streaming progress
    AgentProgressed {
        role: AgentRole,
        tokens_generated: u64,
        tokens_estimated: u64,
    },
    /// An agent failed (local; the job continues)
    AgentFailed { role: AgentRole, message: String },
    /// A cross-examination critique was raised
    CritiqueRecorded {
        critic: Option<AgentRole>,
        target: Option<AgentRole>,
    },
    /// The arbiter streamed more of the synthesis
    SynthesisAppended { total_chars: usize },
    /// A fragility probe ran
    ProbeRecorded { probe: String, held: bool },
    /// Terminal success
    Completed,
    /// Terminal failure
    Failed { message: String },
}

/// Aggregate view of one conference run.
///
/// Single-writer: only [`apply`](Self::apply) mutates this. Readers must
/// treat a snapshot as immutable between reconciliation steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceState {
    pub job_id: Option<JobId>,
    pub status: ConferenceStatus,
    /// The most recently running phase
    pub current_phase: Option<PhaseKey>,
    pub phases: Vec<Phase>,
    pub mode: Option<DeliberationMode>,
    pub agents: BTreeMap<AgentRole, AgentState>,
    /// Derived overall completion, 0-100
    pub progress: u8,
    /// Accumulated arbitration text
    pub synthesis: String,
    pub fragility: Option<FragilityReport>,
    pub result: Option<Verdict>,
    pub error: Option<String>,
    /// Receipt-clock bookkeeping for the (at most one) running phase
    #[serde(skip)]
    running_since: Option<(PhaseKey, f64)>,
}

impl ConferenceState {
    pub fn new() -> Self {
        Self {
            job_id: None,
            status: ConferenceStatus::Idle,
            current_phase: None,
            phases: default_pipeline(true, true),
            mode: None,
            agents: BTreeMap::new(),
            progress: 0,
            synthesis: String::new(),
            fragility: None,
            result: None,
            error: None,
            running_since: None,
        }
    }

    /// Fresh aggregate for an accepted job, pipeline shaped by the
    /// request's feature toggles.
    pub fn for_job(job_id: JobId, scout_enabled: bool, fragility_enabled: bool) -> Self {
        Self {
            job_id: Some(job_id),
            status: ConferenceStatus::Starting,
            phases: default_pipeline(scout_enabled, fragility_enabled),
            ..Self::new()
        }
    }

    /// Fold one decoded event into the aggregate.
    ///
    /// `received_at` is the client receipt time in seconds (fractional).
    /// Returns the single meaningful transition, or `None` when the event
    /// is redundant, out of order, or arrives after a terminal state.
    pub fn apply(&mut self, event: &ConferenceEvent, received_at: f64) -> Option<Transition> {
        // Terminal freeze: nothing mutates after complete/error, including
        // duplicate delivery of the terminal event itself.
        if self.status.is_terminal() {
            return None;
        }

        let transition = match event {
            ConferenceEvent::ConferenceStarted => {
                if self.status == ConferenceStatus::Running {
                    None
                } else {
                    self.status = ConferenceStatus::Running;
                    Some(Transition::Started)
                }
            }

            ConferenceEvent::RoutingStarted => self.start_phase(PhaseKey::Routing, received_at),
            ConferenceEvent::RoutingDecided(decision) => {
                let mut changed = self
                    .complete_phase(PhaseKey::Routing, received_at)
                    .is_some();

                if let Some(mode) = decision.mode
                    && self.mode != Some(mode)
                {
                    self.mode = Some(mode);
                    changed = true;
                }

                if !decision.scout_enabled {
                    let before = self.phases.len();
                    self.phases
                        .retain(|p| p.key != PhaseKey::Scout || p.status != PhaseStatus::Pending);
                    changed |= self.phases.len() != before;
                }

                for role in &decision.roster {
                    if !self.agents.contains_key(role) {
                        self.agents.insert(*role, AgentState::waiting(*role));
                        changed = true;
                    }
                }

                changed.then(|| Transition::RoutingDecided {
                    mode: self.mode,
                    roster: decision.roster.clone(),
                })
            }

            ConferenceEvent::ScoutStarted => self.start_phase(PhaseKey::Scout, received_at),
            ConferenceEvent::ScoutCompleted { .. } => {
                self.complete_phase(PhaseKey::Scout, received_at)
            }

            ConferenceEvent::AgentStarted { role, lane } => {
                if let Some(lane) = lane {
                    self.touch_lane(*lane, received_at);
                }
                let agent = self
                    .agents
                    .entry(*role)
                    .or_insert_with(|| AgentState::new(*role));
                if let Some(lane) = lane {
                    agent.lane = Some(*lane);
                }
                agent.begin_thinking().then_some(Transition::AgentAdvanced {
                    role: *role,
                    status: AgentStatus::Thinking,
                })
            }
            ConferenceEvent::AgentProgress {
                role,
                lane,
                tokens_generated,
                tokens_estimated,
                content_delta,
            } => {
                if let Some(lane) = lane {
                    self.touch_lane(*lane, received_at);
                }
                let agent = self
                    .agents
                    .entry(*role)
                    .or_insert_with(|| AgentState::new(*role));
                if let Some(lane) = lane {
                    agent.lane = Some(*lane);
                }
                agent
                    .record_progress(*tokens_generated, *tokens_estimated, content_delta.as_deref())
                    .then_some(Transition::AgentProgressed {
                        role: *role,
                        tokens_generated: agent.tokens_generated,
                        tokens_estimated: agent.tokens_estimated,
                    })
            }
            ConferenceEvent::AgentCompleted {
                role,
                lane,
                confidence,
                content,
            } => {
                let agent = self
                    .agents
                    .entry(*role)
                    .or_insert_with(|| AgentState::new(*role));
                if let Some(lane) = lane {
                    agent.lane = Some(*lane);
                }
                let changed = agent.complete(*confidence, content.as_deref());
                let settled_lane = agent.lane;
                if changed && let Some(lane) = settled_lane {
                    self.settle_lane(lane, received_at);
                }
                changed.then_some(Transition::AgentAdvanced {
                    role: *role,
                    status: AgentStatus::Complete,
                })
            }
            ConferenceEvent::AgentFailed {
                role,
                lane,
                message,
            } => {
                let agent = self
                    .agents
                    .entry(*role)
                    .or_insert_with(|| AgentState::new(*role));
                if let Some(lane) = lane {
                    agent.lane = Some(*lane);
                }
                let changed = agent.fail();
                let settled_lane = agent.lane;
                if changed && let Some(lane) = settled_lane {
                    self.settle_lane(lane, received_at);
                }
                changed.then(|| Transition::AgentFailed {
                    role: *role,
                    message: message.clone(),
                })
            }

            ConferenceEvent::CrossExamStarted => {
                self.start_phase(PhaseKey::CrossExam, received_at)
            }
            ConferenceEvent::CritiqueRaised(critique) => {
                self.touch_phase(PhaseKey::CrossExam, received_at);
                Some(Transition::CritiqueRecorded {
                    critic: critique.critic,
                    target: critique.target,
                })
            }
            ConferenceEvent::CrossExamCompleted => {
                self.complete_phase(PhaseKey::CrossExam, received_at)
            }

            ConferenceEvent::ArbitrationStarted => {
                self.start_phase(PhaseKey::Synthesis, received_at)
            }
            ConferenceEvent::ArbitrationDelta { content } => {
                self.touch_phase(PhaseKey::Synthesis, received_at);
                if content.is_empty() {
                    None
                } else {
                    self.synthesis.push_str(content);
                    Some(Transition::SynthesisAppended {
                        total_chars: self.synthesis.len(),
                    })
                }
            }
            ConferenceEvent::ArbitrationCompleted { verdict } => {
                let mut changed = self
                    .complete_phase(PhaseKey::Synthesis, received_at)
                    .is_some();
                if let Some(verdict) = verdict
                    && self.result.as_ref() != Some(verdict)
                {
                    self.result = Some(verdict.clone());
                    changed = true;
                }
                changed.then_some(Transition::PhaseAdvanced {
                    key: PhaseKey::Synthesis,
                    status: PhaseStatus::Complete,
                })
            }

            ConferenceEvent::FragilityStarted => {
                self.start_phase(PhaseKey::Fragility, received_at)
            }
            ConferenceEvent::FragilityProbed { probe, held } => {
                self.touch_phase(PhaseKey::Fragility, received_at);
                Some(Transition::ProbeRecorded {
                    probe: probe.clone(),
                    held: *held,
                })
            }
            ConferenceEvent::FragilityCompleted { report } => {
                let mut changed = self
                    .complete_phase(PhaseKey::Fragility, received_at)
                    .is_some();
                if self.fragility != Some(*report) {
                    self.fragility = Some(*report);
                    changed = true;
                }
                changed.then_some(Transition::PhaseAdvanced {
                    key: PhaseKey::Fragility,
                    status: PhaseStatus::Complete,
                })
            }

            ConferenceEvent::ConferenceCompleted { result } => {
                self.status = ConferenceStatus::Complete;
                if let Some(verdict) = result {
                    self.result = Some(verdict.clone());
                    if self.fragility.is_none() {
                        self.fragility = verdict.fragility;
                    }
                }
                // Whatever the backend skipped is done now.
                let since = self.running_since;
                for phase in &mut self.phases {
                    if !phase.status.is_terminal() {
                        if phase.status == PhaseStatus::Running
                            && let Some((key, started)) = since
                            && key == phase.key
                        {
                            phase.duration = Some((received_at - started).max(0.0));
                        }
                        phase.status = PhaseStatus::Complete;
                    }
                }
                self.running_since = None;
                self.current_phase = None;
                Some(Transition::Completed)
            }
            ConferenceEvent::ConferenceFailed { message } => {
                self.status = ConferenceStatus::Error;
                self.error = Some(message.clone());
                if let Some((key, _)) = self.running_since
                    && let Some(idx) = self.phase_index(key)
                {
                    self.phases[idx].status = PhaseStatus::Error;
                }
                self.running_since = None;
                Some(Transition::Failed {
                    message: message.clone(),
                })
            }
        };

        if transition.is_some() {
            // Any effective event proves the pipeline is live.
            if matches!(self.status, ConferenceStatus::Idle | ConferenceStatus::Starting) {
                self.status = ConferenceStatus::Running;
            }
            self.progress = overall_progress(&self.phases);
        }

        transition
    }

    /// Pull-based snapshot for readers (presentation, tests).
    pub fn snapshot(&self) -> ConferenceState {
        self.clone()
    }

    // ==================== Phase bookkeeping ====================

    fn phase_index(&self, key: PhaseKey) -> Option<usize> {
        self.phases.iter().position(|p| p.key == key)
    }

    /// Index of `key`, inserting it at its canonical position if the
    /// pipeline does not currently carry it.
    fn ensure_phase(&mut self, key: PhaseKey) -> usize {
        if let Some(idx) = self.phase_index(key) {
            return idx;
        }
        let idx = self.phases.partition_point(|p| p.key < key);
        self.phases
            .insert(idx, Phase::new(key, Some(key.default_estimate())));
        idx
    }

    /// Implicitly complete whichever other phase is still running.
    ///
    /// The canonical pipeline runs one phase at a time; when a later phase
    /// starts without the earlier one's `*_complete` having arrived, the
    /// earlier one is reconciled to `Complete` here.
    fn reconcile_running(&mut self, except: PhaseKey, now: f64) {
        if let Some((running, started)) = self.running_since
            && running != except
        {
            if let Some(idx) = self.phase_index(running)
                && self.phases[idx].status == PhaseStatus::Running
            {
                self.phases[idx].status = PhaseStatus::Complete;
                self.phases[idx].duration = Some((now - started).max(0.0));
            }
            self.running_since = None;
        }
    }

    fn start_phase(&mut self, key: PhaseKey, now: f64) -> Option<Transition> {
        self.reconcile_running(key, now);
        let idx = self.ensure_phase(key);
        if !self.phases[idx].advance(PhaseStatus::Running) {
            return None;
        }
        self.current_phase = Some(key);
        self.running_since = Some((key, now));
        Some(Transition::PhaseAdvanced {
            key,
            status: PhaseStatus::Running,
        })
    }

    fn complete_phase(&mut self, key: PhaseKey, now: f64) -> Option<Transition> {
        let started = match self.running_since {
            Some((running, started)) if running == key => Some(started),
            _ => None,
        };
        let idx = self.ensure_phase(key);
        if !self.phases[idx].advance(PhaseStatus::Complete) {
            return None;
        }
        self.phases[idx].duration = started.map(|s| (now - s).max(0.0));
        if started.is_some() {
            self.running_since = None;
        }
        Some(Transition::PhaseAdvanced {
            key,
            status: PhaseStatus::Complete,
        })
    }

    /// Force the named phase into `Running` for mid-phase events that
    /// arrive without their boundary (critiques, probes, synthesis
    /// deltas). Silent: the mid-phase event itself is the transition.
    fn touch_phase(&mut self, key: PhaseKey, now: f64) {
        self.reconcile_running(key, now);
        let idx = self.ensure_phase(key);
        if self.phases[idx].advance(PhaseStatus::Running) {
            self.current_phase = Some(key);
            self.running_since = Some((key, now));
        }
    }

    /// Lane phases have no boundary events of their own; a lane starts
    /// when its first agent event arrives and nothing else is running.
    fn touch_lane(&mut self, lane: Lane, now: f64) {
        if self.running_since.is_some() {
            return;
        }
        let idx = self.ensure_phase(lane.phase_key());
        if self.phases[idx].advance(PhaseStatus::Running) {
            self.current_phase = Some(lane.phase_key());
            self.running_since = Some((lane.phase_key(), now));
        }
    }

    /// Complete a lane phase once every agent addressed through it has
    /// reached a terminal status.
    fn settle_lane(&mut self, lane: Lane, now: f64) {
        let lane_agents: Vec<&AgentState> = self
            .agents
            .values()
            .filter(|a| a.lane == Some(lane))
            .collect();
        if !lane_agents.is_empty() && lane_agents.iter().all(|a| a.status.is_terminal()) {
            let _ = self.complete_phase(lane.phase_key(), now);
        }
    }
}

impl Default for ConferenceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conference::event::{Critique, RoutingDecision};

    fn routing_decided(roster: Vec<AgentRole>) -> ConferenceEvent {
        ConferenceEvent::RoutingDecided(RoutingDecision {
            mode: Some(DeliberationMode::ComplexDilemma),
            roster,
            scout_enabled: true,
        })
    }

    #[test]
    fn test_routing_decision_initializes_roster() {
        let mut state = ConferenceState::new();
        let transition = state.apply(
            &routing_decided(vec![AgentRole::Empiricist, AgentRole::Theorist]),
            10.0,
        );

        assert!(matches!(transition, Some(Transition::RoutingDecided { .. })));
        assert_eq!(state.mode, Some(DeliberationMode::ComplexDilemma));
        assert_eq!(state.agents.len(), 2);
        assert_eq!(
            state.agents[&AgentRole::Empiricist].status,
            AgentStatus::Waiting
        );
        let routing = state
            .phases
            .iter()
            .find(|p| p.key == PhaseKey::Routing)
            .unwrap();
        assert_eq!(routing.status, PhaseStatus::Complete);
        assert_eq!(state.status, ConferenceStatus::Running);
    }

    #[test]
    fn test_duplicate_routing_decision_is_silent() {
        let mut state = ConferenceState::new();
        let event = routing_decided(vec![AgentRole::Empiricist]);
        assert!(state.apply(&event, 10.0).is_some());
        assert!(state.apply(&event, 11.0).is_none());
    }

    #[test]
    fn test_scout_dropped_when_routing_disables_it() {
        let mut state = ConferenceState::new();
        let event = ConferenceEvent::RoutingDecided(RoutingDecision {
            mode: None,
            roster: vec![],
            scout_enabled: false,
        });
        assert!(state.apply(&event, 1.0).is_some());
        assert!(state.phases.iter().all(|p| p.key != PhaseKey::Scout));
    }

    #[test]
    fn test_complete_from_pending_fast_forwards() {
        let mut state = ConferenceState::new();
        // No scout_start was ever emitted.
        let transition = state.apply(
            &ConferenceEvent::ScoutCompleted {
                sources_found: Some(7),
            },
            5.0,
        );
        assert_eq!(
            transition,
            Some(Transition::PhaseAdvanced {
                key: PhaseKey::Scout,
                status: PhaseStatus::Complete,
            })
        );
    }

    #[test]
    fn test_only_one_phase_runs_at_a_time() {
        let mut state = ConferenceState::new();
        state.apply(&ConferenceEvent::RoutingStarted, 1.0);
        // Routing never completed; scout starting reconciles it.
        state.apply(&ConferenceEvent::ScoutStarted, 4.0);

        let routing = state
            .phases
            .iter()
            .find(|p| p.key == PhaseKey::Routing)
            .unwrap();
        assert_eq!(routing.status, PhaseStatus::Complete);
        assert_eq!(routing.duration, Some(3.0));

        let running: Vec<_> = state
            .phases
            .iter()
            .filter(|p| p.status == PhaseStatus::Running)
            .collect();
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].key, PhaseKey::Scout);
        assert_eq!(state.current_phase, Some(PhaseKey::Scout));
    }

    #[test]
    fn test_phase_duration_measured_on_completion() {
        let mut state = ConferenceState::new();
        state.apply(&ConferenceEvent::ScoutStarted, 100.0);
        state.apply(
            &ConferenceEvent::ScoutCompleted {
                sources_found: None,
            },
            112.5,
        );
        let scout = state
            .phases
            .iter()
            .find(|p| p.key == PhaseKey::Scout)
            .unwrap();
        assert_eq!(scout.duration, Some(12.5));
    }

    #[test]
    fn test_agent_events_only_touch_addressed_agent() {
        let mut state = ConferenceState::new();
        state.apply(
            &routing_decided(vec![AgentRole::Empiricist, AgentRole::Theorist]),
            0.0,
        );
        state.apply(
            &ConferenceEvent::AgentProgress {
                role: AgentRole::Empiricist,
                lane: None,
                tokens_generated: Some(50),
                tokens_estimated: Some(400),
                content_delta: None,
            },
            1.0,
        );

        assert_eq!(state.agents[&AgentRole::Empiricist].tokens_generated, 50);
        assert_eq!(state.agents[&AgentRole::Theorist].tokens_generated, 0);
        assert_eq!(
            state.agents[&AgentRole::Theorist].status,
            AgentStatus::Waiting
        );
    }

    #[test]
    fn test_out_of_order_progress_reports_nothing() {
        let mut state = ConferenceState::new();
        let progress = |n: u64| ConferenceEvent::AgentProgress {
            role: AgentRole::Skeptic,
            lane: None,
            tokens_generated: Some(n),
            tokens_estimated: Some(500),
            content_delta: None,
        };
        assert!(state.apply(&progress(200), 1.0).is_some());
        assert!(state.apply(&progress(120), 2.0).is_none());
        assert_eq!(state.agents[&AgentRole::Skeptic].tokens_generated, 200);
    }

    #[test]
    fn test_lane_completion_settles_lane_phase() {
        let mut state = ConferenceState::new();
        state.apply(&routing_decided(vec![AgentRole::Empiricist]), 0.0);
        state.apply(
            &ConferenceEvent::AgentStarted {
                role: AgentRole::Empiricist,
                lane: Some(Lane::Evidence),
            },
            1.0,
        );

        let lane_a = state
            .phases
            .iter()
            .find(|p| p.key == PhaseKey::LaneA)
            .unwrap();
        assert_eq!(lane_a.status, PhaseStatus::Running);

        state.apply(
            &ConferenceEvent::AgentCompleted {
                role: AgentRole::Empiricist,
                lane: Some(Lane::Evidence),
                confidence: Some(0.9),
                content: None,
            },
            9.0,
        );
        let lane_a = state
            .phases
            .iter()
            .find(|p| p.key == PhaseKey::LaneA)
            .unwrap();
        assert_eq!(lane_a.status, PhaseStatus::Complete);
        assert_eq!(lane_a.duration, Some(8.0));
    }

    #[test]
    fn test_agent_failure_is_local() {
        let mut state = ConferenceState::new();
        state.apply(
            &routing_decided(vec![AgentRole::Empiricist, AgentRole::Theorist]),
            0.0,
        );
        let transition = state.apply(
            &ConferenceEvent::AgentFailed {
                role: AgentRole::Theorist,
                lane: None,
                message: "model overloaded".to_string(),
            },
            1.0,
        );
        assert!(matches!(transition, Some(Transition::AgentFailed { .. })));
        assert_eq!(state.status, ConferenceStatus::Running);
        assert_eq!(state.agents[&AgentRole::Theorist].status, AgentStatus::Error);
    }

    #[test]
    fn test_critiques_and_probes_record_without_boundaries() {
        let mut state = ConferenceState::new();
        let critique = ConferenceEvent::CritiqueRaised(Critique {
            critic: Some(AgentRole::Skeptic),
            target: Some(AgentRole::Empiricist),
            summary: "sample size too small".to_string(),
        });
        assert!(matches!(
            state.apply(&critique, 1.0),
            Some(Transition::CritiqueRecorded { .. })
        ));
        let cross = state
            .phases
            .iter()
            .find(|p| p.key == PhaseKey::CrossExam)
            .unwrap();
        assert_eq!(cross.status, PhaseStatus::Running);
    }

    #[test]
    fn test_synthesis_accumulates() {
        let mut state = ConferenceState::new();
        state.apply(
            &ConferenceEvent::ArbitrationDelta {
                content: "On balance, ".to_string(),
            },
            1.0,
        );
        state.apply(
            &ConferenceEvent::ArbitrationDelta {
                content: "proceed.".to_string(),
            },
            2.0,
        );
        assert_eq!(state.synthesis, "On balance, proceed.");
    }

    #[test]
    fn test_terminal_completion_freezes_aggregate() {
        let mut state = ConferenceState::new();
        state.apply(&ConferenceEvent::ConferenceCompleted { result: None }, 1.0);
        assert_eq!(state.status, ConferenceStatus::Complete);
        assert_eq!(state.progress, 100);

        // Duplicate terminal delivery and any stragglers are ignored.
        assert!(
            state
                .apply(&ConferenceEvent::ConferenceCompleted { result: None }, 2.0)
                .is_none()
        );
        assert!(
            state
                .apply(
                    &ConferenceEvent::AgentStarted {
                        role: AgentRole::Empiricist,
                        lane: None,
                    },
                    3.0,
                )
                .is_none()
        );
        assert!(state.agents.is_empty());
    }

    #[test]
    fn test_terminal_failure_records_error() {
        let mut state = ConferenceState::new();
        state.apply(&ConferenceEvent::ScoutStarted, 1.0);
        let transition = state.apply(
            &ConferenceEvent::ConferenceFailed {
                message: "connection lost".to_string(),
            },
            2.0,
        );
        assert!(matches!(transition, Some(Transition::Failed { .. })));
        assert_eq!(state.status, ConferenceStatus::Error);
        assert_eq!(state.error.as_deref(), Some("connection lost"));
        let scout = state
            .phases
            .iter()
            .find(|p| p.key == PhaseKey::Scout)
            .unwrap();
        assert_eq!(scout.status, PhaseStatus::Error);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut state = ConferenceState::new();
        let events = [
            routing_decided(vec![]),
            ConferenceEvent::AgentStarted {
                role: AgentRole::Empiricist,
                lane: None,
            },
            ConferenceEvent::AgentProgress {
                role: AgentRole::Empiricist,
                lane: None,
                tokens_generated: Some(100),
                tokens_estimated: Some(500),
                content_delta: None,
            },
            ConferenceEvent::AgentCompleted {
                role: AgentRole::Empiricist,
                lane: None,
                confidence: Some(0.8),
                content: None,
            },
            ConferenceEvent::ConferenceCompleted { result: None },
        ];

        let mut transitions = 0;
        for (i, event) in events.iter().enumerate() {
            if state.apply(event, i as f64).is_some() {
                transitions += 1;
            }
        }

        assert_eq!(transitions, 5);
        assert_eq!(state.status, ConferenceStatus::Complete);
        assert_eq!(state.mode, Some(DeliberationMode::ComplexDilemma));
        let empiricist = &state.agents[&AgentRole::Empiricist];
        assert_eq!(empiricist.status, AgentStatus::Complete);
        assert_eq!(empiricist.confidence, Some(0.8));
        assert_eq!(empiricist.tokens_generated, 100);
        assert_eq!(state.progress, 100);
    }

    #[test]
    fn test_progress_advances_with_phases() {
        let mut state = ConferenceState::new();
        assert_eq!(state.progress, 0);
        state.apply(&ConferenceEvent::RoutingStarted, 0.0);
        let after_start = state.progress;
        assert!(after_start > 0);
        state.apply(&routing_decided(vec![]), 1.0);
        assert!(state.progress >= after_start);
    }
}
