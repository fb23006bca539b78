//! Conference monitor — the single writer of aggregate and history.
//!
//! [`ConferenceMonitor`] composes the domain reducer with the activity
//! log: every ingested event is applied to the aggregate, and each
//! effective transition is projected into exactly one activity record.
//! Consumers key off actual value change, never raw event receipt — a
//! duplicate event produces neither a transition nor a record.
//!
//! Everything here is synchronous. All mutation triggered by a single
//! wire event completes before `ingest` returns, so readers of the
//! pull-based [`snapshot`](ConferenceMonitor::snapshot) can never observe
//! a half-updated aggregate.

use crate::activity::{ActivityEvent, ActivityKind, ActivityLog};
use chrono::Utc;
use conclave_domain::{
    ConferenceEvent, ConferenceState, JobId, PhaseKey, Transition,
};

fn kind_for_phase(key: PhaseKey) -> ActivityKind {
    match key {
        PhaseKey::Routing => ActivityKind::Routing,
        PhaseKey::Scout => ActivityKind::Scout,
        PhaseKey::LaneA | PhaseKey::LaneB => ActivityKind::Agent,
        PhaseKey::CrossExam => ActivityKind::CrossExam,
        PhaseKey::Synthesis => ActivityKind::Synthesis,
        PhaseKey::Fragility => ActivityKind::Fragility,
    }
}

/// Stateful core of the client: reducer + activity history, one writer.
pub struct ConferenceMonitor {
    state: ConferenceState,
    log: ActivityLog,
}

impl ConferenceMonitor {
    pub fn new() -> Self {
        Self {
            state: ConferenceState::new(),
            log: ActivityLog::new(),
        }
    }

    /// Reset for a new job: fresh aggregate, cleared history.
    ///
    /// This is the only place the activity log is cleared.
    pub fn begin(&mut self, job_id: JobId, scout_enabled: bool, fragility_enabled: bool) {
        self.state = ConferenceState::for_job(job_id, scout_enabled, fragility_enabled);
        self.log.clear();
    }

    /// Ingest one decoded event at the current receipt time.
    pub fn ingest(&mut self, event: &ConferenceEvent) -> Option<Transition> {
        let received_at = Utc::now().timestamp_millis() as f64 / 1000.0;
        self.ingest_at(event, received_at)
    }

    /// Ingest with an explicit receipt clock (tests).
    pub fn ingest_at(&mut self, event: &ConferenceEvent, received_at: f64) -> Option<Transition> {
        let transition = self.state.apply(event, received_at)?;
        let (kind, phase, status, details) = Self::project(event, &transition);
        self.log.record(kind, phase, status, details);
        Some(transition)
    }

    /// Current aggregate, read-only.
    pub fn state(&self) -> &ConferenceState {
        &self.state
    }

    /// Owned snapshot of the aggregate for readers.
    pub fn snapshot(&self) -> ConferenceState {
        self.state.snapshot()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.log
    }

    pub fn last_activity(&self) -> Option<&ActivityEvent> {
        self.log.last()
    }

    /// Derive the single activity record for an effective transition.
    ///
    /// The transition decides the shape; the event contributes payload
    /// details the transition doesn't carry (lane addressing, source
    /// counts, critique text).
    #[allow(clippy::type_complexity)]
    fn project(
        event: &ConferenceEvent,
        transition: &Transition,
    ) -> (ActivityKind, Option<String>, Option<String>, Option<String>) {
        match transition {
            Transition::Started => (
                ActivityKind::Conference,
                None,
                Some("running".to_string()),
                Some("deliberation started".to_string()),
            ),
            Transition::RoutingDecided { mode, roster } => {
                let mode_text = mode
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "unrouted".to_string());
                (
                    ActivityKind::Routing,
                    Some(PhaseKey::Routing.as_str().to_string()),
                    Some("complete".to_string()),
                    Some(format!("mode {}, {} participants", mode_text, roster.len())),
                )
            }
            Transition::PhaseAdvanced { key, status } => {
                let details = match event {
                    ConferenceEvent::ScoutCompleted {
                        sources_found: Some(n),
                    } => Some(format!("{} sources retrieved", n)),
                    ConferenceEvent::FragilityCompleted { report } => Some(format!(
                        "verdict held in {}/{} probes",
                        report.survived, report.total
                    )),
                    _ => None,
                };
                (
                    kind_for_phase(*key),
                    Some(key.as_str().to_string()),
                    Some(status.as_str().to_string()),
                    details,
                )
            }
            Transition::AgentAdvanced { role, status } => {
                let lane = match event {
                    ConferenceEvent::AgentStarted { lane, .. }
                    | ConferenceEvent::AgentProgress { lane, .. }
                    | ConferenceEvent::AgentCompleted { lane, .. } => *lane,
                    _ => None,
                };
                (
                    ActivityKind::Agent,
                    lane.map(|l| l.as_str().to_string()),
                    Some(status.as_str().to_string()),
                    Some(role.display_name().to_string()),
                )
            }
            Transition::AgentProgressed {
                role,
                tokens_generated,
                tokens_estimated,
            } => (
                ActivityKind::Agent,
                None,
                Some("streaming".to_string()),
                Some(format!(
                    "{}: {}/{} tokens",
                    role.display_name(),
                    tokens_generated,
                    tokens_estimated
                )),
            ),
            Transition::AgentFailed { role, message } => (
                ActivityKind::Agent,
                None,
                Some("error".to_string()),
                Some(format!("{}: {}", role.display_name(), message)),
            ),
            Transition::CritiqueRecorded { critic, target } => {
                let summary = match event {
                    ConferenceEvent::CritiqueRaised(c) if !c.summary.is_empty() => {
                        Some(c.summary.clone())
                    }
                    _ => None,
                };
                let who = match (critic, target) {
                    (Some(c), Some(t)) => {
                        format!("{} challenged {}", c.display_name(), t.display_name())
                    }
                    (Some(c), None) => format!("{} raised a critique", c.display_name()),
                    _ => "critique raised".to_string(),
                };
                (
                    ActivityKind::CrossExam,
                    Some(PhaseKey::CrossExam.as_str().to_string()),
                    None,
                    Some(match summary {
                        Some(s) => format!("{}: {}", who, s),
                        None => who,
                    }),
                )
            }
            Transition::SynthesisAppended { total_chars } => (
                ActivityKind::Synthesis,
                Some(PhaseKey::Synthesis.as_str().to_string()),
                Some("streaming".to_string()),
                Some(format!("{} chars drafted", total_chars)),
            ),
            Transition::ProbeRecorded { probe, held } => (
                ActivityKind::Fragility,
                Some(PhaseKey::Fragility.as_str().to_string()),
                None,
                Some(format!(
                    "probe '{}' {}",
                    probe,
                    if *held { "held" } else { "broke the verdict" }
                )),
            ),
            Transition::Completed => (
                ActivityKind::Terminal,
                None,
                Some("complete".to_string()),
                None,
            ),
            Transition::Failed { message } => (
                ActivityKind::Terminal,
                None,
                Some("error".to_string()),
                Some(message.clone()),
            ),
        }
    }
}

impl Default for ConferenceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{
        AgentRole, AgentStatus, ConferenceStatus, DeliberationMode, RoutingDecision,
    };

    fn five_event_run() -> Vec<ConferenceEvent> {
        vec![
            ConferenceEvent::RoutingDecided(RoutingDecision {
                mode: Some(DeliberationMode::ComplexDilemma),
                roster: vec![],
                scout_enabled: true,
            }),
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
        ]
    }

    #[test]
    fn test_end_to_end_scenario_yields_five_ordered_records() {
        let mut monitor = ConferenceMonitor::new();
        monitor.begin(JobId::new("job-1"), true, true);

        for (i, event) in five_event_run().iter().enumerate() {
            assert!(monitor.ingest_at(event, i as f64).is_some());
        }

        let state = monitor.state();
        assert_eq!(state.status, ConferenceStatus::Complete);
        assert_eq!(
            state.agents[&AgentRole::Empiricist].status,
            AgentStatus::Complete
        );
        assert_eq!(state.agents[&AgentRole::Empiricist].confidence, Some(0.8));

        let entries = monitor.activity().entries();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].kind, ActivityKind::Routing);
        assert_eq!(entries[1].kind, ActivityKind::Agent);
        assert_eq!(entries[2].kind, ActivityKind::Agent);
        assert_eq!(entries[3].kind, ActivityKind::Agent);
        assert_eq!(entries[4].kind, ActivityKind::Terminal);
        for pair in entries.windows(2) {
            assert!(pair[0].id < pair[1].id);
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn test_duplicate_event_appends_nothing() {
        let mut monitor = ConferenceMonitor::new();
        monitor.begin(JobId::new("job-2"), true, true);

        let event = ConferenceEvent::AgentStarted {
            role: AgentRole::Theorist,
            lane: None,
        };
        assert!(monitor.ingest_at(&event, 1.0).is_some());
        assert!(monitor.ingest_at(&event, 2.0).is_none());
        assert_eq!(monitor.activity().len(), 1);
    }

    #[test]
    fn test_events_after_terminal_append_nothing() {
        let mut monitor = ConferenceMonitor::new();
        monitor.begin(JobId::new("job-3"), true, true);
        monitor.ingest_at(&ConferenceEvent::ConferenceCompleted { result: None }, 1.0);
        assert_eq!(monitor.activity().len(), 1);

        monitor.ingest_at(&ConferenceEvent::ConferenceCompleted { result: None }, 2.0);
        monitor.ingest_at(&ConferenceEvent::RoutingStarted, 3.0);
        assert_eq!(monitor.activity().len(), 1);
        assert_eq!(monitor.state().status, ConferenceStatus::Complete);
    }

    #[test]
    fn test_begin_resets_state_and_history() {
        let mut monitor = ConferenceMonitor::new();
        monitor.begin(JobId::new("job-4"), true, true);
        monitor.ingest_at(&ConferenceEvent::RoutingStarted, 1.0);
        assert!(!monitor.activity().is_empty());

        monitor.begin(JobId::new("job-5"), false, true);
        assert!(monitor.activity().is_empty());
        assert_eq!(monitor.state().status, ConferenceStatus::Starting);
        assert_eq!(monitor.state().job_id, Some(JobId::new("job-5")));
        assert!(
            monitor
                .state()
                .phases
                .iter()
                .all(|p| p.key != PhaseKey::Scout)
        );
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut monitor = ConferenceMonitor::new();
        monitor.begin(JobId::new("job-6"), true, true);
        let before = monitor.snapshot();
        monitor.ingest_at(&ConferenceEvent::RoutingStarted, 1.0);
        assert_eq!(before.progress, 0);
        assert!(monitor.state().progress > 0);
    }
}
