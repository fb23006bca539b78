//! Append-only, time-ordered activity log.
//!
//! The log is a projection of every meaningful state transition,
//! independent of the reducer's "current" view: the aggregate tells you
//! where the conference *is*, the log tells you how it got there.
//!
//! Entries are created at receipt time, immutable afterwards, and only
//! ever removed by an explicit [`ActivityLog::clear`] at job (re)start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed taxonomy of activity entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Conference,
    Routing,
    Scout,
    Agent,
    CrossExam,
    Synthesis,
    Fragility,
    Terminal,
}

impl ActivityKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityKind::Conference => "conference",
            ActivityKind::Routing => "routing",
            ActivityKind::Scout => "scout",
            ActivityKind::Agent => "agent",
            ActivityKind::CrossExam => "cross_exam",
            ActivityKind::Synthesis => "synthesis",
            ActivityKind::Fragility => "fragility",
            ActivityKind::Terminal => "terminal",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Locally-unique list identity. Never used for ordering — the
    /// timestamp is authoritative for display, arrival order for storage.
    pub id: u64,
    /// Client receipt time. The wire carries no backend origination
    /// timestamps, so cross-phase skew under network jitter is a known
    /// limitation of these values.
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub phase: Option<String>,
    pub status: Option<String>,
    pub details: Option<String>,
}

/// Append-only activity log.
///
/// Owns its id counter explicitly, so independent instances (one per
/// monitor, one per test) never share identity state.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEvent>,
    next_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and append a new record, stamping id and receipt timestamp.
    /// O(1) amortized; never reorders or removes prior entries.
    pub fn record(
        &mut self,
        kind: ActivityKind,
        phase: Option<String>,
        status: Option<String>,
        details: Option<String>,
    ) -> &ActivityEvent {
        let event = ActivityEvent {
            id: self.next_id,
            timestamp: Utc::now(),
            kind,
            phase,
            status,
            details,
        };
        self.next_id += 1;
        let idx = self.entries.len();
        self.entries.push(event);
        &self.entries[idx]
    }

    /// Append an already-stamped record. Replay-safe: an entry whose id is
    /// already present is ignored, so re-delivering a batch of events
    /// cannot duplicate history.
    pub fn append(&mut self, event: ActivityEvent) -> bool {
        if self.entries.iter().any(|e| e.id == event.id) {
            return false;
        }
        self.next_id = self.next_id.max(event.id + 1);
        self.entries.push(event);
        true
    }

    /// All entries in stable arrival order.
    pub fn entries(&self) -> &[ActivityEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ActivityEvent> {
        self.entries.last()
    }

    /// The newest `n` entries, still in arrival order. Follow-latest
    /// display is exactly "show the tail".
    pub fn tail(&self, n: usize) -> &[ActivityEvent] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Entries of one kind, order preserved.
    pub fn filtered(&self, kind: ActivityKind) -> Vec<&ActivityEvent> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    /// Drop all history. Invoked only at the start of a new job; nothing
    /// else ever removes entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_count() {
        let mut log = ActivityLog::new();
        for i in 0..25 {
            log.record(
                ActivityKind::Agent,
                None,
                None,
                Some(format!("step {}", i)),
            );
        }
        assert_eq!(log.len(), 25);
        for (i, entry) in log.entries().iter().enumerate() {
            assert_eq!(entry.details.as_deref(), Some(format!("step {}", i).as_str()));
        }
    }

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut log = ActivityLog::new();
        let first = log.record(ActivityKind::Routing, None, None, None).id;
        let second = log.record(ActivityKind::Scout, None, None, None).id;
        assert!(second > first);
    }

    #[test]
    fn test_independent_logs_do_not_share_ids() {
        let mut a = ActivityLog::new();
        let mut b = ActivityLog::new();
        let id_a = a.record(ActivityKind::Conference, None, None, None).id;
        let id_b = b.record(ActivityKind::Conference, None, None, None).id;
        assert_eq!(id_a, id_b);
    }

    #[test]
    fn test_replay_of_seen_ids_is_ignored() {
        let mut log = ActivityLog::new();
        log.record(ActivityKind::Agent, None, None, None);
        let replay = log.entries()[0].clone();
        assert!(!log.append(replay));
        assert_eq!(log.len(), 1);

        // A genuinely new id still appends, and the counter moves past it.
        let mut foreign = log.entries()[0].clone();
        foreign.id = 40;
        assert!(log.append(foreign));
        let next = log.record(ActivityKind::Agent, None, None, None).id;
        assert!(next > 40);
    }

    #[test]
    fn test_tail_is_the_newest_entries() {
        let mut log = ActivityLog::new();
        for i in 0..10 {
            log.record(ActivityKind::Agent, None, None, Some(i.to_string()));
        }
        let tail = log.tail(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].details.as_deref(), Some("7"));
        assert_eq!(tail[2].details.as_deref(), Some("9"));

        assert_eq!(log.tail(100).len(), 10);
    }

    #[test]
    fn test_filter_preserves_order() {
        let mut log = ActivityLog::new();
        log.record(ActivityKind::Agent, None, None, Some("a".into()));
        log.record(ActivityKind::Routing, None, None, None);
        log.record(ActivityKind::Agent, None, None, Some("b".into()));
        let agents = log.filtered(ActivityKind::Agent);
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].details.as_deref(), Some("a"));
        assert_eq!(agents[1].details.as_deref(), Some("b"));
    }

    #[test]
    fn test_clear_resets_history() {
        let mut log = ActivityLog::new();
        log.record(ActivityKind::Conference, None, None, None);
        log.clear();
        assert!(log.is_empty());
    }
}
