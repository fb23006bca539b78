//! Conference observation port
//!
//! [`ConferenceObserver`] is an **output port** the presentation layer
//! implements to render live progress. Every callback hands over a
//! pull-based snapshot, never a mutable reference: any presentation layer
//! (or a headless test harness) observing the same events sees identical
//! state.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use crate::activity::ActivityEvent;
use conclave_domain::{ConferenceState, Transition};

/// Callbacks for conference progress, fed after each effective reconciliation step.
pub trait ConferenceObserver: Send + Sync {
    /// Called after the reducer applied an event that actually changed state.
    fn on_transition(&self, _transition: &Transition, _snapshot: &ConferenceState) {}

    /// Called with the activity record derived from that same transition.
    fn on_activity(&self, _entry: &ActivityEvent) {}
}

/// No-op implementation for when observation isn't needed
pub struct NoObserver;

impl ConferenceObserver for NoObserver {}
