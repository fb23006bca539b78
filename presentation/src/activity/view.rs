//! Bounded-height window over the activity log.
//!
//! The log itself exposes entries in stable arrival order, so
//! follow-latest is simply "show the tail". [`ActivityView`] adds the
//! scroll state on top: a fixed height, an auto-follow toggle that any
//! manual scroll disables, and an order-preserving kind filter.
//!
//! Pure presentation state; it never touches the log, only slices of it.

use conclave_application::{ActivityEvent, ActivityKind};

/// Scroll/filter state for a bounded activity panel.
#[derive(Debug, Clone)]
pub struct ActivityView {
    height: usize,
    follow: bool,
    /// First visible row when not following
    offset: usize,
    filter: Option<ActivityKind>,
}

impl ActivityView {
    pub fn new(height: usize) -> Self {
        Self {
            height: height.max(1),
            follow: true,
            offset: 0,
            filter: None,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Re-enable auto-follow; the window snaps back to the tail.
    pub fn follow_latest(&mut self) {
        self.follow = true;
    }

    /// Jump to an absolute row. Any manual scroll disables auto-follow.
    pub fn scroll_to(&mut self, offset: usize) {
        self.follow = false;
        self.offset = offset;
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_add(rows);
    }

    /// Restrict the view to one activity kind (`None` shows everything).
    pub fn set_filter(&mut self, filter: Option<ActivityKind>) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Option<ActivityKind> {
        self.filter
    }

    /// The visible slice of `entries`, filtered and windowed, in the same
    /// order they were appended.
    pub fn visible<'a>(&self, entries: &'a [ActivityEvent]) -> Vec<&'a ActivityEvent> {
        let filtered: Vec<&ActivityEvent> = entries
            .iter()
            .filter(|entry| self.filter.is_none_or(|kind| entry.kind == kind))
            .collect();

        if self.follow {
            let start = filtered.len().saturating_sub(self.height);
            return filtered[start..].to_vec();
        }

        let start = self.offset.min(filtered.len());
        let end = (start + self.height).min(filtered.len());
        filtered[start..end].to_vec()
    }
}
