//! Reminder window evaluation.

use chrono::{DateTime, Duration, Utc};

/// Half-open due-time interval `[start, end)` a cycle is interested in.
///
/// Derived from the wall clock on every cycle, never cached: "now" drifts
/// forward each time the trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReminderWindow {
    /// Build the window `[now, now + lead)`.
    pub fn starting_at(now: DateTime<Utc>, lead: Duration) -> Self {
        Self {
            start: now,
            end: now + lead,
        }
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}
