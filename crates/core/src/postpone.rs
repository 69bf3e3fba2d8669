//! Adaptive postponement.
//!
//! Snoozing pushes an item back and counts how often that happened. Once the
//! count reaches [`POSTPONE_THRESHOLD`] the caller should offer a
//! [`TimeSuggestion`]: the same calendar day, at the user's preferred hour.
//! Suggestions are plain values; nothing changes until the caller calls
//! [`TimeSuggestion::accept`].
//!
//! The tracker does not look at completion state. Callers decide whether a
//! finished session may still be snoozed.
//!
//! ```text
//!   PENDING --snooze--> PENDING (postponed++)
//!   PENDING --postponed>=3--> SUGGESTION_OFFERED
//!   SUGGESTION_OFFERED --accept--> PENDING (postponed=0, when=heuristic)
//!   SUGGESTION_OFFERED --reject--> PENDING (unchanged)
//! ```

use chrono::{Duration, NaiveDateTime};

use crate::model::{Reminder, SessionPlan};
use crate::planner::{at_hour, clamp_hour};

/// Snoozes in a row after which a better time is proposed.
pub const POSTPONE_THRESHOLD: u32 = 3;

/// Default snooze for review sessions.
pub const DEFAULT_SNOOZE_MINUTES: u32 = 30;

/// Default snooze for reminders.
pub const REMINDER_SNOOZE_MINUTES: u32 = 10;

/// Anything with a scheduled time and a postpone counter.
pub trait Postponable {
    fn scheduled_at(&self) -> NaiveDateTime;
    fn reschedule(&mut self, at: NaiveDateTime);
    fn postpone_count(&self) -> u32;
    fn set_postpone_count(&mut self, count: u32);
}

impl Postponable for SessionPlan {
    fn scheduled_at(&self) -> NaiveDateTime {
        self.when
    }

    fn reschedule(&mut self, at: NaiveDateTime) {
        self.when = at;
    }

    fn postpone_count(&self) -> u32 {
        self.postponed
    }

    fn set_postpone_count(&mut self, count: u32) {
        self.postponed = count;
    }
}

impl Postponable for Reminder {
    fn scheduled_at(&self) -> NaiveDateTime {
        self.at
    }

    fn reschedule(&mut self, at: NaiveDateTime) {
        self.at = at;
    }

    fn postpone_count(&self) -> u32 {
        self.postponed
    }

    fn set_postpone_count(&mut self, count: u32) {
        self.postponed = count;
    }
}

//
// ─── SNOOZE ────────────────────────────────────────────────────────────────────
//

/// Result of a single snooze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnoozeOutcome {
    pub previous: NaiveDateTime,
    pub rescheduled_to: NaiveDateTime,
    pub postpone_count: u32,
}

impl SnoozeOutcome {
    /// True once the counter has reached the threshold.
    #[must_use]
    pub fn suggestion_due(&self) -> bool {
        self.postpone_count >= POSTPONE_THRESHOLD
    }
}

/// Pushes `item` back by `delay_minutes` and bumps its postpone counter.
///
/// There is no cap on either the counter or the accumulated delay.
pub fn snooze<P: Postponable + ?Sized>(item: &mut P, delay_minutes: u32) -> SnoozeOutcome {
    let previous = item.scheduled_at();
    let rescheduled_to = previous
        .checked_add_signed(Duration::minutes(i64::from(delay_minutes)))
        .unwrap_or(NaiveDateTime::MAX);
    let postpone_count = item.postpone_count().saturating_add(1);

    item.reschedule(rescheduled_to);
    item.set_postpone_count(postpone_count);

    SnoozeOutcome {
        previous,
        rescheduled_to,
        postpone_count,
    }
}

/// Re-evaluates the threshold condition for `item`.
#[must_use]
pub fn needs_suggestion<P: Postponable + ?Sized>(item: &P) -> bool {
    item.postpone_count() >= POSTPONE_THRESHOLD
}

//
// ─── SUGGESTIONS ───────────────────────────────────────────────────────────────
//

/// A proposed replacement time. Advisory until accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSuggestion {
    current: NaiveDateTime,
    proposed: NaiveDateTime,
}

impl TimeSuggestion {
    #[must_use]
    pub fn current(&self) -> NaiveDateTime {
        self.current
    }

    #[must_use]
    pub fn proposed(&self) -> NaiveDateTime {
        self.proposed
    }

    /// Moves `item` to the proposed time and clears its postpone counter.
    pub fn accept<P: Postponable + ?Sized>(&self, item: &mut P) {
        item.reschedule(self.proposed);
        item.set_postpone_count(0);
    }

    /// Declines the proposal. The item is left untouched.
    pub fn reject(self) {}
}

/// Proposes `preferred_hour:00:00` on the day `item` currently falls on.
///
/// The day is taken from the current (possibly snoozed) time, not from the
/// originally planned one.
#[must_use]
pub fn suggest_better_time<P: Postponable + ?Sized>(item: &P, preferred_hour: u32) -> TimeSuggestion {
    let current = item.scheduled_at();
    TimeSuggestion {
        current,
        proposed: at_hour(current.date(), clamp_hour(preferred_hour)),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
