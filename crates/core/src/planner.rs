use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::{Intensity, SessionPlan};

/// Study hour used when the user has not expressed a preference (19:00).
pub const DEFAULT_PREFERRED_HOUR: u32 = 19;

//
// ─── PLAN GENERATION ───────────────────────────────────────────────────────────
//

/// Builds the review schedule leading up to an exam.
///
/// For `N = intensity.session_count()` sessions, round `i` (1-based) lands on
/// `exam_date - (N - i + 1)` days at `preferred_hour:00:00`. The sessions
/// therefore occupy the N consecutive days ending the day before the exam,
/// in ascending order, one day apart. Nothing checks that those days are
/// still in the future.
///
/// `preferred_hour` is clamped to `0..=23`.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use exam_core::model::Intensity;
/// # use exam_core::planner::generate_plan;
/// let exam = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// let plan = generate_plan(exam, Intensity::Low, 19);
///
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan[1].when.to_string(), "2024-06-09 19:00:00");
/// ```
#[must_use]
pub fn generate_plan(
    exam_date: NaiveDate,
    intensity: Intensity,
    preferred_hour: u32,
) -> Vec<SessionPlan> {
    let count = intensity.session_count();
    (1..=count)
        .map(|round| {
            let day = days_before(exam_date, count - round + 1);
            SessionPlan::new(at_hour(day, preferred_hour), focus_label(round))
        })
        .collect()
}

/// Label shown for the `round`-th session (1-based).
#[must_use]
pub fn focus_label(round: usize) -> String {
    format!("Review round {round}")
}

//
// ─── DATE HELPERS ──────────────────────────────────────────────────────────────
//

#[must_use]
pub fn clamp_hour(hour: u32) -> u32 {
    hour.min(23)
}

/// `date` at `hour:00:00`, with the hour clamped to a valid clock hour.
#[must_use]
pub fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(clamp_hour(hour), 0, 0)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

// Saturates at the earliest representable date instead of panicking.
fn days_before(date: NaiveDate, days: usize) -> NaiveDate {
    u64::try_from(days)
        .ok()
        .and_then(|d| date.checked_sub_days(Days::new(d)))
        .unwrap_or(NaiveDate::MIN)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
