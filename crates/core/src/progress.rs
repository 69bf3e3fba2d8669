use chrono::{Days, NaiveDate};

use crate::model::{ExamId, ExamRecord};

/// Days before an exam during which its sessions are flagged urgent.
pub const URGENT_WITHIN_DAYS: i64 = 2;

/// Length of the rolling agenda, today included.
pub const AGENDA_DAYS: u64 = 7;

//
// ─── OVERALL PROGRESS ──────────────────────────────────────────────────────────
//

/// Completed vs planned sessions across every exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanProgress {
    pub total: usize,
    pub done: usize,
    pub percent: u32,
}

impl PlanProgress {
    #[must_use]
    pub fn compute(exams: &[ExamRecord]) -> Self {
        let total: usize = exams.iter().map(|e| e.plan().len()).sum();
        let done: usize = exams.iter().map(ExamRecord::completed_sessions).sum();
        Self {
            total,
            done,
            percent: percent_rounded(done, total),
        }
    }
}

// Integer round-half-up of done/total*100.
fn percent_rounded(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (done.saturating_mul(200) + total) / total.saturating_mul(2);
    u32::try_from(scaled).unwrap_or(100)
}

/// Exams whose date lies within `[today, today + days]`.
#[must_use]
pub fn upcoming_exam_count(exams: &[ExamRecord], today: NaiveDate, days: u64) -> usize {
    let horizon = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    exams
        .iter()
        .filter(|e| e.date() >= today && e.date() <= horizon)
        .count()
}

//
// ─── AGENDA ────────────────────────────────────────────────────────────────────
//

/// A reference to one session of one exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRef {
    pub exam_id: ExamId,
    pub index: usize,
}

/// Sessions scheduled on `day`, in exam order then plan order.
#[must_use]
pub fn sessions_on(exams: &[ExamRecord], day: NaiveDate) -> Vec<SessionRef> {
    exams
        .iter()
        .flat_map(|exam| {
            exam.plan()
                .iter()
                .enumerate()
                .filter(move |(_, s)| s.date() == day)
                .map(move |(index, _)| SessionRef {
                    exam_id: exam.id(),
                    index,
                })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaItem {
    pub exam_id: ExamId,
    pub subject: String,
    pub session_index: usize,
    pub focus: String,
    pub done: bool,
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAgenda {
    pub day: NaiveDate,
    pub items: Vec<AgendaItem>,
}

impl DayAgenda {
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds the agenda for `today` and the following six days.
///
/// A session is urgent when its exam falls 0 to 2 days after the agenda day.
#[must_use]
pub fn weekly_agenda(exams: &[ExamRecord], today: NaiveDate) -> Vec<DayAgenda> {
    (0..AGENDA_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|day| day_agenda(exams, day))
        .collect()
}

/// The agenda of a single day.
#[must_use]
pub fn day_agenda(exams: &[ExamRecord], day: NaiveDate) -> DayAgenda {
    let mut items = Vec::new();
    for exam in exams {
        let days_left = (exam.date() - day).num_days();
        let urgent = (0..=URGENT_WITHIN_DAYS).contains(&days_left);
        for (index, session) in exam.plan().iter().enumerate() {
            if session.date() != day {
                continue;
            }
            items.push(AgendaItem {
                exam_id: exam.id(),
                subject: exam.subject().to_owned(),
                session_index: index,
                focus: session.focus.clone(),
                done: session.done,
                urgent,
            });
        }
    }
    DayAgenda { day, items }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
