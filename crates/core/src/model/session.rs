use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One scheduled review slot within an exam's plan.
///
/// Owned by its parent [`ExamRecord`](crate::model::ExamRecord). `notified` is
/// carried for the notification poller and never touched by the scheduling
/// logic itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub when: NaiveDateTime,
    pub focus: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub postponed: u32,
    #[serde(default)]
    pub notified: bool,
}

impl SessionPlan {
    #[must_use]
    pub fn new(when: NaiveDateTime, focus: impl Into<String>) -> Self {
        Self {
            when,
            focus: focus.into(),
            done: false,
            postponed: 0,
            notified: false,
        }
    }

    /// Marks the session completed. Returns false if it already was.
    pub fn mark_done(&mut self) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        true
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.when.date()
    }
}
