use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ReminderId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReminderError {
    #[error("reminder title cannot be empty")]
    EmptyTitle,

    #[error("invalid reminder time: {raw} (expected YYYY-MM-DDTHH:MM)")]
    InvalidDateTime { raw: String },
}

/// User input for a reminder, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDraft {
    pub title: String,
    pub at: NaiveDateTime,
    pub message: String,
    pub voice: String,
}

impl ReminderDraft {
    /// Parses a local date-time as typed into a `datetime-local` field.
    /// Seconds are accepted but later dropped.
    ///
    /// # Errors
    ///
    /// Returns `ReminderError::InvalidDateTime` if neither `YYYY-MM-DDTHH:MM`
    /// nor `YYYY-MM-DDTHH:MM:SS` matches.
    pub fn parse_at(raw: &str) -> Result<NaiveDateTime, ReminderError> {
        let trimmed = raw.trim();
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| ReminderError::InvalidDateTime {
                raw: raw.to_owned(),
            })
    }

    /// Trims text fields and truncates the time to whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `ReminderError::EmptyTitle` if the title is blank.
    pub fn validate(self, id: ReminderId) -> Result<Reminder, ReminderError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ReminderError::EmptyTitle);
        }

        Ok(Reminder {
            id,
            title: title.to_owned(),
            at: truncate_to_minute(self.at),
            message: self.message.trim().to_owned(),
            voice: self.voice.trim().to_owned(),
            notified: false,
            postponed: 0,
        })
    }
}

/// A free-standing study reminder.
///
/// Shares the postponement rules with review sessions, with a shorter default
/// snooze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    #[serde(rename = "datetime")]
    pub at: NaiveDateTime,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub notified: bool,
    #[serde(default)]
    pub postponed: u32,
}

fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}
