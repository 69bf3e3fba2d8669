use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ExamId;
use crate::model::session::SessionPlan;
use crate::planner::generate_plan;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam subject cannot be empty")]
    EmptySubject,

    #[error("invalid exam date: {raw} (expected YYYY-MM-DD)")]
    InvalidDate { raw: String },
}

//
// ─── INTENSITY ─────────────────────────────────────────────────────────────────
//

/// How hard the user wants to push before the exam.
///
/// Only controls how many review sessions get generated. Labels that are not
/// recognised are kept as `Unrecognized` instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unrecognized,
}

impl Intensity {
    /// Parses a user-facing label. Never fails.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unrecognized,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Number of review sessions generated for this intensity.
    #[must_use]
    pub fn session_count(self) -> usize {
        match self {
            Self::Low => 2,
            Self::Medium => 4,
            Self::High => 7,
            Self::Unrecognized => 3,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// User input for a new exam, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDraft {
    pub subject: String,
    pub date: NaiveDate,
    pub content: String,
    pub intensity: Intensity,
}

impl ExamDraft {
    /// Parses an ISO calendar date (`YYYY-MM-DD`) as typed by the user.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::InvalidDate` if the input is not a valid date.
    pub fn parse_date(raw: &str) -> Result<NaiveDate, ExamError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ExamError::InvalidDate {
            raw: raw.to_owned(),
        })
    }

    /// Trims text fields and checks the subject.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptySubject` if the subject is empty or whitespace-only.
    pub fn validate(self) -> Result<ValidatedExam, ExamError> {
        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err(ExamError::EmptySubject);
        }

        Ok(ValidatedExam {
            subject: subject.to_owned(),
            date: self.date,
            content: self.content.trim().to_owned(),
            intensity: self.intensity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedExam {
    subject: String,
    date: NaiveDate,
    content: String,
    intensity: Intensity,
}

impl ValidatedExam {
    /// Assigns an id and generates the review plan at the given hour.
    #[must_use]
    pub fn into_record(self, id: ExamId, preferred_hour: u32) -> ExamRecord {
        let plan = generate_plan(self.date, self.intensity, preferred_hour);
        ExamRecord {
            id,
            subject: self.subject,
            date: self.date,
            content: self.content,
            intensity: self.intensity,
            plan,
        }
    }
}

//
// ─── EXAM RECORD ───────────────────────────────────────────────────────────────
//

/// A user-declared upcoming exam together with its review schedule.
///
/// The number of sessions is fixed once the record exists; regeneration
/// reuses the stored intensity, so only times and labels are rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    id: ExamId,
    subject: String,
    date: NaiveDate,
    #[serde(default)]
    content: String,
    intensity: Intensity,
    #[serde(default)]
    plan: Vec<SessionPlan>,
}

impl ExamRecord {
    // Accessors
    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    #[must_use]
    pub fn plan(&self) -> &[SessionPlan] {
        &self.plan
    }

    #[must_use]
    pub fn session(&self, index: usize) -> Option<&SessionPlan> {
        self.plan.get(index)
    }

    /// Mutable access to one session. The plan itself cannot grow or shrink.
    pub fn session_mut(&mut self, index: usize) -> Option<&mut SessionPlan> {
        self.plan.get_mut(index)
    }

    #[must_use]
    pub fn completed_sessions(&self) -> usize {
        self.plan.iter().filter(|s| s.done).count()
    }

    /// Rebuilds the plan from the exam date, dropping all session progress.
    pub fn regenerate_plan(&mut self, preferred_hour: u32) {
        self.plan = generate_plan(self.date, self.intensity, preferred_hour);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(subject: &str, intensity: Intensity) -> ExamDraft {
        ExamDraft {
            subject: subject.into(),
            date: date("2024-06-10"),
            content: "  chapters 1-3  ".into(),
            intensity,
        }
    }

    #[test]
    fn validate_rejects_blank_subject() {
        let err = draft("   ", Intensity::Low).validate().unwrap_err();
        assert_eq!(err, ExamError::EmptySubject);
    }

    #[test]
    fn validate_trims_text() {
        let exam = draft("  Math ", Intensity::Medium)
            .validate()
            .unwrap()
            .into_record(ExamId::new(1), 19);
        assert_eq!(exam.subject(), "Math");
        assert_eq!(exam.content(), "chapters 1-3");
    }

    #[test]
    fn record_plan_matches_intensity() {
        let exam = draft("Math", Intensity::High)
            .validate()
            .unwrap()
            .into_record(ExamId::new(1), 19);
        assert_eq!(exam.plan().len(), 7);
        assert_eq!(exam.completed_sessions(), 0);
    }

    #[test]
    fn regenerate_keeps_session_count_and_resets_progress() {
        let mut exam = draft("Math", Intensity::Low)
            .validate()
            .unwrap()
            .into_record(ExamId::new(1), 19);
        exam.session_mut(0).unwrap().mark_done();

        exam.regenerate_plan(8);

        assert_eq!(exam.plan().len(), 2);
        assert_eq!(exam.completed_sessions(), 0);
        assert!(exam.plan().iter().all(|s| s.when.hour() == 8));
    }

    #[test]
    fn intensity_labels_parse_leniently() {
        assert_eq!(Intensity::from_label(" HIGH "), Intensity::High);
        assert_eq!(Intensity::from_label("medium"), Intensity::Medium);
        assert_eq!(Intensity::from_label("extreme"), Intensity::Unrecognized);
    }

    #[test]
    fn unknown_intensity_deserializes_as_unrecognized() {
        let parsed: Intensity = serde_json::from_str(r#""cram""#).unwrap();
        assert_eq!(parsed, Intensity::Unrecognized);
        assert_eq!(parsed.session_count(), 3);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(ExamDraft::parse_date("2024-06-10").is_ok());
        assert!(matches!(
            ExamDraft::parse_date("10/06/2024"),
            Err(ExamError::InvalidDate { .. })
        ));
    }

    #[test]
    fn record_round_trips_through_json() {
        let exam = draft("Physics", Intensity::Medium)
            .validate()
            .unwrap()
            .into_record(ExamId::new(1_717_000_000_000), 19);
        let json = serde_json::to_string(&exam).unwrap();
        assert!(json.contains(r#""intensity":"medium""#));
        assert!(json.contains(r#""date":"2024-06-10""#));
        let back: ExamRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, exam);
    }
}
