use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an exam record.
///
/// Derived from the creation instant (milliseconds since the Unix epoch).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(u64);

impl ExamId {
    /// Creates a new `ExamId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Derives an id from the moment the exam was created.
    #[must_use]
    pub fn from_created_at(at: NaiveDateTime) -> Self {
        Self(millis_since_epoch(at))
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id one millisecond later, used to step past collisions.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Unique identifier for a reminder.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(u64);

impl ReminderId {
    /// Creates a new `ReminderId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Derives an id from the moment the reminder was created.
    #[must_use]
    pub fn from_created_at(at: NaiveDateTime) -> Self {
        Self(millis_since_epoch(at))
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id one millisecond later, used to step past collisions.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Unique identifier for a flashcard set (one subject and topic).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashcardSetId(u64);

impl FlashcardSetId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn from_created_at(at: NaiveDateTime) -> Self {
        Self(millis_since_epoch(at))
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identifier of a card within its set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashcardId(u64);

impl FlashcardId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn from_created_at(at: NaiveDateTime) -> Self {
        Self(millis_since_epoch(at))
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

fn millis_since_epoch(at: NaiveDateTime) -> u64 {
    u64::try_from(at.and_utc().timestamp_millis()).unwrap_or(0)
}

impl fmt::Debug for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExamId({})", self.0)
    }
}

impl fmt::Debug for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReminderId({})", self.0)
    }
}

impl fmt::Debug for FlashcardSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlashcardSetId({})", self.0)
    }
}

impl fmt::Debug for FlashcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlashcardId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FlashcardSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ExamId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ExamId::new)
            .map_err(|_| ParseIdError {
                kind: "ExamId".to_string(),
            })
    }
}

impl FromStr for ReminderId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ReminderId::new)
            .map_err(|_| ParseIdError {
                kind: "ReminderId".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn exam_id_from_created_at_uses_millis() {
        let id = ExamId::from_created_at(fixed_now());
        assert_eq!(id.value(), 1_700_000_000_000);
    }

    #[test]
    fn exam_id_next_steps_by_one() {
        let id = ExamId::new(41);
        assert_eq!(id.next(), ExamId::new(42));
    }

    #[test]
    fn exam_id_from_str_invalid() {
        let result = "not-a-number".parse::<ExamId>();
        assert!(result.is_err());
    }

    #[test]
    fn reminder_id_parses_trimmed() {
        let id: ReminderId = " 55 ".parse().unwrap();
        assert_eq!(id, ReminderId::new(55));
        assert_eq!(id.to_string(), "55");
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&ExamId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ReminderId = serde_json::from_str("9").unwrap();
        assert_eq!(back, ReminderId::new(9));
    }
}
