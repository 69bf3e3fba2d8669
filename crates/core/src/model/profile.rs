use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planner::DEFAULT_PREFERRED_HOUR;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("preferred hour must be between 0 and 23, got {0}")]
    InvalidPreferredHour(u32),

    #[error("unknown mood: {0}")]
    UnknownMood(String),
}

//
// ─── POINTS & BADGES ───────────────────────────────────────────────────────────
//

/// Why points are being awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsReason {
    ExamAdded,
    SessionCompleted,
    ReminderTriggered,
    PomodoroCompleted,
}

impl PointsReason {
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            Self::ExamAdded => 10,
            Self::SessionCompleted => 5,
            Self::ReminderTriggered => 1,
            Self::PomodoroCompleted => 2,
        }
    }
}

/// Milestones unlocked by accumulating points. Never revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Starter")]
    Starter,
    #[serde(rename = "Pro Student")]
    ProStudent,
}

impl Badge {
    /// All badges in unlock order.
    pub const ALL: [Badge; 2] = [Badge::Starter, Badge::ProStudent];

    #[must_use]
    pub fn threshold(self) -> u32 {
        match self {
            Self::Starter => 50,
            Self::ProStudent => 200,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Starter => "Starter",
            Self::ProStudent => "Pro Student",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── MOOD ──────────────────────────────────────────────────────────────────────
//

/// Self-reported energy level, used to guess a good study hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Fresh,
    Neutral,
    Tired,
}

impl Mood {
    /// Parses a mood label.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::UnknownMood` for anything other than
    /// `fresh`, `neutral` or `tired`.
    pub fn from_label(label: &str) -> Result<Self, ProfileError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "fresh" => Ok(Self::Fresh),
            "neutral" => Ok(Self::Neutral),
            "tired" => Ok(Self::Tired),
            _ => Err(ProfileError::UnknownMood(label.to_owned())),
        }
    }

    /// Hour of day this mood tends to study best at.
    #[must_use]
    pub fn preferred_hour(self) -> u32 {
        match self {
            Self::Fresh => 9,
            Self::Neutral => DEFAULT_PREFERRED_HOUR,
            Self::Tired => 21,
        }
    }
}

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

/// Per-user gamification state and scheduling preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    points: u32,
    #[serde(default)]
    badges: Vec<Badge>,
    #[serde(default)]
    mood: Option<Mood>,
    #[serde(default)]
    preferred_hour: Option<u32>,
}

impl UserProfile {
    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    #[must_use]
    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    #[must_use]
    pub fn preferred_hour(&self) -> Option<u32> {
        self.preferred_hour
    }

    /// Explicit hour, else the mood's hour, else the 19:00 default.
    #[must_use]
    pub fn effective_preferred_hour(&self) -> u32 {
        self.preferred_hour
            .or_else(|| self.mood.map(Mood::preferred_hour))
            .unwrap_or(DEFAULT_PREFERRED_HOUR)
    }

    pub fn set_mood(&mut self, mood: Option<Mood>) {
        self.mood = mood;
    }

    /// Sets or clears the explicit study hour.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidPreferredHour` if the hour is above 23.
    pub fn set_preferred_hour(&mut self, hour: Option<u32>) -> Result<(), ProfileError> {
        if let Some(h) = hour {
            if h > 23 {
                return Err(ProfileError::InvalidPreferredHour(h));
            }
        }
        self.preferred_hour = hour;
        Ok(())
    }

    /// Adds points for `reason` and returns any badges unlocked by it.
    pub fn award(&mut self, reason: PointsReason) -> Vec<Badge> {
        self.add_points(reason.points())
    }

    /// Adds raw points and returns newly unlocked badges, in unlock order.
    pub fn add_points(&mut self, amount: u32) -> Vec<Badge> {
        self.points = self.points.saturating_add(amount);

        let mut unlocked = Vec::new();
        for badge in Badge::ALL {
            if self.points >= badge.threshold() && !self.badges.contains(&badge) {
                self.badges.push(badge);
                unlocked.push(badge);
            }
        }
        unlocked
    }
}
