//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{
    ExamError, ExamId, FlashcardError, ProfileError, ReminderError, ReminderId,
};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ExamService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamServiceError {
    #[error("exam {0} not found")]
    ExamNotFound(ExamId),
    #[error("exam {exam} has no session #{index}")]
    SessionNotFound { exam: ExamId, index: usize },
    #[error("session #{index} of exam {exam} is already completed")]
    SessionCompleted { exam: ExamId, index: usize },
    #[error("session #{index} of exam {exam} has not been postponed often enough for a suggestion")]
    NoSuggestion { exam: ExamId, index: usize },
    #[error(transparent)]
    Exam(#[from] ExamError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ReminderService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReminderServiceError {
    #[error("reminder {0} not found")]
    ReminderNotFound(ReminderId),
    #[error("reminder {0} has not been postponed often enough for a suggestion")]
    NoSuggestion(ReminderId),
    #[error(transparent)]
    Reminder(#[from] ReminderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileServiceError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `FlashcardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlashcardServiceError {
    #[error(transparent)]
    Flashcard(#[from] FlashcardError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
