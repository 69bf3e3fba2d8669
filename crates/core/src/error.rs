use thiserror::Error;

use crate::model::{ExamError, FlashcardError, ProfileError, ReminderError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Exam(#[from] ExamError),
    #[error(transparent)]
    Reminder(#[from] ReminderError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Flashcard(#[from] FlashcardError),
}
