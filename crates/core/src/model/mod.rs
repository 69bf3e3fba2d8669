mod exam;
mod flashcard;
mod ids;
mod profile;
mod reminder;
mod session;

pub use ids::{ExamId, FlashcardId, FlashcardSetId, ParseIdError, ReminderId};

pub use exam::{ExamDraft, ExamError, ExamRecord, Intensity, ValidatedExam};
pub use flashcard::{
    Flashcard, FlashcardDraft, FlashcardError, FlashcardSet, FlashcardStats, ValidatedFlashcard,
};
pub use profile::{Badge, Mood, PointsReason, ProfileError, UserProfile};
pub use reminder::{Reminder, ReminderDraft, ReminderError};
pub use session::SessionPlan;
