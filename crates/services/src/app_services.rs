use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::exam_service::ExamService;
use crate::flashcard_service::FlashcardService;
use crate::profile_service::ProfileService;
use crate::reminder_service::ReminderService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    exams: Arc<ExamService>,
    reminders: Arc<ReminderService>,
    profile: Arc<ProfileService>,
    dashboard: Arc<DashboardService>,
    flashcards: Arc<FlashcardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let exams = Arc::new(ExamService::new(
            clock,
            Arc::clone(&storage.exams),
            Arc::clone(&storage.profile),
        ));
        let reminders = Arc::new(ReminderService::new(
            clock,
            Arc::clone(&storage.reminders),
            Arc::clone(&storage.profile),
        ));
        let profile = Arc::new(ProfileService::new(Arc::clone(&storage.profile)));
        let dashboard = Arc::new(DashboardService::new(clock, Arc::clone(&storage.exams)));
        let flashcards = Arc::new(FlashcardService::new(
            clock,
            Arc::clone(&storage.flashcards),
        ));

        Self {
            exams,
            reminders,
            profile,
            dashboard,
            flashcards,
        }
    }

    #[must_use]
    pub fn exams(&self) -> Arc<ExamService> {
        Arc::clone(&self.exams)
    }

    #[must_use]
    pub fn reminders(&self) -> Arc<ReminderService> {
        Arc::clone(&self.reminders)
    }

    #[must_use]
    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn flashcards(&self) -> Arc<FlashcardService> {
        Arc::clone(&self.flashcards)
    }
}
