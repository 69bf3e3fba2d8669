#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard_service;
pub mod error;
pub mod exam_service;
pub mod flashcard_service;
pub mod profile_service;
pub mod reminder_service;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use dashboard_service::{DashboardService, TodaySession};
pub use error::{
    AppServicesError, DashboardServiceError, ExamServiceError, FlashcardServiceError,
    ProfileServiceError, ReminderServiceError,
};
pub use exam_service::{ExamService, SnoozeReport};
pub use flashcard_service::{FlashcardAdded, FlashcardService};
pub use profile_service::ProfileService;
pub use reminder_service::ReminderService;
