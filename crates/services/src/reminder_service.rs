use std::sync::Arc;

use exam_core::model::{PointsReason, Reminder, ReminderDraft, ReminderId};
use exam_core::postpone::{self, TimeSuggestion, needs_suggestion, suggest_better_time};
use storage::repository::{ProfileRepository, ReminderRepository};

use crate::Clock;
use crate::error::ReminderServiceError;
use crate::exam_service::SnoozeReport;
use crate::profile_service::{preferred_hour, reward};

/// Manages free-standing reminders and their postponement.
#[derive(Clone)]
pub struct ReminderService {
    clock: Clock,
    reminders: Arc<dyn ReminderRepository>,
    profile: Arc<dyn ProfileRepository>,
}

impl ReminderService {
    #[must_use]
    pub fn new(
        clock: Clock,
        reminders: Arc<dyn ReminderRepository>,
        profile: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            clock,
            reminders,
            profile,
        }
    }

    /// # Errors
    ///
    /// Returns `ReminderServiceError::Reminder` for validation failures.
    /// Returns `ReminderServiceError::Storage` if persistence fails.
    pub async fn add_reminder(&self, draft: ReminderDraft) -> Result<Reminder, ReminderServiceError> {
        let mut reminders = self.reminders.load_reminders().await?;
        let mut id = ReminderId::from_created_at(self.clock.now());
        while reminders.iter().any(|r| r.id == id) {
            id = id.next();
        }

        let reminder = draft.validate(id)?;
        reminders.push(reminder.clone());
        self.reminders.save_reminders(&reminders).await?;
        tracing::info!(reminder = %id, at = %reminder.at, "reminder added");
        Ok(reminder)
    }

    /// Reminders ordered by time, earliest first.
    ///
    /// # Errors
    ///
    /// Returns `ReminderServiceError::Storage` if repository access fails.
    pub async fn list_reminders(&self) -> Result<Vec<Reminder>, ReminderServiceError> {
        let mut reminders = self.reminders.load_reminders().await?;
        reminders.sort_by_key(|r| (r.at, r.id.value()));
        Ok(reminders)
    }

    /// # Errors
    ///
    /// Returns `ReminderServiceError::ReminderNotFound` if no reminder has this ID.
    /// Returns `ReminderServiceError::Storage` if repository access fails.
    pub async fn delete_reminder(&self, id: ReminderId) -> Result<(), ReminderServiceError> {
        let mut reminders = self.reminders.load_reminders().await?;
        let before = reminders.len();
        reminders.retain(|r| r.id != id);
        if reminders.len() == before {
            return Err(ReminderServiceError::ReminderNotFound(id));
        }
        self.reminders.save_reminders(&reminders).await?;
        tracing::info!(reminder = %id, "reminder deleted");
        Ok(())
    }

    /// Mark a reminder as having fired and award a point for it.
    ///
    /// Returns `false` without awarding anything if it was already marked.
    ///
    /// # Errors
    ///
    /// Returns `ReminderServiceError::ReminderNotFound` if no reminder has this ID.
    /// Returns `ReminderServiceError::Storage` if repository access fails.
    pub async fn acknowledge(&self, id: ReminderId) -> Result<bool, ReminderServiceError> {
        let mut reminders = self.reminders.load_reminders().await?;
        let reminder = find_reminder_mut(&mut reminders, id)?;
        if reminder.notified {
            return Ok(false);
        }
        reminder.notified = true;
        self.reminders.save_reminders(&reminders).await?;
        tracing::info!(reminder = %id, "reminder acknowledged");

        reward(self.profile.as_ref(), PointsReason::ReminderTriggered).await;
        Ok(true)
    }

    /// Push a reminder back and count the postponement. Callers pass
    /// `REMINDER_SNOOZE_MINUTES` for the usual ten minute snooze.
    ///
    /// # Errors
    ///
    /// Returns `ReminderServiceError::ReminderNotFound` if no reminder has this ID.
    /// Returns `ReminderServiceError::Storage` if repository access fails.
    pub async fn snooze_reminder(
        &self,
        id: ReminderId,
        delay_minutes: u32,
    ) -> Result<SnoozeReport, ReminderServiceError> {
        let hour = preferred_hour(self.profile.as_ref()).await?;
        let mut reminders = self.reminders.load_reminders().await?;
        let reminder = find_reminder_mut(&mut reminders, id)?;

        let outcome = postpone::snooze(reminder, delay_minutes);
        let suggestion = outcome
            .suggestion_due()
            .then(|| suggest_better_time(&*reminder, hour));
        self.reminders.save_reminders(&reminders).await?;

        tracing::info!(
            reminder = %id,
            to = %outcome.rescheduled_to,
            count = outcome.postpone_count,
            "reminder postponed"
        );
        Ok(SnoozeReport {
            outcome,
            suggestion,
        })
    }

    /// Move the reminder to the suggested time and reset its counter.
    ///
    /// # Errors
    ///
    /// Returns `ReminderServiceError::NoSuggestion` below the threshold.
    /// Returns `ReminderServiceError::Storage` if repository access fails.
    pub async fn accept_suggestion(
        &self,
        id: ReminderId,
    ) -> Result<TimeSuggestion, ReminderServiceError> {
        let hour = preferred_hour(self.profile.as_ref()).await?;
        let mut reminders = self.reminders.load_reminders().await?;
        let reminder = find_reminder_mut(&mut reminders, id)?;
        if !needs_suggestion(&*reminder) {
            return Err(ReminderServiceError::NoSuggestion(id));
        }

        let suggestion = suggest_better_time(&*reminder, hour);
        suggestion.accept(reminder);
        self.reminders.save_reminders(&reminders).await?;
        tracing::info!(reminder = %id, to = %suggestion.proposed(), "suggestion accepted");
        Ok(suggestion)
    }
}

fn find_reminder_mut(
    reminders: &mut [Reminder],
    id: ReminderId,
) -> Result<&mut Reminder, ReminderServiceError> {
    reminders
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(ReminderServiceError::ReminderNotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use exam_core::postpone::REMINDER_SNOOZE_MINUTES;
    use exam_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn service() -> ReminderService {
        service_with_repo().0
    }

    fn service_with_repo() -> (ReminderService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let service =
            ReminderService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo.clone()));
        (service, repo)
    }

    fn draft(title: &str, at: &str) -> ReminderDraft {
        ReminderDraft {
            title: title.into(),
            at: chrono::NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M").unwrap(),
            message: String::new(),
            voice: String::new(),
        }
    }

    #[tokio::test]
    async fn lists_reminders_by_time() {
        let service = service();
        service.add_reminder(draft("Late", "2024-06-06T21:00")).await.unwrap();
        service.add_reminder(draft("Early", "2024-06-06T08:00")).await.unwrap();

        let titles: Vec<_> = service
            .list_reminders()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[tokio::test]
    async fn ids_derive_from_clock_and_bump_on_collision() {
        let service = service();
        let a = service.add_reminder(draft("A", "2024-06-06T08:00")).await.unwrap();
        let b = service.add_reminder(draft("B", "2024-06-06T09:00")).await.unwrap();
        assert_eq!(a.id, ReminderId::from_created_at(fixed_now()));
        assert_eq!(b.id, a.id.next());
    }

    #[tokio::test]
    async fn snooze_three_times_then_accept() {
        let service = service();
        let id = service
            .add_reminder(draft("Flashcards", "2024-06-06T17:00"))
            .await
            .unwrap()
            .id;

        let mut last = None;
        for _ in 0..3 {
            last = Some(
                service
                    .snooze_reminder(id, REMINDER_SNOOZE_MINUTES)
                    .await
                    .unwrap(),
            );
        }
        let report = last.unwrap();
        assert_eq!(report.outcome.rescheduled_to.to_string(), "2024-06-06 17:30:00");

        let expected = NaiveDate::from_ymd_opt(2024, 6, 6)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        assert_eq!(report.suggestion.unwrap().proposed(), expected);

        service.accept_suggestion(id).await.unwrap();
        let stored = &service.list_reminders().await.unwrap()[0];
        assert_eq!(stored.at, expected);
        assert_eq!(stored.postponed, 0);
    }

    #[tokio::test]
    async fn acknowledge_awards_one_point_once() {
        let (service, repo) = service_with_repo();
        let id = service
            .add_reminder(draft("Revise", "2024-06-06T17:00"))
            .await
            .unwrap()
            .id;

        assert!(service.acknowledge(id).await.unwrap());
        assert!(!service.acknowledge(id).await.unwrap());
        assert!(service.list_reminders().await.unwrap()[0].notified);
        assert_eq!(repo.load_profile().await.unwrap().points(), 1);

        let err = service.acknowledge(ReminderId::new(1)).await.unwrap_err();
        assert!(matches!(err, ReminderServiceError::ReminderNotFound(_)));
    }

    #[tokio::test]
    async fn accept_without_threshold_fails() {
        let service = service();
        let id = service
            .add_reminder(draft("Read", "2024-06-06T17:00"))
            .await
            .unwrap()
            .id;
        let err = service.accept_suggestion(id).await.unwrap_err();
        assert!(matches!(err, ReminderServiceError::NoSuggestion(_)));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let service = service();
        let err = service
            .add_reminder(draft(" ", "2024-06-06T17:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReminderServiceError::Reminder(_)));
    }
}
