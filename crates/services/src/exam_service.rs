use std::sync::Arc;

use exam_core::model::{ExamDraft, ExamId, ExamRecord, PointsReason, SessionPlan};
use exam_core::postpone::{
    self, SnoozeOutcome, TimeSuggestion, needs_suggestion, suggest_better_time,
};
use storage::repository::{ExamRepository, ProfileRepository};

use crate::Clock;
use crate::error::ExamServiceError;
use crate::profile_service::{preferred_hour, reward};

/// Result of postponing a session or reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnoozeReport {
    pub outcome: SnoozeOutcome,
    /// Present once the item has been postponed often enough to warrant a
    /// better time. Nothing changes until it is accepted.
    pub suggestion: Option<TimeSuggestion>,
}

/// Orchestrates exam creation, study plans and session postponement.
///
/// Every mutation loads the full exam collection, applies the change and
/// writes the collection back.
#[derive(Clone)]
pub struct ExamService {
    clock: Clock,
    exams: Arc<dyn ExamRepository>,
    profile: Arc<dyn ProfileRepository>,
}

impl ExamService {
    #[must_use]
    pub fn new(
        clock: Clock,
        exams: Arc<dyn ExamRepository>,
        profile: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            clock,
            exams,
            profile,
        }
    }

    /// Validate a draft, build its study plan at the user's preferred hour
    /// and persist it. Awards points for the new exam.
    ///
    /// An error means no exam was stored. Points are awarded after the exam
    /// is saved; if that profile write fails it is logged and the exam is
    /// still returned.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Exam` for validation failures.
    /// Returns `ExamServiceError::Storage` if loading the profile or the
    /// exams, or saving the exams, fails.
    pub async fn create_exam(&self, draft: ExamDraft) -> Result<ExamRecord, ExamServiceError> {
        let validated = draft.validate()?;
        let hour = preferred_hour(self.profile.as_ref()).await?;

        let mut exams = self.exams.load_exams().await?;
        let mut id = ExamId::from_created_at(self.clock.now());
        while exams.iter().any(|e| e.id() == id) {
            id = id.next();
        }

        let exam = validated.into_record(id, hour);
        exams.push(exam.clone());
        self.exams.save_exams(&exams).await?;
        tracing::info!(
            exam = %exam.id(),
            subject = exam.subject(),
            sessions = exam.plan().len(),
            "exam created"
        );

        reward(self.profile.as_ref(), PointsReason::ExamAdded).await;
        Ok(exam)
    }

    /// List exams in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn list_exams(&self) -> Result<Vec<ExamRecord>, ExamServiceError> {
        Ok(self.exams.load_exams().await?)
    }

    /// Fetch an exam by ID.
    ///
    /// Returns `Ok(None)` when the exam does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn get_exam(&self, id: ExamId) -> Result<Option<ExamRecord>, ExamServiceError> {
        let exams = self.exams.load_exams().await?;
        Ok(exams.into_iter().find(|e| e.id() == id))
    }

    /// # Errors
    ///
    /// Returns `ExamServiceError::ExamNotFound` if no exam has this ID.
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn delete_exam(&self, id: ExamId) -> Result<(), ExamServiceError> {
        let mut exams = self.exams.load_exams().await?;
        let before = exams.len();
        exams.retain(|e| e.id() != id);
        if exams.len() == before {
            return Err(ExamServiceError::ExamNotFound(id));
        }
        self.exams.save_exams(&exams).await?;
        tracing::info!(exam = %id, "exam deleted");
        Ok(())
    }

    /// Rebuild the plan from the exam's date and intensity at the current
    /// preferred hour. Completion and postponement state is discarded.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::ExamNotFound` if no exam has this ID.
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn regenerate_plan(&self, id: ExamId) -> Result<ExamRecord, ExamServiceError> {
        let hour = preferred_hour(self.profile.as_ref()).await?;
        let mut exams = self.exams.load_exams().await?;
        let exam = find_exam_mut(&mut exams, id)?;
        exam.regenerate_plan(hour);
        let updated = exam.clone();
        self.exams.save_exams(&exams).await?;
        tracing::info!(exam = %id, hour, "plan regenerated");
        Ok(updated)
    }

    /// Mark a session completed.
    ///
    /// Returns `false` without awarding points when the session was already
    /// done. As with `create_exam`, a failed points write does not undo the
    /// completion.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::ExamNotFound` or `SessionNotFound` for
    /// unknown targets.
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn mark_done(&self, id: ExamId, index: usize) -> Result<bool, ExamServiceError> {
        let mut exams = self.exams.load_exams().await?;
        let session = find_session_mut(&mut exams, id, index)?;
        if !session.mark_done() {
            return Ok(false);
        }
        self.exams.save_exams(&exams).await?;
        tracing::info!(exam = %id, index, "session completed");

        reward(self.profile.as_ref(), PointsReason::SessionCompleted).await;
        Ok(true)
    }

    /// Push a session back by `delay_minutes` and count the postponement.
    ///
    /// Once the count reaches the threshold the report carries a suggested
    /// time at the preferred hour on the session's current day. The
    /// suggestion is not applied.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::SessionCompleted` if the session is done.
    /// Returns `ExamServiceError::ExamNotFound` or `SessionNotFound` for
    /// unknown targets.
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn snooze_session(
        &self,
        id: ExamId,
        index: usize,
        delay_minutes: u32,
    ) -> Result<SnoozeReport, ExamServiceError> {
        let hour = preferred_hour(self.profile.as_ref()).await?;
        let mut exams = self.exams.load_exams().await?;
        let session = find_open_session_mut(&mut exams, id, index)?;

        let outcome = postpone::snooze(session, delay_minutes);
        let suggestion = outcome
            .suggestion_due()
            .then(|| suggest_better_time(&*session, hour));
        self.exams.save_exams(&exams).await?;

        tracing::info!(
            exam = %id,
            index,
            to = %outcome.rescheduled_to,
            count = outcome.postpone_count,
            "session postponed"
        );
        if let Some(s) = &suggestion {
            tracing::info!(exam = %id, index, proposed = %s.proposed(), "better time suggested");
        }
        Ok(SnoozeReport {
            outcome,
            suggestion,
        })
    }

    /// The suggestion currently on offer for a session, if any.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::ExamNotFound` or `SessionNotFound` for
    /// unknown targets.
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn pending_suggestion(
        &self,
        id: ExamId,
        index: usize,
    ) -> Result<Option<TimeSuggestion>, ExamServiceError> {
        let hour = preferred_hour(self.profile.as_ref()).await?;
        let mut exams = self.exams.load_exams().await?;
        let session = find_session_mut(&mut exams, id, index)?;
        if session.done || !needs_suggestion(&*session) {
            return Ok(None);
        }
        Ok(Some(suggest_better_time(&*session, hour)))
    }

    /// Move the session to the suggested time and reset its counter.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::NoSuggestion` below the threshold.
    /// Returns `ExamServiceError::SessionCompleted` if the session is done.
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn accept_suggestion(
        &self,
        id: ExamId,
        index: usize,
    ) -> Result<TimeSuggestion, ExamServiceError> {
        let hour = preferred_hour(self.profile.as_ref()).await?;
        let mut exams = self.exams.load_exams().await?;
        let session = find_open_session_mut(&mut exams, id, index)?;
        if !needs_suggestion(&*session) {
            return Err(ExamServiceError::NoSuggestion { exam: id, index });
        }

        let suggestion = suggest_better_time(&*session, hour);
        suggestion.accept(session);
        self.exams.save_exams(&exams).await?;
        tracing::info!(exam = %id, index, to = %suggestion.proposed(), "suggestion accepted");
        Ok(suggestion)
    }

    /// Decline the suggestion. The session keeps its snoozed time and its
    /// counter, so the suggestion is offered again on the next snooze.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::NoSuggestion` below the threshold.
    /// Returns `ExamServiceError::Storage` if repository access fails.
    pub async fn reject_suggestion(&self, id: ExamId, index: usize) -> Result<(), ExamServiceError> {
        let suggestion = self
            .pending_suggestion(id, index)
            .await?
            .ok_or(ExamServiceError::NoSuggestion { exam: id, index })?;
        suggestion.reject();
        tracing::debug!(exam = %id, index, "suggestion rejected");
        Ok(())
    }
}

fn find_exam_mut(exams: &mut [ExamRecord], id: ExamId) -> Result<&mut ExamRecord, ExamServiceError> {
    exams
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or(ExamServiceError::ExamNotFound(id))
}

fn find_session_mut(
    exams: &mut [ExamRecord],
    id: ExamId,
    index: usize,
) -> Result<&mut SessionPlan, ExamServiceError> {
    find_exam_mut(exams, id)?
        .session_mut(index)
        .ok_or(ExamServiceError::SessionNotFound { exam: id, index })
}

fn find_open_session_mut(
    exams: &mut [ExamRecord],
    id: ExamId,
    index: usize,
) -> Result<&mut SessionPlan, ExamServiceError> {
    let session = find_session_mut(exams, id, index)?;
    if session.done {
        return Err(ExamServiceError::SessionCompleted { exam: id, index });
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use exam_core::model::{Intensity, UserProfile};
    use exam_core::time::{fixed_clock, fixed_now};
    use storage::repository::{InMemoryRepository, StorageError};

    /// Profile that reads as default and refuses writes.
    struct ReadOnlyProfile;

    #[async_trait]
    impl ProfileRepository for ReadOnlyProfile {
        async fn load_profile(&self) -> Result<UserProfile, StorageError> {
            Ok(UserProfile::default())
        }

        async fn save_profile(&self, _profile: &UserProfile) -> Result<(), StorageError> {
            Err(StorageError::Connection("read-only".into()))
        }
    }

    fn service() -> (ExamService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        let service = ExamService::new(
            fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        );
        (service, repo)
    }

    fn draft(subject: &str, intensity: Intensity) -> ExamDraft {
        ExamDraft {
            subject: subject.into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            content: String::new(),
            intensity,
        }
    }

    #[tokio::test]
    async fn create_exam_persists_plan_and_awards_points() {
        let (service, repo) = service();
        let exam = service.create_exam(draft("Math", Intensity::Medium)).await.unwrap();

        assert_eq!(exam.id(), ExamId::from_created_at(fixed_now()));
        assert_eq!(exam.plan().len(), 4);
        assert_eq!(service.list_exams().await.unwrap(), vec![exam]);
        assert_eq!(repo.load_profile().await.unwrap().points(), 10);
    }

    #[tokio::test]
    async fn exam_is_kept_when_points_cannot_be_saved() {
        let repo = InMemoryRepository::new();
        let service = ExamService::new(
            fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(ReadOnlyProfile),
        );

        let exam = service.create_exam(draft("Math", Intensity::Low)).await.unwrap();
        assert_eq!(repo.load_exams().await.unwrap(), vec![exam.clone()]);

        assert!(service.mark_done(exam.id(), 0).await.unwrap());
        let stored = service.get_exam(exam.id()).await.unwrap().unwrap();
        assert!(stored.session(0).unwrap().done);
    }

    #[tokio::test]
    async fn same_instant_ids_do_not_collide() {
        let (service, _) = service();
        let first = service.create_exam(draft("Math", Intensity::Low)).await.unwrap();
        let second = service.create_exam(draft("Bio", Intensity::Low)).await.unwrap();
        assert_eq!(second.id(), first.id().next());
    }

    #[tokio::test]
    async fn create_exam_rejects_blank_subject() {
        let (service, repo) = service();
        let err = service.create_exam(draft("  ", Intensity::Low)).await.unwrap_err();
        assert!(matches!(err, ExamServiceError::Exam(_)));
        assert!(repo.load_exams().await.unwrap().is_empty());
        assert_eq!(repo.load_profile().await.unwrap().points(), 0);
    }

    #[tokio::test]
    async fn mark_done_awards_once() {
        let (service, repo) = service();
        let exam = service.create_exam(draft("Math", Intensity::Low)).await.unwrap();

        assert!(service.mark_done(exam.id(), 0).await.unwrap());
        assert!(!service.mark_done(exam.id(), 0).await.unwrap());
        assert_eq!(repo.load_profile().await.unwrap().points(), 15);

        let err = service.mark_done(exam.id(), 9).await.unwrap_err();
        assert!(matches!(err, ExamServiceError::SessionNotFound { index: 9, .. }));
    }

    #[tokio::test]
    async fn third_snooze_offers_suggestion_and_accept_resets() {
        let (service, _) = service();
        let exam = service.create_exam(draft("Math", Intensity::Medium)).await.unwrap();
        let id = exam.id();

        let first = service.snooze_session(id, 0, 30).await.unwrap();
        assert!(first.suggestion.is_none());
        service.snooze_session(id, 0, 30).await.unwrap();
        let third = service.snooze_session(id, 0, 30).await.unwrap();

        assert_eq!(third.outcome.postpone_count, 3);
        assert_eq!(
            third.outcome.rescheduled_to,
            NaiveDate::from_ymd_opt(2024, 6, 6)
                .unwrap()
                .and_hms_opt(20, 30, 0)
                .unwrap()
        );
        let suggestion = third.suggestion.expect("suggestion after third snooze");
        assert_eq!(suggestion.proposed().to_string(), "2024-06-06 19:00:00");

        let accepted = service.accept_suggestion(id, 0).await.unwrap();
        assert_eq!(accepted, suggestion);

        let stored = service.get_exam(id).await.unwrap().unwrap();
        let session = stored.session(0).unwrap();
        assert_eq!(session.when, suggestion.proposed());
        assert_eq!(session.postponed, 0);
        assert!(service.pending_suggestion(id, 0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reject_keeps_snoozed_state() {
        let (service, _) = service();
        let id = service
            .create_exam(draft("Math", Intensity::Low))
            .await
            .unwrap()
            .id();

        let err = service.reject_suggestion(id, 0).await.unwrap_err();
        assert!(matches!(err, ExamServiceError::NoSuggestion { .. }));

        for _ in 0..3 {
            service.snooze_session(id, 0, 30).await.unwrap();
        }
        service.reject_suggestion(id, 0).await.unwrap();

        let session = service.get_exam(id).await.unwrap().unwrap().plan()[0].clone();
        assert_eq!(session.postponed, 3);
        assert_eq!(session.when.to_string(), "2024-06-08 20:30:00");

        let fourth = service.snooze_session(id, 0, 30).await.unwrap();
        assert!(fourth.suggestion.is_some());
    }

    #[tokio::test]
    async fn completed_sessions_cannot_be_postponed() {
        let (service, _) = service();
        let id = service
            .create_exam(draft("Math", Intensity::Low))
            .await
            .unwrap()
            .id();
        service.mark_done(id, 1).await.unwrap();

        let err = service.snooze_session(id, 1, 30).await.unwrap_err();
        assert!(matches!(err, ExamServiceError::SessionCompleted { index: 1, .. }));
    }

    #[tokio::test]
    async fn regenerate_uses_current_preferred_hour() {
        let (service, repo) = service();
        let id = service
            .create_exam(draft("Math", Intensity::Low))
            .await
            .unwrap()
            .id();
        service.mark_done(id, 0).await.unwrap();

        let mut profile = repo.load_profile().await.unwrap();
        profile.set_preferred_hour(Some(8)).unwrap();
        repo.save_profile(&profile).await.unwrap();

        let exam = service.regenerate_plan(id).await.unwrap();
        assert!(exam.plan().iter().all(|s| s.when.to_string().ends_with("08:00:00")));
        assert_eq!(exam.completed_sessions(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_exam_is_an_error() {
        let (service, _) = service();
        let err = service.delete_exam(ExamId::new(42)).await.unwrap_err();
        assert!(matches!(err, ExamServiceError::ExamNotFound(_)));
    }
}
