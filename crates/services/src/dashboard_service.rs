use std::sync::Arc;

use exam_core::model::{ExamId, SessionPlan};
use exam_core::progress::{self, AGENDA_DAYS, DayAgenda, PlanProgress};
use storage::repository::ExamRepository;

use crate::Clock;
use crate::error::DashboardServiceError;

/// A session scheduled for today, with enough context to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodaySession {
    pub exam_id: ExamId,
    pub subject: String,
    pub index: usize,
    pub session: SessionPlan,
}

/// Read-only views over the exam collection.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    exams: Arc<dyn ExamRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(clock: Clock, exams: Arc<dyn ExamRepository>) -> Self {
        Self { clock, exams }
    }

    /// # Errors
    ///
    /// Returns `DashboardServiceError::Storage` if repository access fails.
    pub async fn progress(&self) -> Result<PlanProgress, DashboardServiceError> {
        let exams = self.exams.load_exams().await?;
        Ok(PlanProgress::compute(&exams))
    }

    /// Exams falling within the next week, today included.
    ///
    /// # Errors
    ///
    /// Returns `DashboardServiceError::Storage` if repository access fails.
    pub async fn upcoming_count(&self) -> Result<usize, DashboardServiceError> {
        let exams = self.exams.load_exams().await?;
        Ok(progress::upcoming_exam_count(
            &exams,
            self.clock.today(),
            AGENDA_DAYS,
        ))
    }

    /// # Errors
    ///
    /// Returns `DashboardServiceError::Storage` if repository access fails.
    pub async fn today(&self) -> Result<Vec<TodaySession>, DashboardServiceError> {
        let exams = self.exams.load_exams().await?;
        let refs = progress::sessions_on(&exams, self.clock.today());

        let sessions = refs
            .into_iter()
            .filter_map(|r| {
                let exam = exams.iter().find(|e| e.id() == r.exam_id)?;
                Some(TodaySession {
                    exam_id: r.exam_id,
                    subject: exam.subject().to_owned(),
                    index: r.index,
                    session: exam.session(r.index)?.clone(),
                })
            })
            .collect();
        Ok(sessions)
    }

    /// # Errors
    ///
    /// Returns `DashboardServiceError::Storage` if repository access fails.
    pub async fn week(&self) -> Result<Vec<DayAgenda>, DashboardServiceError> {
        let exams = self.exams.load_exams().await?;
        Ok(progress::weekly_agenda(&exams, self.clock.today()))
    }
}
