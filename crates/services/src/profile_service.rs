use std::sync::Arc;

use exam_core::model::{Badge, Mood, PointsReason, UserProfile};
use storage::repository::{ProfileRepository, StorageError};

use crate::error::ProfileServiceError;

/// Reads and updates the single user profile.
#[derive(Clone)]
pub struct ProfileService {
    profile: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    #[must_use]
    pub fn new(profile: Arc<dyn ProfileRepository>) -> Self {
        Self { profile }
    }

    /// Load the stored profile, or the default one.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if repository access fails.
    pub async fn load(&self) -> Result<UserProfile, ProfileServiceError> {
        Ok(self.profile.load_profile().await?)
    }

    /// Award points and persist the profile. Returns newly unlocked badges.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if repository access fails.
    pub async fn award(&self, reason: PointsReason) -> Result<Vec<Badge>, ProfileServiceError> {
        Ok(award_points(self.profile.as_ref(), reason).await?)
    }

    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if repository access fails.
    pub async fn set_mood(&self, mood: Option<Mood>) -> Result<UserProfile, ProfileServiceError> {
        let mut profile = self.profile.load_profile().await?;
        profile.set_mood(mood);
        self.profile.save_profile(&profile).await?;
        tracing::debug!(?mood, "mood updated");
        Ok(profile)
    }

    /// Set or clear the explicit study hour.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Profile` if the hour is outside `0..=23`.
    /// Returns `ProfileServiceError::Storage` if repository access fails.
    pub async fn set_preferred_hour(
        &self,
        hour: Option<u32>,
    ) -> Result<UserProfile, ProfileServiceError> {
        let mut profile = self.profile.load_profile().await?;
        profile.set_preferred_hour(hour)?;
        self.profile.save_profile(&profile).await?;
        tracing::debug!(?hour, "preferred hour updated");
        Ok(profile)
    }

    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if repository access fails.
    pub async fn effective_preferred_hour(&self) -> Result<u32, ProfileServiceError> {
        Ok(preferred_hour(self.profile.as_ref()).await?)
    }
}

pub(crate) async fn preferred_hour(profile: &dyn ProfileRepository) -> Result<u32, StorageError> {
    Ok(profile.load_profile().await?.effective_preferred_hour())
}

async fn award_points(
    profile: &dyn ProfileRepository,
    reason: PointsReason,
) -> Result<Vec<Badge>, StorageError> {
    let mut current = profile.load_profile().await?;
    let unlocked = current.award(reason);
    profile.save_profile(&current).await?;

    tracing::debug!(?reason, points = current.points(), "points awarded");
    for badge in &unlocked {
        tracing::info!(%badge, "badge unlocked");
    }
    Ok(unlocked)
}

/// Award points for an action whose own write already succeeded.
///
/// A profile write failure is logged and yields no badges; the action stays
/// recorded and the caller still reports success.
pub(crate) async fn reward(profile: &dyn ProfileRepository, reason: PointsReason) -> Vec<Badge> {
    match award_points(profile, reason).await {
        Ok(unlocked) => unlocked,
        Err(err) => {
            tracing::warn!(?reason, error = %err, "points not recorded");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use exam_core::model::ProfileError;
    use storage::repository::InMemoryRepository;

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn award_persists_points_and_badges() {
        let service = service();
        for _ in 0..4 {
            assert!(service.award(PointsReason::ExamAdded).await.unwrap().is_empty());
        }
        assert!(service.award(PointsReason::SessionCompleted).await.unwrap().is_empty());

        let unlocked = service.award(PointsReason::ExamAdded).await.unwrap();
        assert_eq!(unlocked, vec![Badge::Starter]);

        let profile = service.load().await.unwrap();
        assert_eq!(profile.points(), 55);
        assert_eq!(profile.badges(), &[Badge::Starter]);
    }

    #[tokio::test]
    async fn pomodoro_points_accumulate() {
        let service = service();
        service.award(PointsReason::PomodoroCompleted).await.unwrap();
        service.award(PointsReason::PomodoroCompleted).await.unwrap();
        assert_eq!(service.load().await.unwrap().points(), 4);
    }

    #[tokio::test]
    async fn preferred_hour_falls_back_through_mood() {
        let service = service();
        assert_eq!(service.effective_preferred_hour().await.unwrap(), 19);

        service.set_mood(Some(Mood::Fresh)).await.unwrap();
        assert_eq!(service.effective_preferred_hour().await.unwrap(), 9);

        service.set_preferred_hour(Some(7)).await.unwrap();
        assert_eq!(service.effective_preferred_hour().await.unwrap(), 7);

        service.set_preferred_hour(None).await.unwrap();
        assert_eq!(service.effective_preferred_hour().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn rejects_out_of_range_hour() {
        let service = service();
        let err = service.set_preferred_hour(Some(24)).await.unwrap_err();
        assert!(matches!(
            err,
            ProfileServiceError::Profile(ProfileError::InvalidPreferredHour(24))
        ));
        assert_eq!(service.load().await.unwrap().preferred_hour(), None);
    }
}
