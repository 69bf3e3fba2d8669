use async_trait::async_trait;
use exam_core::model::{ExamRecord, FlashcardSet, Reminder, UserProfile};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Blob key holding every exam record.
pub const EXAMS_KEY: &str = "ec_exams_v1";
/// Blob key holding every reminder.
pub const REMINDERS_KEY: &str = "ec_reminders_v1";
/// Blob key holding the user profile.
pub const PROFILE_KEY: &str = "ec_user_v1";
/// Blob key holding every flashcard set.
pub const FLASHCARDS_KEY: &str = "ec_flashcards_v1";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Raw key-value storage of JSON blobs.
///
/// Collections are written back wholesale on every save; there is no partial
/// update and no transaction spanning several keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn read_blob(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    async fn write_blob(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the blob stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn delete_blob(&self, key: &str) -> Result<(), StorageError>;
}

/// Repository contract for the exam collection.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Load every exam. A missing or unreadable blob yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn load_exams(&self) -> Result<Vec<ExamRecord>, StorageError>;

    /// Overwrite the stored exam collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    async fn save_exams(&self, exams: &[ExamRecord]) -> Result<(), StorageError>;
}

/// Repository contract for reminders.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Load every reminder. A missing or unreadable blob yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn load_reminders(&self) -> Result<Vec<Reminder>, StorageError>;

    /// Overwrite the stored reminders.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    async fn save_reminders(&self, reminders: &[Reminder]) -> Result<(), StorageError>;
}

/// Repository contract for the single user profile.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Load the profile, or the default profile when none was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn load_profile(&self) -> Result<UserProfile, StorageError>;

    /// Overwrite the stored profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;
}

/// Repository contract for user-authored flashcard sets.
#[async_trait]
pub trait FlashcardRepository: Send + Sync {
    /// Load every set. A missing or unreadable blob yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn load_flashcard_sets(&self) -> Result<Vec<FlashcardSet>, StorageError>;

    /// Overwrite the stored sets.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    async fn save_flashcard_sets(&self, sets: &[FlashcardSet]) -> Result<(), StorageError>;
}

async fn load_json<S, T>(store: &S, key: &str) -> Result<T, StorageError>
where
    S: BlobStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.read_blob(key).await? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding unreadable blob");
            Ok(T::default())
        }
    }
}

async fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: BlobStore + ?Sized,
    T: Serialize + ?Sized + Sync,
{
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.write_blob(key, &raw).await
}

#[async_trait]
impl<S: BlobStore> ExamRepository for S {
    async fn load_exams(&self) -> Result<Vec<ExamRecord>, StorageError> {
        load_json(self, EXAMS_KEY).await
    }

    async fn save_exams(&self, exams: &[ExamRecord]) -> Result<(), StorageError> {
        save_json(self, EXAMS_KEY, exams).await
    }
}

#[async_trait]
impl<S: BlobStore> ReminderRepository for S {
    async fn load_reminders(&self) -> Result<Vec<Reminder>, StorageError> {
        load_json(self, REMINDERS_KEY).await
    }

    async fn save_reminders(&self, reminders: &[Reminder]) -> Result<(), StorageError> {
        save_json(self, REMINDERS_KEY, reminders).await
    }
}

#[async_trait]
impl<S: BlobStore> ProfileRepository for S {
    async fn load_profile(&self) -> Result<UserProfile, StorageError> {
        load_json(self, PROFILE_KEY).await
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        save_json(self, PROFILE_KEY, profile).await
    }
}

#[async_trait]
impl<S: BlobStore> FlashcardRepository for S {
    async fn load_flashcard_sets(&self) -> Result<Vec<FlashcardSet>, StorageError> {
        load_json(self, FLASHCARDS_KEY).await
    }

    async fn save_flashcard_sets(&self, sets: &[FlashcardSet]) -> Result<(), StorageError> {
        save_json(self, FLASHCARDS_KEY, sets).await
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl BlobStore for InMemoryRepository {
    async fn read_blob(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn write_blob(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete_blob(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub exams: Arc<dyn ExamRepository>,
    pub reminders: Arc<dyn ReminderRepository>,
    pub profile: Arc<dyn ProfileRepository>,
    pub flashcards: Arc<dyn FlashcardRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_blob_store(InMemoryRepository::new())
    }

    /// Wire every repository to the same blob store.
    #[must_use]
    pub fn from_blob_store<S: BlobStore + Clone + 'static>(store: S) -> Self {
        let exams: Arc<dyn ExamRepository> = Arc::new(store.clone());
        let reminders: Arc<dyn ReminderRepository> = Arc::new(store.clone());
        let profile: Arc<dyn ProfileRepository> = Arc::new(store.clone());
        let flashcards: Arc<dyn FlashcardRepository> = Arc::new(store);
        Self {
            exams,
            reminders,
            profile,
            flashcards,
        }
    }
}
