use std::sync::Arc;

use exam_core::model::{
    Flashcard, FlashcardDraft, FlashcardId, FlashcardSet, FlashcardSetId, FlashcardStats,
};
use storage::repository::FlashcardRepository;

use crate::Clock;
use crate::error::FlashcardServiceError;

/// Where a new card ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardAdded {
    pub set_id: FlashcardSetId,
    pub card: Flashcard,
    /// `true` when no set existed yet for the card's subject and topic.
    pub new_set: bool,
}

/// Question/answer cards grouped by subject and topic.
#[derive(Clone)]
pub struct FlashcardService {
    clock: Clock,
    flashcards: Arc<dyn FlashcardRepository>,
}

impl FlashcardService {
    #[must_use]
    pub fn new(clock: Clock, flashcards: Arc<dyn FlashcardRepository>) -> Self {
        Self { clock, flashcards }
    }

    /// Add a card to the set for its subject and topic, creating the set on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardServiceError::Flashcard` if a field is blank.
    /// Returns `FlashcardServiceError::Storage` if persistence fails.
    pub async fn add_card(
        &self,
        draft: FlashcardDraft,
    ) -> Result<FlashcardAdded, FlashcardServiceError> {
        let card = draft.validate()?;
        let now = self.clock.now();
        let mut sets = self.flashcards.load_flashcard_sets().await?;

        let (position, new_set) = match sets.iter().position(|s| s.holds(&card)) {
            Some(position) => (position, false),
            None => {
                let mut id = FlashcardSetId::from_created_at(now);
                while sets.iter().any(|s| s.id() == id) {
                    id = id.next();
                }
                sets.push(FlashcardSet::new_for(id, &card));
                (sets.len() - 1, true)
            }
        };

        let set = &mut sets[position];
        let set_id = set.id();
        let card = set.push_card(FlashcardId::from_created_at(now), card);
        self.flashcards.save_flashcard_sets(&sets).await?;

        tracing::info!(set = %set_id, new_set, "flashcard added");
        Ok(FlashcardAdded {
            set_id,
            card,
            new_set,
        })
    }

    /// # Errors
    ///
    /// Returns `FlashcardServiceError::Storage` if repository access fails.
    pub async fn list_sets(&self) -> Result<Vec<FlashcardSet>, FlashcardServiceError> {
        Ok(self.flashcards.load_flashcard_sets().await?)
    }

    /// # Errors
    ///
    /// Returns `FlashcardServiceError::Storage` if repository access fails.
    pub async fn stats(&self) -> Result<FlashcardStats, FlashcardServiceError> {
        let sets = self.flashcards.load_flashcard_sets().await?;
        Ok(FlashcardStats::compute(&sets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use exam_core::model::FlashcardError;
    use exam_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn service() -> FlashcardService {
        FlashcardService::new(fixed_clock(), Arc::new(InMemoryRepository::new()))
    }

    fn draft(subject: &str, topic: &str, q: &str) -> FlashcardDraft {
        FlashcardDraft {
            subject: subject.into(),
            topic: topic.into(),
            question: q.into(),
            answer: "answer".into(),
        }
    }

    #[tokio::test]
    async fn cards_group_by_subject_and_topic() {
        let service = service();
        let first = service.add_card(draft("Math", "Limits", "q1")).await.unwrap();
        let second = service.add_card(draft(" Math", "Limits ", "q2")).await.unwrap();
        let other = service.add_card(draft("Math", "Series", "q3")).await.unwrap();

        assert!(first.new_set);
        assert!(!second.new_set);
        assert_eq!(first.set_id, second.set_id);
        assert_eq!(first.set_id, FlashcardSetId::from_created_at(fixed_now()));
        assert_eq!(second.card.id, first.card.id.next());

        assert!(other.new_set);
        assert_eq!(other.set_id, first.set_id.next());

        let sets = service.list_sets().await.unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].cards().len(), 2);
        assert_eq!(sets[0].cards()[1].question, "q2");
    }

    #[tokio::test]
    async fn stats_count_sets_and_cards() {
        let service = service();
        assert_eq!(service.stats().await.unwrap(), FlashcardStats::default());

        service.add_card(draft("Bio", "Cells", "q1")).await.unwrap();
        service.add_card(draft("Bio", "Cells", "q2")).await.unwrap();
        service.add_card(draft("Chem", "Acids", "q3")).await.unwrap();
        assert_eq!(
            service.stats().await.unwrap(),
            FlashcardStats { sets: 2, cards: 3 }
        );
    }

    #[tokio::test]
    async fn blank_question_stores_nothing() {
        let service = service();
        let err = service.add_card(draft("Bio", "Cells", " ")).await.unwrap_err();
        assert!(matches!(
            err,
            FlashcardServiceError::Flashcard(FlashcardError::EmptyQuestion)
        ));
        assert!(service.list_sets().await.unwrap().is_empty());
    }
}
