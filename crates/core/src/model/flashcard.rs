use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{FlashcardId, FlashcardSetId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("flashcard subject cannot be empty")]
    EmptySubject,

    #[error("flashcard topic cannot be empty")]
    EmptyTopic,

    #[error("flashcard question cannot be empty")]
    EmptyQuestion,

    #[error("flashcard answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// A user-authored question/answer pair, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardDraft {
    pub subject: String,
    pub topic: String,
    pub question: String,
    pub answer: String,
}

impl FlashcardDraft {
    /// Trims every field and requires all four to be present.
    ///
    /// # Errors
    ///
    /// Returns the `FlashcardError` naming the first blank field.
    pub fn validate(self) -> Result<ValidatedFlashcard, FlashcardError> {
        let subject = non_blank(&self.subject, FlashcardError::EmptySubject)?;
        let topic = non_blank(&self.topic, FlashcardError::EmptyTopic)?;
        let question = non_blank(&self.question, FlashcardError::EmptyQuestion)?;
        let answer = non_blank(&self.answer, FlashcardError::EmptyAnswer)?;
        Ok(ValidatedFlashcard {
            subject,
            topic,
            question,
            answer,
        })
    }
}

fn non_blank(raw: &str, err: FlashcardError) -> Result<String, FlashcardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFlashcard {
    subject: String,
    topic: String,
    question: String,
    answer: String,
}

impl ValidatedFlashcard {
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

//
// ─── CARDS & SETS ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: FlashcardId,
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "a")]
    pub answer: String,
}

/// All cards sharing a subject and topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    id: FlashcardSetId,
    subject: String,
    topic: String,
    #[serde(default)]
    cards: Vec<Flashcard>,
}

impl FlashcardSet {
    /// An empty set for the subject and topic of `card`.
    #[must_use]
    pub fn new_for(id: FlashcardSetId, card: &ValidatedFlashcard) -> Self {
        Self {
            id,
            subject: card.subject.clone(),
            topic: card.topic.clone(),
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> FlashcardSetId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    /// Exact, case-sensitive match on subject and topic.
    #[must_use]
    pub fn holds(&self, card: &ValidatedFlashcard) -> bool {
        self.subject == card.subject && self.topic == card.topic
    }

    /// Appends `card`, stepping `id` past any card id already in the set.
    pub fn push_card(&mut self, mut id: FlashcardId, card: ValidatedFlashcard) -> Flashcard {
        while self.cards.iter().any(|c| c.id == id) {
            id = id.next();
        }
        let card = Flashcard {
            id,
            question: card.question,
            answer: card.answer,
        };
        self.cards.push(card.clone());
        card
    }
}

/// Totals shown on the microlearning page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlashcardStats {
    pub sets: usize,
    pub cards: usize,
}

impl FlashcardStats {
    #[must_use]
    pub fn compute(sets: &[FlashcardSet]) -> Self {
        Self {
            sets: sets.len(),
            cards: sets.iter().map(|s| s.cards.len()).sum(),
        }
    }
}
