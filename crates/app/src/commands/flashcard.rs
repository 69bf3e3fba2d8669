use clap::Subcommand;
use exam_core::model::FlashcardDraft;
use services::AppServices;

use super::CommandResult;

#[derive(Subcommand)]
pub enum FlashcardAction {
    /// Add a question/answer card to the set for a subject and topic
    Add {
        /// Subject name
        subject: String,
        /// Topic within the subject
        topic: String,
        #[arg(long, short)]
        question: String,
        #[arg(long, short)]
        answer: String,
    },
    /// List sets and their cards
    List,
    /// Count sets and cards
    Stats,
}

pub async fn run(services: &AppServices, action: FlashcardAction) -> CommandResult {
    let flashcards = services.flashcards();
    match action {
        FlashcardAction::Add {
            subject,
            topic,
            question,
            answer,
        } => {
            let added = flashcards
                .add_card(FlashcardDraft {
                    subject,
                    topic,
                    question,
                    answer,
                })
                .await?;
            if added.new_set {
                println!("Created set {}", added.set_id);
            }
            println!("Added card {} to set {}", added.card.id.value(), added.set_id);
        }
        FlashcardAction::List => {
            let sets = flashcards.list_sets().await?;
            if sets.is_empty() {
                println!("No flashcards yet.");
            }
            for set in &sets {
                println!(
                    "{}  {} / {}  ({} cards)",
                    set.id(),
                    set.subject(),
                    set.topic(),
                    set.cards().len()
                );
                for card in set.cards() {
                    println!("  Q: {}", card.question);
                    println!("  A: {}", card.answer);
                }
            }
        }
        FlashcardAction::Stats => {
            let stats = flashcards.stats().await?;
            println!("Sets: {}", stats.sets);
            println!("Cards: {}", stats.cards);
        }
    }
    Ok(())
}
