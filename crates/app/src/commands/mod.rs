//! Subcommand handlers. Each prints its result to stdout.

pub mod dashboard;
pub mod exam;
pub mod flashcard;
pub mod profile;
pub mod reminder;
pub mod seed;
pub mod session;

use chrono::NaiveDateTime;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn fmt_when(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
