use clap::Subcommand;
use exam_core::model::ExamId;
use exam_core::postpone::DEFAULT_SNOOZE_MINUTES;
use services::{AppServices, SnoozeReport};

use super::{CommandResult, fmt_when};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Mark a session as completed
    Done {
        /// Exam ID
        exam: ExamId,
        /// Session index as shown by `exam show`
        index: usize,
    },
    /// Postpone a session
    Snooze {
        /// Exam ID
        exam: ExamId,
        /// Session index as shown by `exam show`
        index: usize,
        /// Minutes to push the session back
        #[arg(long, default_value_t = DEFAULT_SNOOZE_MINUTES)]
        minutes: u32,
    },
    /// Move a frequently postponed session to the suggested time
    Accept {
        /// Exam ID
        exam: ExamId,
        /// Session index as shown by `exam show`
        index: usize,
    },
    /// Keep the postponed time and dismiss the suggestion
    Reject {
        /// Exam ID
        exam: ExamId,
        /// Session index as shown by `exam show`
        index: usize,
    },
}

pub async fn run(services: &AppServices, action: SessionAction) -> CommandResult {
    let exams = services.exams();
    match action {
        SessionAction::Done { exam, index } => {
            if exams.mark_done(exam, index).await? {
                println!("Session #{index} done. Nice work!");
            } else {
                println!("Session #{index} was already done.");
            }
        }
        SessionAction::Snooze {
            exam,
            index,
            minutes,
        } => {
            let report = exams.snooze_session(exam, index, minutes).await?;
            print_snooze(&report);
            if report.suggestion.is_some() {
                println!("Accept with: exam-coach session accept {exam} {index}");
            }
        }
        SessionAction::Accept { exam, index } => {
            let suggestion = exams.accept_suggestion(exam, index).await?;
            println!("Session #{index} moved to {}", fmt_when(suggestion.proposed()));
        }
        SessionAction::Reject { exam, index } => {
            exams.reject_suggestion(exam, index).await?;
            println!("Keeping the current time for session #{index}.");
        }
    }
    Ok(())
}

pub(super) fn print_snooze(report: &SnoozeReport) {
    println!(
        "Moved to {} (postponed {}x)",
        fmt_when(report.outcome.rescheduled_to),
        report.outcome.postpone_count
    );
    if let Some(suggestion) = report.suggestion {
        println!(
            "This keeps slipping. How about {} instead?",
            fmt_when(suggestion.proposed())
        );
    }
}
