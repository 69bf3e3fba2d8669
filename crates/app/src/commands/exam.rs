use clap::Subcommand;
use exam_core::error::Error as InputError;
use exam_core::model::{ExamDraft, ExamId, ExamRecord, Intensity};
use services::AppServices;

use super::{CommandResult, fmt_when};

#[derive(Subcommand)]
pub enum ExamAction {
    /// Add an exam and generate its study plan
    Add {
        /// Subject name
        subject: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Study intensity: low, medium or high
        #[arg(long, default_value = "medium")]
        intensity: String,
        /// What the exam covers
        #[arg(long, default_value = "")]
        content: String,
    },
    /// List exams
    List,
    /// Show an exam and its sessions
    Show {
        /// Exam ID
        id: ExamId,
        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an exam and its plan
    Delete {
        /// Exam ID
        id: ExamId,
    },
    /// Rebuild the plan at the current preferred hour, discarding progress
    Regen {
        /// Exam ID
        id: ExamId,
    },
}

pub async fn run(services: &AppServices, action: ExamAction) -> CommandResult {
    let exams = services.exams();
    match action {
        ExamAction::Add {
            subject,
            date,
            intensity,
            content,
        } => {
            let draft = parse_draft(subject, &date, &intensity, content)?;
            let exam = exams.create_exam(draft).await?;
            println!("Added exam {} ({})", exam.id(), exam.subject());
            print_plan(&exam);
        }
        ExamAction::List => {
            let all = exams.list_exams().await?;
            if all.is_empty() {
                println!("No exams yet.");
            }
            for exam in &all {
                print_summary(exam);
            }
        }
        ExamAction::Show { id, json } => {
            let exam = exams
                .get_exam(id)
                .await?
                .ok_or(services::ExamServiceError::ExamNotFound(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&exam)?);
            } else {
                print_summary(&exam);
                if !exam.content().is_empty() {
                    println!("  {}", exam.content());
                }
                print_plan(&exam);
            }
        }
        ExamAction::Delete { id } => {
            exams.delete_exam(id).await?;
            println!("Deleted exam {id}");
        }
        ExamAction::Regen { id } => {
            let exam = exams.regenerate_plan(id).await?;
            println!("Regenerated plan for {}", exam.subject());
            print_plan(&exam);
        }
    }
    Ok(())
}

fn parse_draft(
    subject: String,
    date: &str,
    intensity: &str,
    content: String,
) -> Result<ExamDraft, InputError> {
    let intensity = Intensity::from_label(intensity);
    if intensity == Intensity::Unrecognized {
        tracing::warn!(
            sessions = intensity.session_count(),
            "unrecognized intensity, using the fallback plan"
        );
    }
    Ok(ExamDraft {
        subject,
        date: ExamDraft::parse_date(date)?,
        content,
        intensity,
    })
}

fn print_summary(exam: &ExamRecord) {
    println!(
        "{}  {}  {}  {}  {}/{} done",
        exam.id(),
        exam.subject(),
        exam.date(),
        exam.intensity(),
        exam.completed_sessions(),
        exam.plan().len()
    );
}

pub(super) fn print_plan(exam: &ExamRecord) {
    for (index, session) in exam.plan().iter().enumerate() {
        let mut line = format!("  #{index}  {}  {}", fmt_when(session.when), session.focus);
        if session.done {
            line.push_str("  [done]");
        }
        if session.postponed > 0 {
            line.push_str(&format!("  (postponed {}x)", session.postponed));
        }
        println!("{line}");
    }
}
