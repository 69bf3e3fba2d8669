use chrono::{Days, NaiveDateTime, TimeDelta};
use exam_core::model::{ExamDraft, Intensity, ReminderDraft};
use services::AppServices;

use super::exam::print_plan;
use super::{CommandResult, fmt_when};

/// Adds a medium-intensity sample exam three days out and a reminder one
/// minute after `now`.
pub async fn run(services: &AppServices, now: NaiveDateTime) -> CommandResult {
    let (exam_draft, reminder_draft) = sample_drafts(now)?;

    let exam = services.exams().create_exam(exam_draft).await?;
    println!("Seeded exam {} on {}", exam.id(), exam.date());
    print_plan(&exam);

    let reminder = services.reminders().add_reminder(reminder_draft).await?;
    println!(
        "Seeded reminder {} at {}",
        reminder.id,
        fmt_when(reminder.at)
    );
    Ok(())
}

fn sample_drafts(now: NaiveDateTime) -> Result<(ExamDraft, ReminderDraft), &'static str> {
    let date = now
        .date()
        .checked_add_days(Days::new(3))
        .ok_or("cannot place a sample exam after the end of the calendar")?;
    let at = now
        .checked_add_signed(TimeDelta::minutes(1))
        .ok_or("cannot place a sample reminder after the end of the calendar")?;

    let exam = ExamDraft {
        subject: "Sample: Algebra".to_string(),
        date,
        content: "Linear equations, factoring, quadratic formula".to_string(),
        intensity: Intensity::Medium,
    };
    let reminder = ReminderDraft {
        title: "Evening review".to_string(),
        at,
        message: "Chapters 1-2".to_string(),
        voice: "Start reviewing now".to_string(),
    };
    Ok((exam, reminder))
}
