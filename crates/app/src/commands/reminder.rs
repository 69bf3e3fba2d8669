use clap::Subcommand;
use exam_core::error::Error as InputError;
use exam_core::model::{ReminderDraft, ReminderId};
use exam_core::postpone::REMINDER_SNOOZE_MINUTES;
use services::AppServices;

use super::session::print_snooze;
use super::{CommandResult, fmt_when};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Add a reminder
    Add {
        /// Reminder title
        title: String,
        /// Local time (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: String,
        /// Optional message
        #[arg(long, default_value = "")]
        message: String,
        /// Text to read aloud when the reminder fires
        #[arg(long, default_value = "")]
        voice: String,
    },
    /// List reminders by time
    List,
    /// Delete a reminder
    Delete {
        /// Reminder ID
        id: ReminderId,
    },
    /// Postpone a reminder
    Snooze {
        /// Reminder ID
        id: ReminderId,
        /// Minutes to push the reminder back
        #[arg(long, default_value_t = REMINDER_SNOOZE_MINUTES)]
        minutes: u32,
    },
    /// Move a frequently postponed reminder to the suggested time
    Accept {
        /// Reminder ID
        id: ReminderId,
    },
    /// Mark a reminder as fired (+1 point the first time)
    Ack {
        /// Reminder ID
        id: ReminderId,
    },
}

pub async fn run(services: &AppServices, action: ReminderAction) -> CommandResult {
    let reminders = services.reminders();
    match action {
        ReminderAction::Add {
            title,
            at,
            message,
            voice,
        } => {
            let draft = parse_draft(title, &at, message, voice)?;
            let reminder = reminders.add_reminder(draft).await?;
            println!(
                "Added reminder {} at {}",
                reminder.id,
                fmt_when(reminder.at)
            );
        }
        ReminderAction::List => {
            let all = reminders.list_reminders().await?;
            if all.is_empty() {
                println!("No reminders.");
            }
            for reminder in &all {
                let mut line = format!("{}  {}  {}", reminder.id, fmt_when(reminder.at), reminder.title);
                if !reminder.message.is_empty() {
                    line.push_str(&format!(" - {}", reminder.message));
                }
                if reminder.postponed > 0 {
                    line.push_str(&format!("  (postponed {}x)", reminder.postponed));
                }
                if reminder.notified {
                    line.push_str("  [fired]");
                }
                println!("{line}");
            }
        }
        ReminderAction::Delete { id } => {
            reminders.delete_reminder(id).await?;
            println!("Deleted reminder {id}");
        }
        ReminderAction::Snooze { id, minutes } => {
            let report = reminders.snooze_reminder(id, minutes).await?;
            print_snooze(&report);
            if report.suggestion.is_some() {
                println!("Accept with: exam-coach reminder accept {id}");
            }
        }
        ReminderAction::Accept { id } => {
            let suggestion = reminders.accept_suggestion(id).await?;
            println!("Reminder moved to {}", fmt_when(suggestion.proposed()));
        }
        ReminderAction::Ack { id } => {
            if reminders.acknowledge(id).await? {
                println!("Reminder {id} acknowledged");
            } else {
                println!("Reminder {id} was already acknowledged");
            }
        }
    }
    Ok(())
}

fn parse_draft(
    title: String,
    at: &str,
    message: String,
    voice: String,
) -> Result<ReminderDraft, InputError> {
    Ok(ReminderDraft {
        title,
        at: ReminderDraft::parse_at(at)?,
        message,
        voice,
    })
}
