use clap::Subcommand;
use exam_core::error::Error as InputError;
use exam_core::model::{Mood, PointsReason, UserProfile};
use services::AppServices;

use super::CommandResult;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show points, badges and scheduling preferences
    Show,
    /// Set how you feel (fresh, neutral, tired); omit to clear
    Mood {
        mood: Option<String>,
    },
    /// Set the hour (0-23) new sessions are planned at; omit to clear
    Hour {
        hour: Option<u32>,
    },
}

pub async fn run(services: &AppServices, action: ProfileAction) -> CommandResult {
    let profile = services.profile();
    let updated = match action {
        ProfileAction::Show => profile.load().await?,
        ProfileAction::Mood { mood } => {
            let mood = mood.as_deref().map(parse_mood).transpose()?;
            profile.set_mood(mood).await?
        }
        ProfileAction::Hour { hour } => profile.set_preferred_hour(hour).await?,
    };
    print_profile(&updated);
    Ok(())
}

/// Records one finished pomodoro on the profile.
pub async fn pomodoro(services: &AppServices) -> CommandResult {
    let profile = services.profile();
    let unlocked = profile.award(PointsReason::PomodoroCompleted).await?;
    println!(
        "Pomodoro recorded (+{} points)",
        PointsReason::PomodoroCompleted.points()
    );
    for badge in &unlocked {
        println!("Badge unlocked: {}", badge.label());
    }
    print_profile(&profile.load().await?);
    Ok(())
}

fn parse_mood(raw: &str) -> Result<Mood, InputError> {
    Ok(Mood::from_label(raw)?)
}

fn print_profile(profile: &UserProfile) {
    println!("Points: {}", profile.points());
    if profile.badges().is_empty() {
        println!("Badges: none yet");
    } else {
        let labels: Vec<&str> = profile.badges().iter().map(|b| b.label()).collect();
        println!("Badges: {}", labels.join(", "));
    }
    match profile.mood() {
        Some(mood) => println!("Mood: {mood:?}"),
        None => println!("Mood: not set"),
    }
    println!(
        "Study hour: {:02}:00{}",
        profile.effective_preferred_hour(),
        if profile.preferred_hour().is_some() {
            ""
        } else {
            " (derived)"
        }
    );
}
