use services::AppServices;

use super::{CommandResult, fmt_when};

pub async fn today(services: &AppServices) -> CommandResult {
    let sessions = services.dashboard().today().await?;
    if sessions.is_empty() {
        println!("Nothing planned for today.");
    }
    for entry in &sessions {
        let status = if entry.session.done { "done" } else { "todo" };
        println!(
            "{}  {}  #{}  {}  {}  [{status}]",
            fmt_when(entry.session.when),
            entry.subject,
            entry.index,
            entry.exam_id,
            entry.session.focus
        );
    }
    Ok(())
}

pub async fn week(services: &AppServices) -> CommandResult {
    for day in services.dashboard().week().await? {
        println!("{}", day.day.format("%a %Y-%m-%d"));
        if day.is_free() {
            println!("  free day");
        }
        for item in &day.items {
            let mut line = format!("  {}  {}", item.subject, item.focus);
            if item.done {
                line.push_str("  [done]");
            }
            if item.urgent {
                line.push_str("  URGENT");
            }
            println!("{line}");
        }
    }
    Ok(())
}

pub async fn progress(services: &AppServices) -> CommandResult {
    let dashboard = services.dashboard();
    let progress = dashboard.progress().await?;
    let upcoming = dashboard.upcoming_count().await?;
    let profile = services.profile().load().await?;

    println!(
        "Sessions: {}/{} done ({}%)",
        progress.done, progress.total, progress.percent
    );
    println!("Exams in the next 7 days: {upcoming}");
    println!("Points: {}", profile.points());
    let badges: Vec<String> = profile.badges().iter().map(ToString::to_string).collect();
    if !badges.is_empty() {
        println!("Badges: {}", badges.join(", "));
    }
    Ok(())
}
