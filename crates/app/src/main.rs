use std::fmt;

use clap::{Parser, Subcommand};
use services::{AppServices, Clock};

mod commands;

use commands::exam::ExamAction;
use commands::flashcard::FlashcardAction;
use commands::profile::ProfileAction;
use commands::reminder::ReminderAction;
use commands::session::SessionAction;

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Parser)]
#[command(name = "exam-coach", version, about = "Plan exam revision and keep it on track")]
struct Cli {
    /// SQLite database URL or file path
    #[arg(
        long,
        global = true,
        env = "EXAM_COACH_DB_URL",
        default_value = "sqlite://examcoach.sqlite3"
    )]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exam management
    Exam {
        #[command(subcommand)]
        action: ExamAction,
    },
    /// Work through planned study sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Sessions planned for today
    Today,
    /// Agenda for the next seven days
    Week,
    /// Overall completion, upcoming exams and points
    Progress,
    /// Free-standing reminders
    Reminder {
        #[command(subcommand)]
        action: ReminderAction,
    },
    /// Mood, preferred study hour, points and badges
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Record a completed pomodoro
    Pomodoro,
    /// Question/answer cards grouped by subject and topic
    Flashcard {
        #[command(subcommand)]
        action: FlashcardAction,
    },
    /// Add a sample exam three days out and a reminder in one minute
    Seed,
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.db.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw: cli.db }.into());
    }
    let db_url = normalize_sqlite_url(cli.db);

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&db_url)?;
    let clock = Clock::default_clock();
    let services = AppServices::new_sqlite(&db_url, clock).await?;
    tracing::debug!(%db_url, "storage opened");

    match cli.command {
        Commands::Exam { action } => commands::exam::run(&services, action).await,
        Commands::Session { action } => commands::session::run(&services, action).await,
        Commands::Today => commands::dashboard::today(&services).await,
        Commands::Week => commands::dashboard::week(&services).await,
        Commands::Progress => commands::dashboard::progress(&services).await,
        Commands::Reminder { action } => commands::reminder::run(&services, action).await,
        Commands::Profile { action } => commands::profile::run(&services, action).await,
        Commands::Pomodoro => commands::profile::pomodoro(&services).await,
        Commands::Flashcard { action } => commands::flashcard::run(&services, action).await,
        Commands::Seed => commands::seed::run(&services, clock.now()).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
