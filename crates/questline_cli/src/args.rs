//! Command-line arguments and environment variable handling.

use clap::{Args, Parser, Subcommand};
use questline_core::{RemoteConfig, StoreBackend, StoreConfig, TimeOfDay, DEFAULT_USER_ID};
use std::path::PathBuf;
use std::time::Duration;

/// Questline - earn points for your daily routine
#[derive(Parser, Debug)]
#[command(name = "questline", version)]
#[command(about = "Gamified daily task tracker")]
pub struct Cli {
    /// Static user identifier sent with every store request
    #[arg(long, env = "QUESTLINE_USER_ID", default_value = DEFAULT_USER_ID, global = true)]
    pub user_id: String,

    /// Local SQLite database file (ignored when remote endpoints are set)
    #[arg(long, env = "QUESTLINE_DB", default_value = "questline.db", global = true)]
    pub db: PathBuf,

    /// Keep local data in memory for this invocation only
    #[arg(long, global = true, conflicts_with = "db")]
    pub ephemeral: bool,

    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Directory for rotating log files (absolute path)
    #[arg(long, env = "QUESTLINE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "QUESTLINE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Tasks endpoint URL
    #[arg(long, env = "QUESTLINE_TASKS_URL", requires = "user_url", global = true)]
    pub tasks_url: Option<String>,

    /// User endpoint URL
    #[arg(long, env = "QUESTLINE_USER_URL", requires = "tasks_url", global = true)]
    pub user_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "QUESTLINE_HTTP_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub http_timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show today's tasks
    Tasks,
    /// Add a task
    Add(TaskFields),
    /// Replace every field of a task
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Flip a task between done and not done
    Toggle { id: i64 },
    /// Delete a task
    Delete { id: i64 },
    /// Show points, level and rank progress
    Profile,
    /// Show achievements and unlock state
    Achievements,
    /// Show the rank ladder
    Ranks,
    /// Show daily statistics
    Stats,
    /// Stay in the foreground and deliver reminders
    Remind {
        /// Seconds between checks
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,

        /// Run without delivering notifications
        #[arg(long)]
        no_notifications: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TaskFields {
    /// Task title
    #[arg(long)]
    pub title: String,

    /// Time of day, HH:MM
    #[arg(long, value_parser = parse_time)]
    pub time: TimeOfDay,

    /// Points awarded on completion
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub points: u32,

    /// Category label
    #[arg(long)]
    pub category: Option<String>,

    /// Disable the reminder for this task
    #[arg(long)]
    pub no_notify: bool,
}

impl Command {
    /// Stable subcommand name for log lines; carries no user content.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Add(_) => "add",
            Self::Edit { .. } => "edit",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::Profile => "profile",
            Self::Achievements => "achievements",
            Self::Ranks => "ranks",
            Self::Stats => "stats",
            Self::Remind { .. } => "remind",
        }
    }
}

fn parse_time(value: &str) -> Result<TimeOfDay, String> {
    TimeOfDay::parse(value).map_err(|err| err.to_string())
}

impl Cli {
    /// Resolves which store to open.
    pub fn store_config(&self) -> Result<StoreConfig, String> {
        let backend = match (&self.remote.tasks_url, &self.remote.user_url) {
            (Some(tasks_url), Some(user_url)) => StoreBackend::Remote(
                RemoteConfig::new(tasks_url.clone(), user_url.clone())
                    .with_timeout(Duration::from_secs(self.remote.http_timeout_secs)),
            ),
            _ => StoreBackend::Local {
                db_path: (!self.ephemeral).then(|| self.db.clone()),
            },
        };
        StoreConfig::new(&self.user_id, backend).map_err(|err| err.to_string())
    }
}
