//! `questline` terminal front end.
//!
//! # Responsibility
//! - Parse flags/env, initialize logging and open the configured store.
//! - Run one session action per invocation, or the foreground reminder loop.

mod args;
mod render;

use args::{Cli, Command, TaskFields};
use clap::Parser;
use log::{error, info};
use questline_core::{
    default_log_dir, default_log_level, init_logging, Clock, HttpStore, LocalClock,
    NotificationPermission, Session, SqliteStore, StoreBackend, TaskDraft, TrackerStore,
};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(&cli) {
        eprintln!("questline: {err}");
        return ExitCode::FAILURE;
    }

    let config = match cli.store_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("questline: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=cli_start module=cli status=ok backend={} command={}",
        config.backend_name(),
        cli.command.name()
    );

    let result = match &config.backend {
        StoreBackend::Local { db_path } => {
            let store = match db_path {
                Some(path) => SqliteStore::open(path, config.user_id.as_str()),
                None => SqliteStore::in_memory(config.user_id.as_str()),
            };
            store
                .map_err(|err| err.to_string())
                .and_then(|store| run(Session::new(store), &cli.command))
        }
        StoreBackend::Remote(remote) => run(
            Session::new(HttpStore::new(remote.clone(), config.user_id.as_str())),
            &cli.command,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("questline: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<(), String> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = cli.log_dir.clone().unwrap_or_else(default_log_dir);
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", log_dir.display()))?
        .to_string();
    init_logging(level, &log_dir)
}

fn run<S: TrackerStore>(mut session: Session<S>, command: &Command) -> Result<(), String> {
    if !session.load() {
        render::notices(&session.take_notices());
        return Err("could not load tasks from the store".to_string());
    }

    match command {
        Command::Tasks => render::tasks(&session),
        Command::Add(fields) => {
            if let Some(id) = session.create_task(&draft_from(fields)) {
                println!("Added task #{id}");
            }
        }
        Command::Edit { id, fields } => {
            if session.update_task(*id, &draft_from(fields)) {
                println!("Updated task #{id}");
            }
        }
        Command::Toggle { id } => {
            if let Some(outcome) = session.toggle_task(*id) {
                let verb = if outcome.completed { "Completed" } else { "Reopened" };
                println!(
                    "{verb} task #{id}: {:+} points, total {}",
                    outcome.point_delta, outcome.points_after
                );
            }
        }
        Command::Delete { id } => {
            if session.delete_task(*id) {
                println!("Deleted task #{id}");
            }
        }
        Command::Profile => render::profile(&session, LocalClock.now().date()),
        Command::Achievements => render::achievements(&session),
        Command::Ranks => render::ranks(session.level_progress().level),
        Command::Stats => render::stats(&session),
        Command::Remind {
            interval_secs,
            no_notifications,
        } => remind_loop(&mut session, *interval_secs, *no_notifications),
    }

    render::notices(&session.take_notices());
    Ok(())
}

fn remind_loop<S: TrackerStore>(session: &mut Session<S>, interval_secs: u64, muted: bool) {
    let permission = if muted {
        NotificationPermission::Denied
    } else {
        NotificationPermission::Granted
    };
    session.set_notification_permission(permission);
    println!(
        "Watching {} reminders (Ctrl-C to stop)",
        session.reminders().pending_count()
    );

    let interval = Duration::from_secs(interval_secs.max(1));
    let mut notifier = render::TerminalNotifier;
    loop {
        thread::sleep(interval);
        session.refresh();
        session.fire_due_reminders(&mut notifier);
        render::notices(&session.take_notices());
    }
}

fn draft_from(fields: &TaskFields) -> TaskDraft {
    let draft = TaskDraft::new(fields.title.clone(), fields.time, fields.points)
        .with_notifications(!fields.no_notify);
    match &fields.category {
        Some(category) => draft.with_category(category.clone()),
        None => draft,
    }
}
