//! Core domain logic for Questline, a gamified daily task tracker.
//! This crate is the single source of truth for points, levels and reminders.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, LocalClock};
pub use config::{ConfigError, RemoteConfig, StoreBackend, StoreConfig, DEFAULT_USER_ID};
pub use logging::{default_log_dir, default_log_level, init_logging, logging_status};
pub use model::achievement::{Achievement, AchievementKind, ACHIEVEMENT_CATALOG};
pub use model::icon::Icon;
pub use model::profile::UserProfile;
pub use model::rank::{rank_for_level, rank_name, Rank, RANKS};
pub use model::task::{Task, TaskDraft, TaskId, TaskValidationError, TimeOfDay, DEFAULT_CATEGORY};
pub use reminder::{
    CollectingNotifier, NotificationPermission, Notifier, ReconcileReport, Reminder,
    ReminderScheduler,
};
pub use service::bootstrap::{default_task_drafts, seed_if_empty, DEFAULT_TASKS};
pub use service::progression::{
    level_for_points, level_progress, LevelProgress, ProgressionEngine, ToggleOutcome,
};
pub use service::session::{Notice, NoticeLevel, Session};
pub use service::stats::{quote_for_date, DailyStats, StatTile};
pub use service::task_service::TaskService;
pub use store::{
    HttpStore, ProfileStore, SqliteStore, StoreError, StoreResult, TaskStore, TrackerStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
