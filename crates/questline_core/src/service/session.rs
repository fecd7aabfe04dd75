//! Application session state container.
//!
//! # Responsibility
//! - Own the task list, profile snapshot, notices and reminder scheduler.
//! - Route every user action through the store and apply results locally.
//!
//! # Invariants
//! - Local state changes only after the store write succeeds.
//! - Store failures become notices; they never abort the session.
//! - The reminder scheduler is reconciled after every task-list change.

use crate::clock::{Clock, LocalClock};
use crate::model::profile::UserProfile;
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::reminder::{NotificationPermission, Notifier, Reminder, ReminderScheduler};
use crate::service::bootstrap::seed_if_empty;
use crate::service::progression::{
    level_progress, LevelProgress, ProgressionEngine, ToggleOutcome,
};
use crate::service::stats::{stat_tiles, DailyStats, StatTile};
use crate::service::task_service::TaskService;
use crate::store::{StoreError, StoreResult, TrackerStore};
use log::{error, info, warn};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub operation: &'static str,
    pub message: String,
}

impl Notice {
    fn info(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            operation,
            message: message.into(),
        }
    }

    fn from_error(operation: &'static str, err: &StoreError) -> Self {
        Self {
            level: NoticeLevel::Error,
            operation,
            message: err.to_string(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.message),
            NoticeLevel::Error => write!(f, "{} failed: {}", self.operation, self.message),
        }
    }
}

/// One user's tracker session over store `S`.
pub struct Session<S: TrackerStore, C: Clock = LocalClock> {
    store: S,
    clock: C,
    tasks: Vec<Task>,
    profile: Option<UserProfile>,
    notices: Vec<Notice>,
    reminders: ReminderScheduler,
}

impl<S: TrackerStore> Session<S, LocalClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, LocalClock)
    }
}

impl<S: TrackerStore, C: Clock> Session<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            tasks: Vec::new(),
            profile: None,
            notices: Vec::new(),
            reminders: ReminderScheduler::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Profile snapshot; `None` until a load succeeds.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn points(&self) -> u32 {
        self.profile.as_ref().map_or(0, |profile| profile.points)
    }

    pub fn level_progress(&self) -> LevelProgress {
        level_progress(self.points())
    }

    pub fn daily_stats(&self) -> DailyStats {
        DailyStats::from_tasks(&self.tasks)
    }

    pub fn stat_tiles(&self) -> Vec<StatTile> {
        let fallback = UserProfile::default();
        stat_tiles(&self.tasks, self.profile.as_ref().unwrap_or(&fallback))
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drains pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn reminders(&self) -> &ReminderScheduler {
        &self.reminders
    }

    /// Initial load: seeds the default routine for an empty user, then
    /// reads profile and tasks.
    ///
    /// Returns `false` when the store could not be read; previous state is kept.
    pub fn load(&mut self) -> bool {
        match seed_if_empty(&self.store) {
            Ok(0) => {}
            Ok(count) => self
                .notices
                .push(Notice::info("bootstrap", format!("Added {count} starter tasks"))),
            Err(err) => {
                self.fail("bootstrap", &err);
                return false;
            }
        }
        self.refresh()
    }

    /// Re-reads profile and tasks from the store.
    pub fn refresh(&mut self) -> bool {
        let loaded = self
            .store
            .fetch_profile()
            .and_then(|profile| Ok((profile, self.store.list_tasks()?)));

        match loaded {
            Ok((profile, tasks)) => {
                info!(
                    "event=session_refresh module=session status=ok tasks={} points={}",
                    tasks.len(),
                    profile.points
                );
                self.profile = Some(profile);
                self.replace_tasks(tasks);
                true
            }
            Err(err) => {
                self.fail("refresh", &err);
                false
            }
        }
    }

    /// Creates a task and reloads the list.
    pub fn create_task(&mut self, draft: &TaskDraft) -> Option<TaskId> {
        let created = TaskService::new(&self.store).create_task(draft);
        match created {
            Ok(id) => {
                self.reload_tasks("create_task");
                Some(id)
            }
            Err(err) => {
                self.fail("create_task", &err);
                None
            }
        }
    }

    /// Replaces the editable fields of task `id` and reloads the list.
    pub fn update_task(&mut self, id: TaskId, draft: &TaskDraft) -> bool {
        let updated = TaskService::new(&self.store).update_task(id, draft);
        self.finish_write("update_task", updated)
    }

    /// Deletes task `id` and reloads the list. Points are not touched.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let deleted = TaskService::new(&self.store).delete_task(id);
        self.finish_write("delete_task", deleted)
    }

    /// Flips completion of task `id` (fail closed).
    pub fn toggle_task(&mut self, id: TaskId) -> Option<ToggleOutcome> {
        let Some(task) = self.task(id).cloned() else {
            self.fail("toggle_task", &StoreError::NotFound(id));
            return None;
        };

        let engine = ProgressionEngine::new(&self.store);
        let outcome = match engine.toggle_completion(&task, self.points()) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.fail("toggle_task", &err);
                return None;
            }
        };

        if let Some(local) = self.tasks.iter_mut().find(|task| task.id == id) {
            local.completed = outcome.completed;
        }
        self.sync_profile_after_toggle(&outcome);
        if outcome.leveled_up() {
            let progress = level_progress(outcome.points_after);
            self.notices.push(Notice::info(
                "toggle_task",
                format!(
                    "Level up! You are now {} (level {})",
                    progress.rank_name, progress.level
                ),
            ));
        }
        self.reconcile_reminders();
        Some(outcome)
    }

    /// Records the platform permission answer and re-plans reminders.
    pub fn set_notification_permission(&mut self, permission: NotificationPermission) {
        let now = self.clock.now();
        self.reminders.set_permission(permission, &self.tasks, now);
    }

    /// Re-plans reminders for the current instant.
    pub fn reconcile_reminders(&mut self) {
        let now = self.clock.now();
        self.reminders.reconcile(&self.tasks, now);
    }

    /// Delivers every reminder due now; returns what fired.
    pub fn fire_due_reminders(&mut self, notifier: &mut dyn Notifier) -> Vec<Reminder> {
        let now = self.clock.now();
        let fired = self.reminders.take_due(now);
        for reminder in &fired {
            info!(
                "event=reminder_fire module=session status=ok task_id={} due_at={}",
                reminder.task_id, reminder.due_at
            );
            notifier.notify(reminder);
        }
        // Picks up the next day's reminders once the date rolls over.
        self.reminders.reconcile(&self.tasks, now);
        fired
    }

    /// Picks up store-side changes such as achievement unlocks; falls back to
    /// the computed points when the profile cannot be re-read.
    fn sync_profile_after_toggle(&mut self, outcome: &ToggleOutcome) {
        match self.store.fetch_profile() {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => {
                warn!(
                    "event=profile_fetch module=session status=error error_code={} error={err}",
                    err.code()
                );
                if let Some(profile) = self.profile.as_mut() {
                    profile.points = outcome.points_after;
                }
            }
        }
    }

    fn finish_write(&mut self, operation: &'static str, result: StoreResult<()>) -> bool {
        match result {
            Ok(()) => {
                self.reload_tasks(operation);
                true
            }
            Err(err) => {
                self.fail(operation, &err);
                false
            }
        }
    }

    fn reload_tasks(&mut self, operation: &'static str) {
        match self.store.list_tasks() {
            Ok(tasks) => self.replace_tasks(tasks),
            Err(err) => self.fail(operation, &err),
        }
    }

    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.reconcile_reminders();
    }

    fn fail(&mut self, operation: &'static str, err: &StoreError) {
        error!(
            "event={operation} module=session status=error error_code={} error={err}",
            err.code()
        );
        self.notices.push(Notice::from_error(operation, err));
    }
}
