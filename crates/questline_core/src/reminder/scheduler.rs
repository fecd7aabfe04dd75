//! Re-entrant reminder scheduler keyed by task id.
//!
//! # Invariants
//! - At most one pending reminder exists per task id.
//! - Reconciling is idempotent: the same tasks at the same instant change
//!   nothing.
//! - Completed, disabled or deleted tasks lose their pending reminder.
//! - A reminder whose time already passed is never created, but an armed
//!   one survives until it fires, even across midnight.

use crate::model::task::{Task, TaskId};
use chrono::NaiveDateTime;
use log::{debug, info};
use std::collections::BTreeMap;

/// Platform notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

impl NotificationPermission {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// One pending one-shot reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub task_id: TaskId,
    pub title: String,
    pub due_at: NaiveDateTime,
}

/// Counts of changes made by one reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub scheduled: usize,
    pub rescheduled: usize,
    pub cancelled: usize,
    pub kept: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.scheduled + self.rescheduled + self.cancelled > 0
    }
}

/// When `task` should remind today, evaluated at `now`.
///
/// `None` for completed or notification-disabled tasks and for times that
/// are not strictly after `now`.
pub fn reminder_due_at(task: &Task, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if !task.wants_reminder() {
        return None;
    }
    let due_at = now.date().and_time(task.time.as_naive_time());
    (due_at > now).then_some(due_at)
}

#[derive(Debug, Default)]
pub struct ReminderScheduler {
    permission: NotificationPermission,
    pending: BTreeMap<TaskId, Reminder>,
}

impl ReminderScheduler {
    pub fn new(permission: NotificationPermission) -> Self {
        Self {
            permission,
            pending: BTreeMap::new(),
        }
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }

    /// Updates permission and re-plans against `tasks`.
    pub fn set_permission(
        &mut self,
        permission: NotificationPermission,
        tasks: &[Task],
        now: NaiveDateTime,
    ) -> ReconcileReport {
        if self.permission != permission {
            info!("event=reminder_permission module=reminder status=ok permission={permission:?}");
        }
        self.permission = permission;
        self.reconcile(tasks, now)
    }

    /// Cancels and reschedules per task id so pending reminders match `tasks`.
    pub fn reconcile(&mut self, tasks: &[Task], now: NaiveDateTime) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        if !self.permission.is_granted() {
            report.cancelled = self.pending.len();
            self.pending.clear();
            self.log_report(&report);
            return report;
        }

        let mut next = BTreeMap::new();
        for task in tasks {
            let previous = self.pending.remove(&task.id);
            let armed = previous.as_ref().filter(|reminder| {
                task.wants_reminder()
                    && reminder.title == task.title
                    && reminder.due_at.time() == task.time.as_naive_time()
                    && (reminder.due_at <= now || reminder.due_at.date() == now.date())
            });

            if let Some(reminder) = armed {
                report.kept += 1;
                next.insert(task.id, reminder.clone());
                continue;
            }

            match (reminder_due_at(task, now), previous) {
                (Some(due_at), previous) => {
                    if previous.is_some() {
                        report.rescheduled += 1;
                    } else {
                        report.scheduled += 1;
                    }
                    next.insert(
                        task.id,
                        Reminder {
                            task_id: task.id,
                            title: task.title.clone(),
                            due_at,
                        },
                    );
                }
                (None, Some(_)) => report.cancelled += 1,
                (None, None) => {}
            }
        }

        // Whatever is left belongs to tasks that no longer exist.
        report.cancelled += self.pending.len();
        self.pending = next;
        self.log_report(&report);
        report
    }

    /// Removes and returns every reminder due at or before `now`.
    pub fn take_due(&mut self, now: NaiveDateTime) -> Vec<Reminder> {
        let due_ids: Vec<TaskId> = self
            .pending
            .values()
            .filter(|reminder| reminder.due_at <= now)
            .map(|reminder| reminder.task_id)
            .collect();

        due_ids
            .into_iter()
            .filter_map(|id| self.pending.remove(&id))
            .collect()
    }

    /// Pending reminders ordered by task id.
    pub fn pending(&self) -> impl Iterator<Item = &Reminder> {
        self.pending.values()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<NaiveDateTime> {
        self.pending.values().map(|reminder| reminder.due_at).min()
    }

    fn log_report(&self, report: &ReconcileReport) {
        if report.changed() {
            info!(
                "event=reminder_reconcile module=reminder status=ok scheduled={} rescheduled={} cancelled={} kept={} pending={}",
                report.scheduled,
                report.rescheduled,
                report.cancelled,
                report.kept,
                self.pending.len()
            );
        } else {
            debug!(
                "event=reminder_reconcile module=reminder status=noop pending={}",
                self.pending.len()
            );
        }
    }
}
