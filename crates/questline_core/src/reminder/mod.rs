//! Foreground reminder scheduling.
//!
//! # Responsibility
//! - Keep at most one pending reminder per task for today.
//! - Hand due reminders to a `Notifier` exactly once.
//!
//! # Invariants
//! - Reminders live in process memory only; a restart re-plans from tasks.
//! - Nothing is scheduled unless notification permission is granted.

pub mod scheduler;

pub use scheduler::{
    reminder_due_at, NotificationPermission, ReconcileReport, Reminder, ReminderScheduler,
};

/// Delivery sink for fired reminders.
pub trait Notifier {
    fn notify(&mut self, reminder: &Reminder);
}

/// Notifier that keeps delivered reminders in memory.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    pub delivered: Vec<Reminder>,
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, reminder: &Reminder) {
        self.delivered.push(reminder.clone());
    }
}
