//! First-run seeding of the default daily routine.
//!
//! # Invariants
//! - Seeding only happens for a user with zero tasks.
//! - Seeded tasks go through the store's `initialize_tasks` pathway.

use crate::model::task::{TaskDraft, TimeOfDay};
use crate::store::{StoreResult, TrackerStore};
use log::info;

/// One row of the default routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTask {
    pub title: &'static str,
    pub hour: u32,
    pub minute: u32,
    pub points: u32,
    pub category: &'static str,
}

pub const DEFAULT_TASKS: &[DefaultTask] = &[
    DefaultTask {
        title: "Morning exercise",
        hour: 7,
        minute: 0,
        points: 50,
        category: "Health",
    },
    DefaultTask {
        title: "Meditation",
        hour: 7,
        minute: 30,
        points: 30,
        category: "Health",
    },
    DefaultTask {
        title: "Breakfast",
        hour: 8,
        minute: 0,
        points: 20,
        category: "Health",
    },
    DefaultTask {
        title: "Work on project",
        hour: 9,
        minute: 0,
        points: 100,
        category: "Work",
    },
    DefaultTask {
        title: "Read a book",
        hour: 20,
        minute: 0,
        points: 40,
        category: "Growth",
    },
    DefaultTask {
        title: "Plan tomorrow",
        hour: 21,
        minute: 0,
        points: 30,
        category: "Organization",
    },
];

/// Default routine as create payloads.
pub fn default_task_drafts() -> Vec<TaskDraft> {
    DEFAULT_TASKS
        .iter()
        .filter_map(|row| {
            TimeOfDay::from_hm(row.hour, row.minute)
                .ok()
                .map(|time| TaskDraft::new(row.title, time, row.points).with_category(row.category))
        })
        .collect()
}

/// Seeds the default routine when the user has no tasks.
///
/// Returns the number of seeded tasks (`0` when tasks already exist).
pub fn seed_if_empty<S: TrackerStore + ?Sized>(store: &S) -> StoreResult<usize> {
    if !store.list_tasks()?.is_empty() {
        return Ok(0);
    }

    let drafts = default_task_drafts();
    store.initialize_tasks(&drafts)?;
    info!(
        "event=bootstrap_seed module=bootstrap status=ok count={}",
        drafts.len()
    );
    Ok(drafts.len())
}
