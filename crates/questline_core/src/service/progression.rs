//! Points, levels and completion toggles.
//!
//! # Responsibility
//! - Derive level, rank and progress from a points total.
//! - Plan and persist completion toggles with their point delta.
//!
//! # Invariants
//! - Completing adds the task's points; un-completing subtracts them,
//!   clamped at zero.
//! - Level is always derived from points: the highest rank threshold reached.
//! - Points required for the next level are `level * POINTS_PER_LEVEL`.
//! - A failed store write leaves the caller's state untouched.

use crate::model::rank::{rank_for_points, rank_name};
use crate::model::task::{Task, TaskId};
use crate::store::{StoreResult, TaskStore};
use log::{info, warn};

pub const POINTS_PER_LEVEL: u32 = 200;

/// Snapshot of level progress for a points total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    pub points: u32,
    pub level: u32,
    pub rank_name: &'static str,
    pub points_required: u32,
    pub points_to_next: u32,
    /// `points / points_required`, clamped to `[0, 1]`.
    pub fraction: f64,
}

/// Current level for `points`.
pub fn level_for_points(points: u32) -> u32 {
    rank_for_points(points).level
}

/// Points the progress bar of `level` fills up to.
pub fn points_required_for(level: u32) -> u32 {
    level.max(1).saturating_mul(POINTS_PER_LEVEL)
}

pub fn level_progress(points: u32) -> LevelProgress {
    let level = level_for_points(points);
    let points_required = points_required_for(level);
    let fraction = (f64::from(points) / f64::from(points_required)).clamp(0.0, 1.0);

    LevelProgress {
        points,
        level,
        rank_name: rank_name(level),
        points_required,
        points_to_next: points_required.saturating_sub(points),
        fraction,
    }
}

/// Point total after a completion change worth `task_points`.
pub fn apply_completion(points: u32, task_points: u32, completed: bool) -> u32 {
    if completed {
        points.saturating_add(task_points)
    } else {
        points.saturating_sub(task_points)
    }
}

/// Planned effect of flipping one task's completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub task_id: TaskId,
    pub completed: bool,
    /// Signed change actually applied to the total (after clamping).
    pub point_delta: i64,
    pub points_before: u32,
    pub points_after: u32,
}

impl ToggleOutcome {
    /// Whether this toggle crossed into a higher level.
    pub fn leveled_up(&self) -> bool {
        level_for_points(self.points_after) > level_for_points(self.points_before)
    }
}

/// Computes the toggle of `task` against `current_points` without side effects.
pub fn plan_toggle(task: &Task, current_points: u32) -> ToggleOutcome {
    let completed = !task.completed;
    let points_after = apply_completion(current_points, task.points, completed);

    ToggleOutcome {
        task_id: task.id,
        completed,
        point_delta: i64::from(points_after) - i64::from(current_points),
        points_before: current_points,
        points_after,
    }
}

/// Applies completion toggles through a task store.
pub struct ProgressionEngine<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> ProgressionEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Flips `task` and persists the new flag.
    ///
    /// The store owns the authoritative point adjustment; the returned
    /// outcome is what the caller applies locally once this returns `Ok`.
    ///
    /// # Errors
    /// - Propagates the store error unchanged; nothing is applied.
    pub fn toggle_completion(&self, task: &Task, current_points: u32) -> StoreResult<ToggleOutcome> {
        let outcome = plan_toggle(task, current_points);

        if let Err(err) = self.store.set_task_completion(task.id, outcome.completed) {
            warn!(
                "event=task_toggle module=progression status=error task_id={} error_code={} error={err}",
                task.id,
                err.code()
            );
            return Err(err);
        }

        info!(
            "event=task_toggle module=progression status=ok task_id={} completed={} delta={} points={} level={}",
            task.id,
            outcome.completed,
            outcome.point_delta,
            outcome.points_after,
            level_for_points(outcome.points_after)
        );
        Ok(outcome)
    }
}
