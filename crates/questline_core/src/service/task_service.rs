//! Task CRUD façade.
//!
//! # Responsibility
//! - Provide the list/create/update/delete entry points over a task store.
//! - Reject invalid payloads before any store round-trip.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Completion changes do not go through here; see `ProgressionEngine`.

use crate::model::task::{Task, TaskDraft, TaskId};
use crate::store::{StoreResult, TaskStore};
use log::info;

/// Use-case service wrapper for task CRUD operations.
pub struct TaskService<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists the user's tasks ordered by time of day.
    pub fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.store.list_tasks()
    }

    /// Creates one task and returns its store-assigned id.
    pub fn create_task(&self, draft: &TaskDraft) -> StoreResult<TaskId> {
        draft.validate()?;
        let id = self.store.create_task(draft)?;
        info!(
            "event=task_create module=service status=ok task_id={id} points={} notify={}",
            draft.points, draft.notification_enabled
        );
        Ok(id)
    }

    /// Replaces every editable field of task `id`.
    pub fn update_task(&self, id: TaskId, draft: &TaskDraft) -> StoreResult<()> {
        draft.validate()?;
        self.store.update_task(id, draft)?;
        info!("event=task_update module=service status=ok task_id={id}");
        Ok(())
    }

    /// Deletes task `id`; points are never affected.
    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.store.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }
}
