//! Store contracts and implementations.
//!
//! # Responsibility
//! - Define the task/profile data access contracts used by services.
//! - Provide a local SQLite store and a client for the remote HTTP store.
//!
//! # Invariants
//! - Write paths validate payloads before any mutation.
//! - Completion changes adjust the owning user's points inside the store;
//!   the total never drops below zero.
//! - Every store is bound to a single user identifier.

use crate::db::DbError;
use crate::model::profile::UserProfile;
use crate::model::task::{Task, TaskDraft, TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http_store;
pub mod sqlite_store;

pub use http_store::HttpStore;
pub use sqlite_store::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for task/profile persistence and transport.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    Transport(String),
    Status { code: u16, body: String },
    Decode(String),
}

impl StoreError {
    /// Short stable code used in log lines and notices.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "db_error",
            Self::NotFound(_) => "task_not_found",
            Self::InvalidData(_) => "invalid_data",
            Self::Transport(_) => "transport_failed",
            Self::Status { .. } => "bad_status",
            Self::Decode(_) => "decode_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
            Self::Transport(message) => write!(f, "store unreachable: {message}"),
            Self::Status { code, body } => {
                if body.is_empty() {
                    write!(f, "store responded with status {code}")
                } else {
                    write!(f, "store responded with status {code}: {body}")
                }
            }
            Self::Decode(message) => write!(f, "malformed store response: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Task records for one user.
pub trait TaskStore {
    /// Lists all tasks ordered by time of day.
    fn list_tasks(&self) -> StoreResult<Vec<Task>>;
    fn create_task(&self, draft: &TaskDraft) -> StoreResult<TaskId>;
    /// Replaces every editable field; completion is untouched.
    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> StoreResult<()>;
    /// Flips completion and adjusts the user's points accordingly.
    fn set_task_completion(&self, id: TaskId, completed: bool) -> StoreResult<()>;
    fn delete_task(&self, id: TaskId) -> StoreResult<()>;
}

/// Profile state and seeding entry point for one user.
pub trait ProfileStore {
    /// Reads the profile, creating the user and its achievements on first read.
    fn fetch_profile(&self) -> StoreResult<UserProfile>;
    /// Seeds the given tasks for the user.
    fn initialize_tasks(&self, drafts: &[TaskDraft]) -> StoreResult<()>;
}

/// Both halves of the store contract behind one bound.
pub trait TrackerStore: TaskStore + ProfileStore {}

impl<T: TaskStore + ProfileStore + ?Sized> TrackerStore for T {}

impl<T: TaskStore + ?Sized> TaskStore for &T {
    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        (**self).list_tasks()
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreResult<TaskId> {
        (**self).create_task(draft)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> StoreResult<()> {
        (**self).update_task(id, draft)
    }

    fn set_task_completion(&self, id: TaskId, completed: bool) -> StoreResult<()> {
        (**self).set_task_completion(id, completed)
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete_task(id)
    }
}

impl<T: ProfileStore + ?Sized> ProfileStore for &T {
    fn fetch_profile(&self) -> StoreResult<UserProfile> {
        (**self).fetch_profile()
    }

    fn initialize_tasks(&self, drafts: &[TaskDraft]) -> StoreResult<()> {
        (**self).initialize_tasks(drafts)
    }
}
