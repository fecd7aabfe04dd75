//! Task domain model.
//!
//! # Responsibility
//! - Define the daily task record shared by stores, session and scheduler.
//! - Validate create/patch payloads before they reach a store.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another task.
//! - `points` is strictly positive.
//! - `time` is a wall-clock time of day, serialized as zero-padded `HH:MM`.

use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned task identifier.
pub type TaskId = i64;

/// Category applied when a create payload omits one.
pub const DEFAULT_CATEGORY: &str = "General";

// Stores backed by a SQL `TIME` column echo seconds back; they are accepted
// and dropped.
static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)(?::[0-5]\d)?$").expect("valid time-of-day regex")
});

/// Task payload validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    ZeroPoints,
    InvalidTime(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::ZeroPoints => write!(f, "task points must be greater than zero"),
            Self::InvalidTime(value) => {
                write!(f, "invalid time of day `{value}`; expected HH:MM")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Minute-precision time of day at which a task is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Builds a time of day from hour/minute parts.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TaskValidationError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| TaskValidationError::InvalidTime(format!("{hour}:{minute}")))
    }

    /// Parses `HH:MM` (optionally `HH:MM:SS`, seconds ignored).
    pub fn parse(value: &str) -> Result<Self, TaskValidationError> {
        let trimmed = value.trim();
        let caps = TIME_OF_DAY_RE
            .captures(trimmed)
            .ok_or_else(|| TaskValidationError::InvalidTime(trimmed.to_string()))?;
        let hour = caps[1]
            .parse::<u32>()
            .map_err(|_| TaskValidationError::InvalidTime(trimmed.to_string()))?;
        let minute = caps[2]
            .parse::<u32>()
            .map_err(|_| TaskValidationError::InvalidTime(trimmed.to_string()))?;
        Self::from_hm(hour, minute)
    }

    pub fn as_naive_time(self) -> NaiveTime {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// One daily task as held by a store.
///
/// Field names follow the wire contract (`notificationEnabled`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub time: TimeOfDay,
    pub points: u32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_notification_enabled")]
    pub notification_enabled: bool,
}

impl Task {
    /// Returns the editable fields of this task as a patch payload.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            time: self.time,
            points: self.points,
            category: self.category.clone(),
            notification_enabled: self.notification_enabled,
        }
    }

    /// Whether the task currently wants a reminder at all.
    pub fn wants_reminder(&self) -> bool {
        !self.completed && self.notification_enabled
    }
}

/// Create / full-patch payload for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub time: TimeOfDay,
    pub points: u32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_notification_enabled")]
    pub notification_enabled: bool,
}

impl TaskDraft {
    /// Creates a draft in the default category with notifications enabled.
    pub fn new(title: impl Into<String>, time: TimeOfDay, points: u32) -> Self {
        Self {
            title: title.into(),
            time,
            points,
            category: DEFAULT_CATEGORY.to_string(),
            notification_enabled: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notification_enabled = enabled;
        self
    }

    /// Validates payload invariants.
    ///
    /// A blank category is not an error; stores persist it as
    /// [`DEFAULT_CATEGORY`] (see [`TaskDraft::normalized_category`]).
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.points == 0 {
            return Err(TaskValidationError::ZeroPoints);
        }
        Ok(())
    }

    /// Trimmed title as persisted by stores.
    pub fn normalized_title(&self) -> &str {
        self.title.trim()
    }

    /// Trimmed category, falling back to [`DEFAULT_CATEGORY`].
    pub fn normalized_category(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            DEFAULT_CATEGORY
        } else {
            trimmed
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_notification_enabled() -> bool {
    true
}
