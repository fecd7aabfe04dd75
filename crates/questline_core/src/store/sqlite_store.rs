//! SQLite-backed local store.
//!
//! # Responsibility
//! - Implement the task/profile store contracts over the local schema.
//! - Mirror the remote store's server-side rules so both are interchangeable.
//!
//! # Invariants
//! - The user row is created lazily (0 points, level 1, streak 0).
//! - A first profile read seeds the locked achievement catalog.
//! - Completion changes update task state and points in one transaction.
//! - Re-applying the current completion state does not move points.

use crate::db::{open_db, open_db_in_memory};
use crate::model::achievement::{Achievement, AchievementKind, ACHIEVEMENT_CATALOG};
use crate::model::profile::UserProfile;
use crate::model::task::{Task, TaskDraft, TaskId, TimeOfDay};
use crate::service::progression::level_for_points;
use crate::store::{ProfileStore, StoreError, StoreResult, TaskStore};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    time,
    points,
    category,
    completed,
    notification_enabled
FROM tasks";

/// Local store bound to one user id.
pub struct SqliteStore {
    conn: Connection,
    user_id: String,
}

impl SqliteStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, user_id: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?, user_id))
    }

    /// Opens a fresh in-memory database.
    pub fn in_memory(user_id: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?, user_id))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Raw connection access for maintenance and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn ensure_user(&self) -> StoreResult<()> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (id, username, points, current_level, streak_days)
             VALUES (?1, ?2, 0, 1, 0);",
            params![self.user_id, format!("user_{}", self.user_id)],
        )?;
        if inserted > 0 {
            info!("event=user_create module=store status=ok backend=sqlite");
        }
        Ok(())
    }

    fn ensure_achievements(&self) -> StoreResult<()> {
        let existing: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM achievements WHERE user_id = ?1;",
            [&self.user_id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        for entry in ACHIEVEMENT_CATALOG {
            tx.execute(
                "INSERT INTO achievements (user_id, achievement_type, title, description)
                 VALUES (?1, ?2, ?3, ?4);",
                params![self.user_id, entry.kind, entry.title, entry.description],
            )?;
        }
        tx.commit()?;

        info!(
            "event=achievements_seed module=store status=ok backend=sqlite count={}",
            ACHIEVEMENT_CATALOG.len()
        );
        Ok(())
    }

    fn insert_task(conn: &Connection, user_id: &str, draft: &TaskDraft) -> StoreResult<TaskId> {
        draft.validate()?;
        conn.execute(
            "INSERT INTO tasks (user_id, title, time, points, category, notification_enabled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                user_id,
                draft.normalized_title(),
                draft.time.to_string(),
                draft.points,
                draft.normalized_category(),
                bool_to_int(draft.notification_enabled),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

impl TaskStore for SqliteStore {
    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY time ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([&self.user_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        debug!(
            "event=tasks_list module=store status=ok backend=sqlite count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreResult<TaskId> {
        self.ensure_user()?;
        let id = Self::insert_task(&self.conn, &self.user_id, draft)?;
        info!("event=task_create module=store status=ok backend=sqlite task_id={id}");
        Ok(id)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> StoreResult<()> {
        draft.validate()?;
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                time = ?2,
                points = ?3,
                category = ?4,
                notification_enabled = ?5
             WHERE id = ?6 AND user_id = ?7;",
            params![
                draft.normalized_title(),
                draft.time.to_string(),
                draft.points,
                draft.normalized_category(),
                bool_to_int(draft.notification_enabled),
                id,
                self.user_id,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!("event=task_update module=store status=ok backend=sqlite task_id={id}");
        Ok(())
    }

    fn set_task_completion(&self, id: TaskId, completed: bool) -> StoreResult<()> {
        self.ensure_user()?;
        let tx = self.conn.unchecked_transaction()?;

        let current: Option<(i64, u32)> = tx
            .query_row(
                "SELECT completed, points FROM tasks WHERE id = ?1 AND user_id = ?2;",
                params![id, self.user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((current_flag, task_points)) = current else {
            return Err(StoreError::NotFound(id));
        };

        if int_to_bool(current_flag, "tasks.completed")? == completed {
            debug!(
                "event=task_completion module=store status=noop backend=sqlite task_id={id} completed={completed}"
            );
            return Ok(());
        }

        if completed {
            tx.execute(
                "UPDATE tasks
                 SET completed = 1, completed_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1 AND user_id = ?2;",
                params![id, self.user_id],
            )?;
            tx.execute(
                "UPDATE users SET points = points + ?1 WHERE id = ?2;",
                params![task_points, self.user_id],
            )?;
        } else {
            tx.execute(
                "UPDATE tasks
                 SET completed = 0, completed_at = NULL
                 WHERE id = ?1 AND user_id = ?2;",
                params![id, self.user_id],
            )?;
            tx.execute(
                "UPDATE users SET points = MAX(0, points - ?1) WHERE id = ?2;",
                params![task_points, self.user_id],
            )?;
        }

        let points: u32 = tx.query_row(
            "SELECT points FROM users WHERE id = ?1;",
            [&self.user_id],
            |row| row.get(0),
        )?;
        tx.execute(
            "UPDATE users SET current_level = ?1 WHERE id = ?2;",
            params![level_for_points(points), self.user_id],
        )?;
        tx.commit()?;

        info!(
            "event=task_completion module=store status=ok backend=sqlite task_id={id} completed={completed} points={points}"
        );
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2;",
            params![id, self.user_id],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!("event=task_delete module=store status=ok backend=sqlite task_id={id}");
        Ok(())
    }
}

impl ProfileStore for SqliteStore {
    fn fetch_profile(&self) -> StoreResult<UserProfile> {
        self.ensure_user()?;
        self.ensure_achievements()?;

        let mut profile = self.conn.query_row(
            "SELECT username, points, streak_days, last_active_date
             FROM users
             WHERE id = ?1;",
            [&self.user_id],
            |row| {
                Ok(UserProfile {
                    username: row.get(0)?,
                    points: row.get(1)?,
                    streak_days: row.get(2)?,
                    last_active_date: row.get(3)?,
                    achievements: Vec::new(),
                })
            },
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT achievement_type, title, description, unlocked
             FROM achievements
             WHERE user_id = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([&self.user_id])?;
        while let Some(row) = rows.next()? {
            let kind: String = row.get(0)?;
            profile.achievements.push(Achievement {
                kind: AchievementKind::from(kind),
                title: row.get(1)?,
                description: row.get(2)?,
                unlocked: int_to_bool(row.get(3)?, "achievements.unlocked")?,
            });
        }

        debug!(
            "event=profile_fetch module=store status=ok backend=sqlite points={} achievements={}",
            profile.points,
            profile.achievements.len()
        );
        Ok(profile)
    }

    fn initialize_tasks(&self, drafts: &[TaskDraft]) -> StoreResult<()> {
        self.ensure_user()?;
        let tx = self.conn.unchecked_transaction()?;
        for draft in drafts {
            Self::insert_task(&tx, &self.user_id, draft)?;
        }
        tx.commit()?;

        info!(
            "event=tasks_initialize module=store status=ok backend=sqlite count={}",
            drafts.len()
        );
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let time_text: String = row.get("time")?;
    let time = TimeOfDay::parse(&time_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid time value `{time_text}` in tasks.time"))
    })?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        time,
        points: row.get("points")?,
        category: row.get("category")?,
        completed: int_to_bool(row.get("completed")?, "tasks.completed")?,
        notification_enabled: int_to_bool(
            row.get("notification_enabled")?,
            "tasks.notification_enabled",
        )?,
    })
}

fn int_to_bool(value: i64, column: &str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
