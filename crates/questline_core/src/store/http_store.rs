//! Blocking client for the remote tasks/user endpoints.
//!
//! # Responsibility
//! - Speak the JSON wire contract of the tasks and user endpoints.
//! - Attach the `X-User-Id` header to every request.
//!
//! # Invariants
//! - Non-2xx responses surface as `StoreError::Status`, never as data.
//! - Missing optional response fields fall back to defaults instead of failing.

use crate::config::RemoteConfig;
use crate::model::profile::UserProfile;
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::store::{ProfileStore, StoreError, StoreResult, TaskStore};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Header carrying the static user identifier.
pub const USER_ID_HEADER: &str = "X-User-Id";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct TasksEnvelope {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    id: TaskId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskBody<'a> {
    id: TaskId,
    #[serde(flatten)]
    draft: &'a TaskDraft,
}

#[derive(Debug, Serialize)]
struct CompletionBody {
    id: TaskId,
    completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeTasksBody<'a> {
    initialize_tasks: &'a [TaskDraft],
}

/// Remote store bound to one user id.
pub struct HttpStore {
    agent: ureq::Agent,
    config: RemoteConfig,
    user_id: String,
}

impl HttpStore {
    pub fn new(config: RemoteConfig, user_id: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            agent,
            config,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set(USER_ID_HEADER, &self.user_id)
    }

    fn send<F>(&self, operation: &'static str, call: F) -> StoreResult<String>
    where
        F: FnOnce() -> Result<ureq::Response, ureq::Error>,
    {
        let started_at = Instant::now();
        let result = call().map_err(map_ureq_error).and_then(|response| {
            response
                .into_string()
                .map_err(|err| StoreError::Transport(err.to_string()))
        });

        match &result {
            Ok(_) => debug!(
                "event=http_call module=store status=ok op={operation} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=http_call module=store status=error op={operation} duration_ms={} error_code={} error={err}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }
}

impl TaskStore for HttpStore {
    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let body = self.send("tasks_list", || {
            self.request("GET", &self.config.tasks_url).call()
        })?;
        decode_tasks(&body)
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreResult<TaskId> {
        draft.validate()?;
        let body = self.send("task_create", || {
            self.request("POST", &self.config.tasks_url).send_json(draft)
        })?;
        let id = decode_created_id(&body)?;
        info!("event=task_create module=store status=ok backend=http task_id={id}");
        Ok(id)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> StoreResult<()> {
        draft.validate()?;
        let payload = UpdateTaskBody { id, draft };
        self.send("task_update", || {
            self.request("PUT", &self.config.tasks_url).send_json(&payload)
        })?;
        info!("event=task_update module=store status=ok backend=http task_id={id}");
        Ok(())
    }

    fn set_task_completion(&self, id: TaskId, completed: bool) -> StoreResult<()> {
        let payload = CompletionBody { id, completed };
        self.send("task_completion", || {
            self.request("PUT", &self.config.tasks_url).send_json(&payload)
        })?;
        info!(
            "event=task_completion module=store status=ok backend=http task_id={id} completed={completed}"
        );
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.send("task_delete", || {
            self.request("DELETE", &self.config.tasks_url)
                .query("id", &id.to_string())
                .call()
        })?;
        info!("event=task_delete module=store status=ok backend=http task_id={id}");
        Ok(())
    }
}

impl ProfileStore for HttpStore {
    fn fetch_profile(&self) -> StoreResult<UserProfile> {
        let body = self.send("profile_fetch", || {
            self.request("GET", &self.config.user_url).call()
        })?;
        decode_profile(&body)
    }

    fn initialize_tasks(&self, drafts: &[TaskDraft]) -> StoreResult<()> {
        for draft in drafts {
            draft.validate()?;
        }
        let payload = InitializeTasksBody {
            initialize_tasks: drafts,
        };
        self.send("tasks_initialize", || {
            self.request("POST", &self.config.user_url).send_json(&payload)
        })?;
        info!(
            "event=tasks_initialize module=store status=ok backend=http count={}",
            drafts.len()
        );
        Ok(())
    }
}

/// Decodes a tasks endpoint `GET` body.
pub fn decode_tasks(body: &str) -> StoreResult<Vec<Task>> {
    decode::<TasksEnvelope>(body).map(|envelope| envelope.tasks)
}

/// Decodes a user endpoint `GET` body.
pub fn decode_profile(body: &str) -> StoreResult<UserProfile> {
    decode(body)
}

/// Decodes a tasks endpoint `POST` body.
pub fn decode_created_id(body: &str) -> StoreResult<TaskId> {
    decode::<CreatedEnvelope>(body).map(|envelope| envelope.id)
}

fn decode<T: DeserializeOwned>(body: &str) -> StoreResult<T> {
    serde_json::from_str(body).map_err(|err| StoreError::Decode(err.to_string()))
}

fn map_ureq_error(err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            StoreError::Status {
                code,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            }
        }
        ureq::Error::Transport(transport) => StoreError::Transport(transport.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        decode_created_id, decode_profile, decode_tasks, CompletionBody, InitializeTasksBody,
        UpdateTaskBody,
    };
    use crate::model::achievement::AchievementKind;
    use crate::model::task::{TaskDraft, TimeOfDay};
    use crate::store::StoreError;

    #[test]
    fn decodes_task_list_with_wire_names() {
        let body = r#"{"tasks":[
            {"id":4,"title":"Work on project","time":"09:00","points":100,
             "category":"Work","completed":true,"notificationEnabled":false}
        ]}"#;
        let tasks = decode_tasks(body).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 4);
        assert_eq!(tasks[0].time.to_string(), "09:00");
        assert!(tasks[0].completed);
        assert!(!tasks[0].notification_enabled);
    }

    #[test]
    fn missing_tasks_field_decodes_as_empty_list() {
        assert!(decode_tasks("{}").unwrap().is_empty());
    }

    #[test]
    fn decodes_profile_and_ignores_reported_level() {
        let body = r#"{
            "id":"1","username":"user_1","points":850,"currentLevel":2,
            "streakDays":12,"lastActiveDate":null,
            "achievements":[{"type":"first_steps","title":"First Steps",
                             "description":"Complete your first task","unlocked":true}]
        }"#;
        let profile = decode_profile(body).unwrap();
        assert_eq!(profile.points, 850);
        assert_eq!(profile.level(), 5);
        assert_eq!(profile.streak_days, 12);
        assert_eq!(profile.achievements[0].kind, AchievementKind::FirstSteps);
        assert_eq!(profile.unlocked_count(), 1);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            decode_created_id("not json"),
            Err(StoreError::Decode(_))
        ));
        assert_eq!(
            decode_created_id(r#"{"id":17,"message":"Task created"}"#).unwrap(),
            17
        );
    }

    #[test]
    fn request_bodies_follow_wire_contract() {
        let draft = TaskDraft::new("Read a book", TimeOfDay::from_hm(20, 0).unwrap(), 40)
            .with_category("Growth");

        let update = serde_json::to_value(UpdateTaskBody {
            id: 5,
            draft: &draft,
        })
        .unwrap();
        assert_eq!(update["id"], 5);
        assert_eq!(update["title"], "Read a book");
        assert_eq!(update["notificationEnabled"], true);
        assert!(update.get("completed").is_none());

        let completion = serde_json::to_value(CompletionBody {
            id: 5,
            completed: true,
        })
        .unwrap();
        assert_eq!(completion, serde_json::json!({"id": 5, "completed": true}));

        let drafts = [draft];
        let seed = serde_json::to_value(InitializeTasksBody {
            initialize_tasks: &drafts,
        })
        .unwrap();
        assert_eq!(seed["initializeTasks"][0]["time"], "20:00");
    }
}
