use chrono::{NaiveDate, NaiveDateTime};
use questline_core::{
    default_task_drafts, AchievementKind, CollectingNotifier, FixedClock, NoticeLevel,
    NotificationPermission, ProfileStore, Session, SqliteStore, StoreError, StoreResult, Task,
    TaskDraft, TaskId, TaskStore, TimeOfDay, UserProfile, DEFAULT_TASKS,
};
use std::cell::Cell;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Local store whose writes can be switched to fail like an unreachable server.
struct FlakyStore {
    inner: SqliteStore,
    fail_writes: Cell<bool>,
    fail_profile_reads: Cell<bool>,
    unlock_first_steps_on_completion: Cell<bool>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteStore::in_memory("1").unwrap(),
            fail_writes: Cell::new(false),
            fail_profile_reads: Cell::new(false),
            unlock_first_steps_on_completion: Cell::new(false),
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

impl TaskStore for FlakyStore {
    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.inner.list_tasks()
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreResult<TaskId> {
        self.check()?;
        self.inner.create_task(draft)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> StoreResult<()> {
        self.check()?;
        self.inner.update_task(id, draft)
    }

    fn set_task_completion(&self, id: TaskId, completed: bool) -> StoreResult<()> {
        self.check()?;
        self.inner.set_task_completion(id, completed)?;
        if completed && self.unlock_first_steps_on_completion.get() {
            self.inner.connection().execute(
                "UPDATE achievements SET unlocked = 1 WHERE achievement_type = 'first_steps';",
                [],
            )?;
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.check()?;
        self.inner.delete_task(id)
    }
}

impl ProfileStore for FlakyStore {
    fn fetch_profile(&self) -> StoreResult<UserProfile> {
        if self.fail_profile_reads.get() {
            return Err(StoreError::Transport("connection reset".to_string()));
        }
        self.inner.fetch_profile()
    }

    fn initialize_tasks(&self, drafts: &[TaskDraft]) -> StoreResult<()> {
        self.check()?;
        self.inner.initialize_tasks(drafts)
    }
}

fn loaded_session(now: NaiveDateTime) -> Session<FlakyStore, FixedClock> {
    let mut session = Session::with_clock(FlakyStore::new(), FixedClock::new(now));
    assert!(session.load());
    session
}

fn task_id(session: &Session<FlakyStore, FixedClock>, title: &str) -> TaskId {
    session
        .tasks()
        .iter()
        .find(|task| task.title == title)
        .map(|task| task.id)
        .unwrap()
}

#[test]
fn first_load_seeds_the_six_default_tasks() {
    let mut session = loaded_session(at(6, 0));

    let tasks = session.tasks();
    assert_eq!(tasks.len(), 6);
    for (task, expected) in tasks.iter().zip(DEFAULT_TASKS) {
        assert_eq!(task.title, expected.title);
        assert_eq!(task.time, TimeOfDay::from_hm(expected.hour, expected.minute).unwrap());
        assert_eq!(task.points, expected.points);
        assert_eq!(task.category, expected.category);
    }

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(session.profile().unwrap().points, 0);
}

#[test]
fn second_load_does_not_reseed() {
    let mut session = loaded_session(at(6, 0));
    assert!(session.load());
    assert_eq!(session.tasks().len(), default_task_drafts().len());
}

#[test]
fn toggle_on_then_off_restores_points_in_session_and_store() {
    let mut session = loaded_session(at(6, 0));
    let id = task_id(&session, "Work on project");

    let on = session.toggle_task(id).unwrap();
    assert!(on.completed);
    assert_eq!(session.points(), 100);
    assert!(session.task(id).unwrap().completed);
    assert_eq!(session.store().fetch_profile().unwrap().points, 100);

    let off = session.toggle_task(id).unwrap();
    assert!(!off.completed);
    assert_eq!(session.points(), 0);
    assert_eq!(session.store().fetch_profile().unwrap().points, 0);
}

#[test]
fn toggle_picks_up_achievements_unlocked_by_the_store() {
    let mut session = loaded_session(at(6, 0));
    assert_eq!(session.profile().unwrap().unlocked_count(), 0);
    session.store().unlock_first_steps_on_completion.set(true);

    let id = task_id(&session, "Meditation");
    session.toggle_task(id).unwrap();

    let profile = session.profile().unwrap();
    assert_eq!(profile.points, 30);
    assert_eq!(profile.unlocked_count(), 1);
    assert!(profile
        .achievements
        .iter()
        .any(|achievement| achievement.kind == AchievementKind::FirstSteps && achievement.unlocked));
}

#[test]
fn toggle_keeps_computed_points_when_profile_reread_fails() {
    let mut session = loaded_session(at(6, 0));
    session.take_notices();
    session.store().fail_profile_reads.set(true);

    let id = task_id(&session, "Work on project");
    let outcome = session.toggle_task(id).unwrap();

    assert_eq!(outcome.points_after, 100);
    assert_eq!(session.points(), 100);
    assert!(session.task(id).unwrap().completed);
    assert!(session.take_notices().is_empty());
}

#[test]
fn failed_toggle_leaves_state_untouched_and_raises_notice() {
    let mut session = loaded_session(at(6, 0));
    session.take_notices();
    let id = task_id(&session, "Meditation");

    session.store().fail_writes.set(true);
    assert!(session.toggle_task(id).is_none());

    assert!(!session.task(id).unwrap().completed);
    assert_eq!(session.points(), 0);
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].operation, "toggle_task");
}

#[test]
fn failed_create_keeps_previous_list() {
    let mut session = loaded_session(at(6, 0));
    session.store().fail_writes.set(true);

    let draft = TaskDraft::new("Stretch", TimeOfDay::from_hm(18, 0).unwrap(), 15);
    assert!(session.create_task(&draft).is_none());
    assert_eq!(session.tasks().len(), 6);
    assert!(session
        .notices()
        .iter()
        .any(|notice| notice.level == NoticeLevel::Error));
}

#[test]
fn invalid_draft_becomes_notice_not_store_call() {
    let mut session = loaded_session(at(6, 0));
    let draft = TaskDraft::new("", TimeOfDay::from_hm(18, 0).unwrap(), 15);
    assert!(session.create_task(&draft).is_none());
    assert_eq!(session.tasks().len(), 6);
}

#[test]
fn delete_removes_task_without_touching_points() {
    let mut session = loaded_session(at(6, 0));
    let done = task_id(&session, "Breakfast");
    session.toggle_task(done).unwrap();
    let points = session.points();

    assert!(session.delete_task(done));
    assert!(session.task(done).is_none());
    assert!(session.refresh());
    assert!(session.tasks().iter().all(|task| task.id != done));
    assert_eq!(session.points(), points);
}

#[test]
fn toggling_unknown_task_is_a_notice() {
    let mut session = loaded_session(at(6, 0));
    session.take_notices();
    assert!(session.toggle_task(9_999).is_none());
    assert_eq!(session.take_notices()[0].operation, "toggle_task");
}

#[test]
fn reminders_follow_task_state_without_duplicates() {
    let mut session = loaded_session(at(8, 30));
    assert_eq!(session.reminders().pending_count(), 0);

    session.set_notification_permission(NotificationPermission::Granted);
    // 09:00, 20:00 and 21:00 are still ahead at 08:30.
    assert_eq!(session.reminders().pending_count(), 3);

    assert!(session.refresh());
    session.reconcile_reminders();
    assert_eq!(session.reminders().pending_count(), 3);

    let work = task_id(&session, "Work on project");
    session.toggle_task(work).unwrap();
    assert_eq!(session.reminders().pending_count(), 2);

    let read = task_id(&session, "Read a book");
    let muted = session.task(read).unwrap().to_draft().with_notifications(false);
    assert!(session.update_task(read, &muted));
    assert_eq!(session.reminders().pending_count(), 1);
}

#[test]
fn due_reminder_fires_once_with_task_title() {
    let clock = FixedClock::new(at(8, 0));
    let mut session = Session::with_clock(FlakyStore::new(), &clock);
    assert!(session.load());
    session.set_notification_permission(NotificationPermission::Granted);

    let mut notifier = CollectingNotifier::default();
    assert!(session.fire_due_reminders(&mut notifier).is_empty());

    clock.set(at(9, 0));
    let fired = session.fire_due_reminders(&mut notifier);
    assert_eq!(fired.len(), 1);
    assert_eq!(notifier.delivered[0].title, "Work on project");

    clock.set(at(9, 5));
    assert!(session.fire_due_reminders(&mut notifier).is_empty());
    assert_eq!(notifier.delivered.len(), 1);
}

#[test]
fn denied_permission_keeps_scheduler_inert() {
    let mut session = loaded_session(at(6, 0));
    session.set_notification_permission(NotificationPermission::Denied);
    assert_eq!(session.reminders().pending_count(), 0);
}

#[test]
fn stats_track_completion() {
    let mut session = loaded_session(at(6, 0));
    let id = task_id(&session, "Morning exercise");
    session.toggle_task(id).unwrap();

    let daily = session.daily_stats();
    assert_eq!((daily.completed, daily.total), (1, 6));
    let tiles = session.stat_tiles();
    assert_eq!(tiles[0].value, "1/6");
    assert_eq!(tiles[1].value, "50");
}
