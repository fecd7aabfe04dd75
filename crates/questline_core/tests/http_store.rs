use questline_core::{
    HttpStore, NoticeLevel, ProfileStore, RemoteConfig, Session, StoreError, TaskStore,
};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const ONE_TASK: &str = r#"{"tasks":[{"id":7,"title":"Meditation","time":"07:30","points":30,
    "category":"Health","completed":false,"notificationEnabled":true}]}"#;
const PROFILE_LOCKED: &str = r#"{"id":"42","username":"user_42","points":0,"currentLevel":1,
    "streakDays":0,"achievements":[{"type":"first_steps","title":"First Steps",
    "description":"Complete your first task","unlocked":false}]}"#;
const PROFILE_UNLOCKED: &str = r#"{"id":"42","username":"user_42","points":30,"currentLevel":1,
    "streakDays":1,"achievements":[{"type":"first_steps","title":"First Steps",
    "description":"Complete your first task","unlocked":true}]}"#;

/// One request as seen by the test server.
struct Recorded {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Answers one connection per canned reply, in order, then returns what it saw.
fn serve(replies: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        replies
            .into_iter()
            .map(|(status, body)| {
                let (stream, _) = listener.accept().unwrap();
                answer(stream, status, &body)
            })
            .collect()
    });
    (base_url, handle)
}

fn answer(mut stream: TcpStream, status: u16, body: &str) -> Recorded {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .map_or(0, |(_, value)| value.parse::<usize>().unwrap());
    let mut raw_body = vec![0; length];
    reader.read_exact(&mut raw_body).unwrap();

    let reason = if status < 400 { "OK" } else { "Error" };
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .unwrap();
    stream.flush().unwrap();

    Recorded {
        request_line: request_line.trim_end().to_string(),
        headers,
        body: String::from_utf8(raw_body).unwrap(),
    }
}

fn store_for(base_url: &str) -> HttpStore {
    let config = RemoteConfig::new(format!("{base_url}/tasks"), format!("{base_url}/user"))
        .with_timeout(Duration::from_secs(5));
    HttpStore::new(config, "42")
}

fn ok(body: &str) -> (u16, String) {
    (200, body.to_string())
}

#[test]
fn every_request_carries_the_user_id_header() {
    let (base_url, server) = serve(vec![ok(ONE_TASK), ok(PROFILE_LOCKED)]);
    let store = store_for(&base_url);

    let tasks = store.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Meditation");
    assert_eq!(store.fetch_profile().unwrap().username, "user_42");

    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "GET /tasks HTTP/1.1");
    assert_eq!(seen[1].request_line, "GET /user HTTP/1.1");
    for request in &seen {
        assert_eq!(request.header("x-user-id"), Some("42"));
    }
}

#[test]
fn delete_passes_id_as_query_parameter() {
    let (base_url, server) = serve(vec![ok(r#"{"message":"Task deleted"}"#)]);
    store_for(&base_url).delete_task(7).unwrap();

    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "DELETE /tasks?id=7 HTTP/1.1");
    assert_eq!(seen[0].header("X-User-Id"), Some("42"));
}

#[test]
fn completion_is_a_put_with_id_and_flag() {
    let (base_url, server) = serve(vec![ok(r#"{"message":"Task updated"}"#)]);
    store_for(&base_url).set_task_completion(7, true).unwrap();

    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "PUT /tasks HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body, serde_json::json!({"id": 7, "completed": true}));
}

#[test]
fn error_status_becomes_status_error_with_capped_body() {
    let (base_url, server) = serve(vec![(500, "x".repeat(450))]);

    match store_for(&base_url).list_tasks() {
        Err(StoreError::Status { code, body }) => {
            assert_eq!(code, 500);
            assert_eq!(body.chars().count(), 200);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = store_for(&base_url).list_tasks().unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)), "{err:?}");
    assert_eq!(err.code(), "transport_failed");
}

#[test]
fn rejected_remote_toggle_leaves_session_unchanged() {
    let (base_url, server) = serve(vec![
        ok(ONE_TASK),
        ok(PROFILE_LOCKED),
        ok(ONE_TASK),
        (500, r#"{"error":"database unavailable"}"#.to_string()),
    ]);
    let mut session = Session::new(store_for(&base_url));
    assert!(session.load());

    assert!(session.toggle_task(7).is_none());
    assert!(!session.task(7).unwrap().completed);
    assert_eq!(session.points(), 0);

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].operation, "toggle_task");
    assert_eq!(server.join().unwrap().len(), 4);
}

#[test]
fn accepted_remote_toggle_rereads_profile_for_unlocks() {
    let (base_url, server) = serve(vec![
        ok(ONE_TASK),
        ok(PROFILE_LOCKED),
        ok(ONE_TASK),
        ok(r#"{"message":"Task updated"}"#),
        ok(PROFILE_UNLOCKED),
    ]);
    let mut session = Session::new(store_for(&base_url));
    assert!(session.load());

    let outcome = session.toggle_task(7).unwrap();
    assert_eq!(outcome.points_after, 30);
    assert!(session.task(7).unwrap().completed);

    let profile = session.profile().unwrap();
    assert_eq!(profile.points, 30);
    assert_eq!(profile.streak_days, 1);
    assert_eq!(profile.unlocked_count(), 1);

    let seen = server.join().unwrap();
    assert_eq!(seen[4].request_line, "GET /user HTTP/1.1");
}
