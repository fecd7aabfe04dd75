use questline_core::db::migrations::{apply_migrations, latest_version};
use questline_core::db::{open_db, open_db_in_memory, schema_version, DbError};
use rusqlite::Connection;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name;")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn fresh_database_has_tracker_tables_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(table_names(&conn), ["achievements", "tasks", "users"]);
}

#[test]
fn current_database_needs_no_further_steps() {
    let mut conn = open_db_in_memory().unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
}

#[test]
fn tasks_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questline.db");

    let first = open_db(&path).unwrap();
    first
        .execute("INSERT INTO users (id, username) VALUES ('7', 'user_7');", [])
        .unwrap();
    first
        .execute(
            "INSERT INTO tasks (user_id, title, time, points, category) VALUES ('7', 'Meditation', '07:30', 30, 'Health');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second).unwrap(), latest_version());
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM tasks WHERE user_id = '7';", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn file_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "schema_too_new");
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found: 42, supported } if supported == latest_version()
    ));
}

#[test]
fn points_column_rejects_negative_values() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO users (id, username) VALUES ('1', 'user_1');", [])
        .unwrap();

    let result = conn.execute("UPDATE users SET points = -5 WHERE id = '1';", []);
    assert!(result.is_err());
}

#[test]
fn task_rows_require_an_existing_user() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO tasks (user_id, title, time, points, category) VALUES ('ghost', 'Read a book', '20:00', 40, 'Growth');",
        [],
    );
    assert!(result.is_err());
}
