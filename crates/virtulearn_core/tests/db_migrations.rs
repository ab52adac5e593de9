use rusqlite::Connection;
use virtulearn_core::db::migrations::latest_version;
use virtulearn_core::db::{drop_schema, init_schema, open_db, open_db_in_memory, DbError};
use virtulearn_core::{InstructorService, NewInstructor, RepoError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "instructors");
    assert_table_exists(&conn, "courses");
    assert_table_exists(&conn, "enrollments");
}

#[test]
fn store_holds_exactly_the_three_entity_tables() {
    let conn = open_db_in_memory().unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name;",
        )
        .unwrap();
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(tables, vec!["courses", "enrollments", "instructors"]);
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn init_schema_twice_keeps_schema_and_data() {
    let mut conn = open_db_in_memory().unwrap();
    InstructorService::new(&conn)
        .create(NewInstructor::new("Ada Lovelace", "Mathematics"))
        .unwrap();

    init_schema(&mut conn).unwrap();
    init_schema(&mut conn).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(table_count(&conn, "instructors"), 1);
    assert_eq!(InstructorService::new(&conn).count().unwrap(), 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("courses.db");

    let conn_first = open_db(&path).unwrap();
    InstructorService::new(&conn_first)
        .create(NewInstructor::new("Grace Hopper", "Compilers"))
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(InstructorService::new(&conn_second).count().unwrap(), 1);
}

#[test]
fn drop_schema_removes_tables_until_reinitialized() {
    let mut conn = open_db_in_memory().unwrap();
    InstructorService::new(&conn)
        .create(NewInstructor::new("Ada Lovelace", "Mathematics"))
        .unwrap();

    drop_schema(&mut conn).unwrap();
    assert_eq!(schema_version(&conn), 0);
    assert_eq!(table_count(&conn, "instructors"), 0);

    let err = InstructorService::new(&conn).list().unwrap_err();
    assert!(matches!(err, RepoError::UninitializedConnection { .. }));

    init_schema(&mut conn).unwrap();
    assert_eq!(InstructorService::new(&conn).count().unwrap(), 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_count(conn: &Connection, table_name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [table_name],
        |row| row.get(0),
    )
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_eq!(
        table_count(conn, table_name),
        1,
        "expected table `{table_name}` to exist"
    );
}
