use super::*;
use std::sync::Arc;
use tempfile::TempDir;

fn with_session<T>(
    db: &DuckDbConnectionManager,
    action: impl FnOnce(&dyn Session) -> DbResult<T>,
) -> T {
    db.execute_with_managed_connection(action).unwrap()
}

#[test]
fn test_in_memory() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[test]
fn test_new_handles_memory_path() {
    let db = DuckDbConnectionManager::new(":memory:").unwrap();
    let one = with_session(&db, |s| s.query_scalar("SELECT 1", &[]));
    assert_eq!(one, Some(1));
}

#[test]
fn test_execute_with_params() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let affected = with_session(&db, |s| {
        s.execute_batch("CREATE TABLE t (name VARCHAR, n BIGINT)")?;
        s.execute(
            "INSERT INTO t VALUES (?, ?), (?, ?)",
            &["a".into(), SqlParam::Int(1), "b".into(), SqlParam::Int(2)],
        )
    });
    assert_eq!(affected, 2);

    let total = with_session(&db, |s| s.query_scalar("SELECT SUM(n) FROM t", &[]));
    assert_eq!(total, Some(3));
}

#[test]
fn test_query_column_keeps_query_order() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let names = with_session(&db, |s| {
        s.execute_batch(
            "CREATE TABLE t (name VARCHAR); INSERT INTO t VALUES ('b'), ('c'), ('a');",
        )?;
        s.query_column("SELECT name FROM t WHERE name <> ? ORDER BY name", &["c".into()])
    });
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_query_scalar_null_and_empty() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let (max, none) = with_session(&db, |s| {
        s.execute_batch("CREATE TABLE t (n INTEGER)")?;
        let max = s.query_scalar("SELECT MAX(n) FROM t", &[])?;
        let none = s.query_scalar("SELECT n FROM t", &[])?;
        Ok((max, none))
    });
    assert_eq!(max, None);
    assert_eq!(none, None);
}

#[test]
fn test_query_scalar_widens_integer_column() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let max = with_session(&db, |s| {
        s.execute_batch("CREATE TABLE t (n INTEGER); INSERT INTO t VALUES (4), (9);")?;
        s.query_scalar("SELECT COALESCE(MAX(n), 0) FROM t", &[])
    });
    assert_eq!(max, Some(9));
}

#[test]
fn test_query_rows_as_strings() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let rows = with_session(&db, |s| {
        s.execute_batch(
            "CREATE TABLE t (id BIGINT, name VARCHAR, note VARCHAR);
             INSERT INTO t VALUES (1, 'one', NULL), (2, 'two', 'x');",
        )?;
        s.query_rows("SELECT id, name, note FROM t ORDER BY id", &[])
    });
    assert_eq!(
        rows,
        vec![
            vec!["1".to_string(), "one".to_string(), "null".to_string()],
            vec!["2".to_string(), "two".to_string(), "x".to_string()],
        ]
    );
}

#[test]
fn test_timestamp_param_round_trips_through_cast() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let applied = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_micro_opt(8, 15, 30, 250_000)
        .unwrap();
    let text = with_session(&db, |s| {
        s.execute_batch("CREATE TABLE t (applied TIMESTAMP)")?;
        s.execute(
            "INSERT INTO t VALUES (CAST(? AS TIMESTAMP))",
            &[SqlParam::Timestamp(applied)],
        )?;
        s.query_column("SELECT CAST(applied AS VARCHAR) FROM t", &[])
    });
    assert_eq!(text.len(), 1);
    assert!(text[0].starts_with("2024-03-09 08:15:30.25"), "got {}", text[0]);
}

#[test]
fn test_probe_counts() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let (found, missing) = with_session(&db, |s| {
        s.execute_batch("CREATE TABLE present (id INTEGER)")?;
        let sql = "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?";
        Ok((
            s.probe(sql, &["present".into()])?,
            s.probe(sql, &["absent".into()])?,
        ))
    });
    assert!(found);
    assert!(!missing);
}

#[test]
fn test_probe_folds_missing_table() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let found = with_session(&db, |s| s.probe("SELECT COUNT(*) FROM no_such_table", &[]));
    assert!(!found);
}

#[test]
fn test_probe_propagates_other_errors() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let result = db.execute_with_managed_connection(|s| s.probe("SELEC nonsense", &[]));
    assert!(matches!(result, Err(DbError::ExecutionError(_))));
}

#[test]
fn test_missing_table_is_classified() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let err = db
        .execute_with_managed_connection(|s| s.query_column("SELECT x FROM missing", &[]))
        .unwrap_err();
    assert!(err.is_object_not_found(), "unexpected: {err}");
}

#[test]
fn test_duplicate_table_is_not_classified_as_missing() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    with_session(&db, |s| s.execute_batch("CREATE TABLE dup (x INTEGER)"));
    let err = db
        .execute_with_managed_connection(|s| s.execute_batch("CREATE TABLE dup (x INTEGER)"))
        .unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)), "unexpected: {err}");
    assert!(!err.is_object_not_found());
}

#[test]
fn test_missing_column_is_classified() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    with_session(&db, |s| s.execute_batch("CREATE TABLE t (x INTEGER)"));
    let err = db
        .execute_with_managed_connection(|s| s.query_column("SELECT y FROM t", &[]))
        .unwrap_err();
    assert!(err.is_object_not_found(), "unexpected: {err}");
}

#[test]
fn test_connection_released_after_error() {
    let db = DuckDbConnectionManager::in_memory().unwrap();
    let failed = db.execute_with_managed_connection(|s| s.execute_batch("NOT SQL"));
    assert!(failed.is_err());

    let one = with_session(&db, |s| s.query_scalar("SELECT 1", &[]));
    assert_eq!(one, Some(1));
}

fn table_count<C: ConnectionManager>(manager: C, table: &str) -> Option<i64> {
    manager
        .execute_with_managed_connection(|s| {
            s.query_scalar(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                &[table.into()],
            )
        })
        .unwrap()
}

#[test]
fn test_shared_manager() {
    let db = Arc::new(DuckDbConnectionManager::in_memory().unwrap());
    let shared = Arc::clone(&db);
    shared
        .execute_with_managed_connection(|s| s.execute_batch("CREATE TABLE t (id INTEGER)"))
        .unwrap();
    assert_eq!(shared.db_type(), "duckdb");

    assert_eq!(table_count(&*db, "t"), Some(1));
    assert_eq!(table_count(shared, "t"), Some(1));
}

#[test]
fn test_file_backed_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.duckdb");

    {
        let db = DuckDbConnectionManager::from_path(&path).unwrap();
        with_session(&db, |s| {
            s.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (42);")
        });
    }

    let config = DatabaseConfig {
        path: path.display().to_string(),
    };
    let db = DuckDbConnectionManager::from_config(&config).unwrap();
    let value = with_session(&db, |s| s.query_scalar("SELECT id FROM t", &[]));
    assert_eq!(value, Some(42));
}
