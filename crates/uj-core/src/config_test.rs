use super::*;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config = Config::from_yaml("{}").unwrap();
    assert_eq!(config.dialect, Dialect::DuckDb);
    assert_eq!(config.table, "SchemaVersions");
    assert_eq!(config.schema, None);
    assert_eq!(config.probe_errors, ProbeErrorPolicy::Strict);
    assert_eq!(config.database.path, ":memory:");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
dialect: sqlserver
schema: dbo
table: JournalEntries
probe_errors: lenient
database:
  path: "./target.duckdb"
targets:
  prod:
    schema: audit
    database:
      path: "/var/lib/prod.duckdb"
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.dialect, Dialect::SqlServer);
    assert_eq!(config.schema.as_deref(), Some("dbo"));
    assert_eq!(config.table, "JournalEntries");
    assert_eq!(config.probe_errors, ProbeErrorPolicy::Lenient);
    assert_eq!(config.database.path, "./target.duckdb");
    assert!(config.targets.contains_key("prod"));
}

#[test]
fn test_target_overrides() {
    let yaml = r#"
schema: base
targets:
  prod:
    schema: audit
    database:
      path: prod.duckdb
  dev: {}
"#;
    let config = Config::from_yaml(yaml).unwrap();

    let prod = config.journal_table(Some("prod")).unwrap();
    assert_eq!(prod.schema(), Some("audit"));
    assert_eq!(
        config.get_database_config(Some("prod")).unwrap().path,
        "prod.duckdb"
    );

    let dev = config.journal_table(Some("dev")).unwrap();
    assert_eq!(dev.schema(), Some("base"));
    assert_eq!(
        config.get_database_config(Some("dev")).unwrap().path,
        ":memory:"
    );
}

#[test]
fn test_unknown_target_lists_available() {
    let yaml = r#"
targets:
  dev: {}
  prod: {}
"#;
    let config = Config::from_yaml(yaml).unwrap();
    let err = config.get_database_config(Some("qa")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("[C002]"));
    assert!(msg.contains("dev, prod"));
}

#[test]
fn test_empty_table_rejected() {
    let err = Config::from_yaml("table: \"\"").unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_unknown_fields_rejected() {
    assert!(matches!(
        Config::from_yaml("tabel: typo"),
        Err(CoreError::YamlParse(_))
    ));
}

#[test]
fn test_unknown_dialect_rejected() {
    assert!(Config::from_yaml("dialect: oracle").is_err());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("upjournal.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    let mut yml = std::fs::File::create(dir.path().join("upjournal.yml")).unwrap();
    writeln!(yml, "table: FromYml").unwrap();
    let mut yaml = std::fs::File::create(dir.path().join("upjournal.yaml")).unwrap();
    writeln!(yaml, "table: FromYaml").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.table, "FromYml");
}

#[test]
fn test_load_from_dir_falls_back_to_yaml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("upjournal.yaml"), "dialect: mysql\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.dialect, Dialect::MySql);
}

#[test]
fn test_load_from_empty_dir() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("upjournal.yml"));
}
