//! Command-line tests for jcatalog-export.
//!
//! Argument parsing is checked through `Cli::try_parse_from`; export runs go
//! through `run` against temporary SQLite files.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use clap::Parser;
use jcatalog_core::{AssociationScope, JcatalogError};
use jcatalog_export::{Cli, ScopeArg, parse_flag, run};
use std::path::Path;
use std::time::Duration;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["jcatalog-export"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("arguments should parse")
}

async fn create_shop_db(path: &Path) {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    for statement in [
        "CREATE TABLE customer (id INTEGER NOT NULL PRIMARY KEY, name VARCHAR(200))",
        "CREATE TABLE product (id INTEGER NOT NULL PRIMARY KEY, sku VARCHAR(32) NOT NULL)",
        "CREATE TABLE \"mod$customer_product\" (
            customer_id INTEGER NOT NULL REFERENCES customer (id),
            product_id INTEGER NOT NULL REFERENCES product (id)
        )",
    ] {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }

    pool.close().await;
}

#[test]
fn test_positional_arguments() {
    let cli = parse(&["jdbc:postgresql://localhost/mendix", "postgres", "secret", "out.jcatalog"]);

    assert_eq!(cli.endpoint, "jdbc:postgresql://localhost/mendix");
    assert_eq!(cli.username, "postgres");
    assert_eq!(cli.password, "secret");
    assert_eq!(cli.output, Path::new("out.jcatalog"));
    assert!(!cli.include_system_tables);
    assert_eq!(cli.global.verbose, 0);
    assert!(!cli.global.quiet);
}

#[test]
fn test_include_system_tables_is_lenient() {
    let args = ["sqlite:///tmp/a.db", "", "", "a.jcatalog"];

    for (value, expected) in [("true", true), ("TRUE", true), ("True", true), ("false", false), ("yes", false), ("1", false)] {
        let mut with_flag = args.to_vec();
        with_flag.push(value);
        assert_eq!(parse(&with_flag).include_system_tables, expected, "value {value:?}");
    }

    assert_eq!(parse_flag(" true "), Ok(true));
}

#[test]
fn test_missing_positionals_are_rejected() {
    let result = Cli::try_parse_from(["jcatalog-export", "postgres://localhost/db", "user", "pw"]);
    assert!(result.is_err());

    let result = Cli::try_parse_from(["jcatalog-export"]);
    assert!(result.is_err());
}

#[test]
fn test_export_config_defaults() {
    let cli = parse(&["sqlite:///tmp/a.db", "", "", "a.jcatalog"]);
    let config = cli.export_config();

    assert_eq!(config.output_path, Path::new("a.jcatalog"));
    assert_eq!(config.catalog_fallback, "default");
    assert_eq!(config.association_scope, AssociationScope::OwningSchema);
    assert!(config.skip_unreadable_tables);
    assert!(config.validate_output);
    assert!(config.deadline.is_none());
    assert_eq!(config.connection.query_timeout, Duration::from_secs(30));
    assert!(config.connection.read_only);
}

#[test]
fn test_export_config_options() {
    let cli = parse(&[
        "-vv",
        "--deadline-secs",
        "90",
        "--connect-timeout-secs",
        "5",
        "--query-timeout-secs",
        "12",
        "--catalog-fallback",
        "mendix",
        "--association-scope",
        "cumulative",
        "--strict",
        "--skip-validation",
        "sqlite:///tmp/a.db",
        "",
        "",
        "a.jcatalog",
        "true",
    ]);
    assert_eq!(cli.global.verbose, 2);
    assert_eq!(cli.export.association_scope, ScopeArg::Cumulative);

    let config = cli.export_config();
    assert!(config.include_system_tables);
    assert_eq!(config.catalog_fallback, "mendix");
    assert_eq!(config.association_scope, AssociationScope::Cumulative);
    assert!(!config.skip_unreadable_tables);
    assert!(!config.validate_output);
    assert_eq!(config.deadline, Some(Duration::from_secs(90)));
    assert_eq!(config.connection.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.connection.query_timeout, Duration::from_secs(12));
}

#[test]
fn test_unknown_scope_is_rejected() {
    let result = Cli::try_parse_from([
        "jcatalog-export",
        "--association-scope",
        "everywhere",
        "sqlite:///tmp/a.db",
        "",
        "",
        "a.jcatalog",
    ]);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_exports_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop.db");
    let out_path = dir.path().join("shop.jcatalog");
    create_shop_db(&db_path).await;

    let endpoint = format!("jdbc:sqlite://{}", db_path.display());
    // Credentials have nowhere to go in a SQLite URL and are ignored
    let cli = parse(&[endpoint.as_str(), "reader", "secret", out_path.to_str().unwrap()]);

    let summary = run(&cli).await.unwrap();
    assert_eq!(summary.tables, 2);
    assert_eq!(summary.associations, 1);
    assert_eq!(
        summary.success_message(),
        format!("Successfully exported metadata to: {}", out_path.display())
    );

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("\n    \"connection\""));
    assert!(!written.contains("secret"));

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    let schema = &value["connection"]["catalogs"][0]["schemas"][0];
    assert_eq!(value["connection"]["catalogs"][0]["name"], "default");
    assert_eq!(schema["name"], "public");
    assert_eq!(schema["associations"][0]["name"], "Customer_Product");
}

#[tokio::test]
async fn test_run_rejects_unknown_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("never.jcatalog");
    let cli = parse(&["jdbc:mysql://localhost:3306/mendix", "root", "secret", out_path.to_str().unwrap()]);

    let err = run(&cli).await.unwrap_err();
    assert!(matches!(err, JcatalogError::Configuration { .. }));
    assert!(!err.to_string().contains("secret"));
    assert!(!out_path.exists());
}

#[tokio::test]
async fn test_run_rejects_zero_query_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop.db");
    let out_path = dir.path().join("never.jcatalog");
    create_shop_db(&db_path).await;

    let cli = parse(&[
        "--query-timeout-secs",
        "0",
        db_path.to_str().unwrap(),
        "",
        "",
        out_path.to_str().unwrap(),
    ]);

    let err = run(&cli).await.unwrap_err();
    assert!(matches!(err, JcatalogError::Configuration { .. }));
    assert!(!out_path.exists());
}

#[tokio::test]
async fn test_run_missing_database_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("absent.db");
    let out_path = dir.path().join("never.jcatalog");
    let cli = parse(&[db_path.to_str().unwrap(), "", "", out_path.to_str().unwrap()]);

    assert!(run(&cli).await.is_err());
    assert!(!out_path.exists());
    assert!(!db_path.exists());
}

#[tokio::test]
async fn test_run_unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop.db");
    let out_path = dir.path().join("missing").join("shop.jcatalog");
    create_shop_db(&db_path).await;

    let cli = parse(&[db_path.to_str().unwrap(), "", "", out_path.to_str().unwrap()]);

    let err = run(&cli).await.unwrap_err();
    assert!(matches!(err, JcatalogError::OutputWrite { .. }));
}
