//! SQLite catalog queries.
//!
//! # SQLite System Tables
//! - `sqlite_master`: schema definitions for all database objects
//! - `PRAGMA table_info()`: column details, including primary key position
//! - `PRAGMA foreign_key_list()`: foreign key column pairs

use crate::adapters::helpers::{RowExt, map_query_error, split_declared_type};
use crate::adapters::{ColumnRow, ImportedKeyRow, PrimaryKeyRow, TableRow};
use crate::{Result, error::JcatalogError};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;

/// Quotes a name for use inside a PRAGMA argument
fn quoted(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

pub(super) async fn check_connectivity(pool: &SqlitePool) -> Result<()> {
    let probe: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(JcatalogError::connection_failed)?;

    if probe != 1 {
        return Err(JcatalogError::configuration(
            "Basic connectivity test failed: unexpected result",
        ));
    }

    Ok(())
}

/// Base tables in name order. Engine-internal `sqlite_*` tables are never
/// listed; the prefix is compared literally since `LIKE` treats `_` as a
/// wildcard and ignores case.
pub(super) async fn list_tables(pool: &SqlitePool) -> Result<Vec<TableRow>> {
    let query = r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
        AND substr(name, 1, 7) <> 'sqlite_'
        ORDER BY name
    "#;

    let rows = sqlx::query(query).fetch_all(pool).await.map_err(|e| {
        map_query_error(e, "sqlite_master", "Failed to list tables".to_string())
    })?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.get_field("name", None)?;
        tables.push(TableRow::new(name));
    }

    Ok(tables)
}

async fn table_info(pool: &SqlitePool, table: &str) -> Result<Vec<SqliteRow>> {
    let query = format!("PRAGMA table_info({})", quoted(table));
    sqlx::query(&query)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            map_query_error(
                e,
                &format!("table '{}'", table),
                format!("Failed to read columns for table '{}'", table),
            )
        })
}

/// Columns in declaration order.
///
/// The declared type is split into name and size, so `VARCHAR(40)` reports
/// type `VARCHAR` with size 40.
pub(super) async fn list_columns(pool: &SqlitePool, table: &str) -> Result<Vec<ColumnRow>> {
    let rows = table_info(pool, table).await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.get_field("name", Some(table))?;
        let declared: Option<String> = row.get_field("type", Some(table))?;
        let notnull: i64 = row.get_field("notnull", Some(table))?;
        let default_value: Option<String> = row.get_field("dflt_value", Some(table))?;

        let (type_name, size) = split_declared_type(declared.as_deref().unwrap_or_default());

        columns.push(ColumnRow {
            name,
            type_name: Some(type_name).filter(|t| !t.is_empty()),
            size,
            is_nullable: Some(if notnull == 0 { "YES" } else { "NO" }.to_string()),
            remarks: None,
            default_value,
        });
    }

    Ok(columns)
}

/// Primary key columns ordered by key position
pub(super) async fn list_primary_keys(pool: &SqlitePool, table: &str) -> Result<Vec<PrimaryKeyRow>> {
    let rows = table_info(pool, table).await?;

    let mut keys = Vec::new();
    for row in &rows {
        let position: i32 = row.get_field("pk", Some(table))?;
        if position > 0 {
            let column: String = row.get_field("name", Some(table))?;
            keys.push(PrimaryKeyRow::new(column, position));
        }
    }
    keys.sort_by_key(|key| key.key_seq);

    Ok(keys)
}

/// Foreign key column pairs declared on `table`.
///
/// SQLite does not name constraints, so every row is unnamed and carries the
/// constraint id as its ordinal. A reference written without column names
/// targets the referenced table's primary key.
pub(super) async fn list_imported_keys(
    pool: &SqlitePool,
    table: &str,
) -> Result<Vec<ImportedKeyRow>> {
    let query = format!("PRAGMA foreign_key_list({})", quoted(table));
    let rows = sqlx::query(&query)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            map_query_error(
                e,
                &format!("table '{}'", table),
                format!("Failed to read foreign keys for table '{}'", table),
            )
        })?;

    let mut keys = Vec::with_capacity(rows.len());
    for row in &rows {
        let id: i64 = row.get_field("id", Some(table))?;
        let seq: i32 = row.get_field("seq", Some(table))?;
        let pk_table: String = row.get_field("table", Some(table))?;
        let fk_column: String = row.get_field("from", Some(table))?;
        let pk_column: Option<String> = row.get_field("to", Some(table))?;

        let pk_column = match pk_column {
            Some(column) => column,
            None => implicit_target(pool, &pk_table, seq).await?,
        };

        keys.push(
            ImportedKeyRow::unnamed(fk_column, pk_table, pk_column, seq.saturating_add(1))
                .with_ordinal(id),
        );
    }

    keys.sort_by(|a, b| {
        a.pk_table
            .cmp(&b.pk_table)
            .then(a.constraint_ordinal.cmp(&b.constraint_ordinal))
            .then(a.key_seq.cmp(&b.key_seq))
    });

    Ok(keys)
}

/// Primary key column at 0-based `seq` of the referenced table
async fn implicit_target(pool: &SqlitePool, pk_table: &str, seq: i32) -> Result<String> {
    let keys = list_primary_keys(pool, pk_table).await?;
    let index = usize::try_from(seq).unwrap_or(usize::MAX);

    keys.into_iter()
        .nth(index)
        .map(|key| key.column)
        .ok_or_else(|| {
            JcatalogError::query_failed(
                format!("Failed to resolve foreign key target in table '{}'", pk_table),
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "referenced table has no primary key column at this position",
                ),
            )
        })
}
