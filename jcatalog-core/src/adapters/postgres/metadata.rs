//! PostgreSQL catalog queries.
//!
//! Queries read `pg_catalog` directly and cast identifiers to `text` so the
//! rows decode as plain strings. Each function materializes its rows before
//! returning.

use crate::Result;
use crate::adapters::helpers::{RowExt, map_query_error};
use crate::adapters::{ColumnRow, ImportedKeyRow, PrimaryKeyRow, TableRow};
use sqlx::PgPool;

pub(super) async fn current_database(pool: &PgPool) -> Result<Option<String>> {
    let name: Option<String> = sqlx::query_scalar("SELECT current_database()::text")
        .fetch_one(pool)
        .await
        .map_err(|e| {
            map_query_error(e, "current_database()", "Failed to read catalog name".to_string())
        })?;

    Ok(name)
}

/// Schema names in name order. TOAST and other sessions' temporary schemas
/// are never listed.
pub(super) async fn list_schemas(pool: &PgPool) -> Result<Vec<String>> {
    let query = r#"
        SELECT n.nspname::text AS schema_name
        FROM pg_catalog.pg_namespace n
        WHERE n.nspname <> 'pg_toast'
        AND n.nspname !~ '^pg_toast_temp_'
        AND (n.nspname !~ '^pg_temp_' OR n.oid = pg_catalog.pg_my_temp_schema())
        ORDER BY n.nspname
    "#;

    let rows = sqlx::query(query).fetch_all(pool).await.map_err(|e| {
        map_query_error(e, "pg_catalog.pg_namespace", "Failed to list schemas".to_string())
    })?;

    let mut schemas = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.get_field("schema_name", None)?;
        schemas.push(name);
    }

    Ok(schemas)
}

/// Ordinary and partitioned tables of one schema, with their comments.
pub(super) async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<TableRow>> {
    let query = r#"
        SELECT
            c.relname::text AS table_name,
            pg_catalog.obj_description(c.oid, 'pg_class') AS remarks
        FROM pg_catalog.pg_class c
        JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1
        AND c.relkind IN ('r', 'p')
        ORDER BY c.relname
    "#;

    let rows = sqlx::query(query)
        .bind(schema)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            map_query_error(
                e,
                &format!("schema '{}'", schema),
                format!("Failed to list tables in schema '{}'", schema),
            )
        })?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        tables.push(TableRow {
            name: row.get_field("table_name", None)?,
            remarks: row.get_field("remarks", None)?,
        });
    }

    Ok(tables)
}

/// Columns in ordinal order.
///
/// `column_size` is the character length for string types, the precision
/// for numeric and temporal types, and NULL otherwise.
pub(super) async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<ColumnRow>> {
    let query = r#"
        SELECT
            a.attname::text AS column_name,
            t.typname::text AS type_name,
            COALESCE(
                information_schema._pg_char_max_length(
                    information_schema._pg_truetypid(a.*, t.*),
                    information_schema._pg_truetypmod(a.*, t.*)),
                information_schema._pg_numeric_precision(
                    information_schema._pg_truetypid(a.*, t.*),
                    information_schema._pg_truetypmod(a.*, t.*)),
                information_schema._pg_datetime_precision(
                    information_schema._pg_truetypid(a.*, t.*),
                    information_schema._pg_truetypmod(a.*, t.*))
            )::int4 AS column_size,
            CASE WHEN a.attnotnull OR (t.typtype = 'd' AND t.typnotnull)
                THEN 'NO' ELSE 'YES' END AS is_nullable,
            pg_catalog.pg_get_expr(d.adbin, d.adrelid) AS column_default,
            pg_catalog.col_description(c.oid, a.attnum) AS remarks
        FROM pg_catalog.pg_attribute a
        JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
        JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_catalog.pg_type t ON t.oid = a.atttypid
        LEFT JOIN pg_catalog.pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
        WHERE n.nspname = $1
        AND c.relname = $2
        AND a.attnum > 0
        AND NOT a.attisdropped
        ORDER BY a.attnum
    "#;

    let rows = sqlx::query(query)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            map_query_error(
                e,
                &format!("table '{}.{}'", schema, table),
                format!("Failed to list columns for table '{}.{}'", schema, table),
            )
        })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        columns.push(ColumnRow {
            name: row.get_field("column_name", Some(table))?,
            type_name: row.get_field("type_name", Some(table))?,
            size: row.get_field("column_size", Some(table))?,
            is_nullable: row.get_field("is_nullable", Some(table))?,
            remarks: row.get_field("remarks", Some(table))?,
            default_value: row.get_field("column_default", Some(table))?,
        });
    }

    Ok(columns)
}

/// Primary key columns with their 1-based key position.
pub(super) async fn list_primary_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<PrimaryKeyRow>> {
    let query = r#"
        SELECT
            a.attname::text AS column_name,
            array_position(con.conkey, a.attnum)::int4 AS key_seq
        FROM pg_catalog.pg_constraint con
        JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
        JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = ANY(con.conkey)
        WHERE con.contype = 'p'
        AND n.nspname = $1
        AND c.relname = $2
        ORDER BY key_seq
    "#;

    let rows = sqlx::query(query)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            map_query_error(
                e,
                &format!("table '{}.{}'", schema, table),
                format!("Failed to read primary key for table '{}.{}'", schema, table),
            )
        })?;

    let mut keys = Vec::with_capacity(rows.len());
    for row in &rows {
        keys.push(PrimaryKeyRow {
            column: row.get_field("column_name", Some(table))?,
            key_seq: row.get_field("key_seq", Some(table))?,
        });
    }

    Ok(keys)
}

/// Foreign key column pairs declared on `table`.
///
/// Rows come ordered by referenced schema, referenced table, constraint
/// name and key position, so constraints are first seen in that order.
pub(super) async fn list_imported_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<ImportedKeyRow>> {
    let query = r#"
        SELECT
            con.conname::text AS fk_name,
            con.oid::int8 AS constraint_ordinal,
            a.attname::text AS fk_column,
            fns.nspname::text AS pk_schema,
            fcl.relname::text AS pk_table,
            fa.attname::text AS pk_column,
            array_position(con.conkey, a.attnum)::int4 AS key_seq
        FROM pg_catalog.pg_constraint con
        JOIN pg_catalog.pg_class cl ON cl.oid = con.conrelid
        JOIN pg_catalog.pg_namespace ns ON ns.oid = cl.relnamespace
        JOIN pg_catalog.pg_class fcl ON fcl.oid = con.confrelid
        JOIN pg_catalog.pg_namespace fns ON fns.oid = fcl.relnamespace
        JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = ANY(con.conkey)
        JOIN pg_catalog.pg_attribute fa ON fa.attrelid = con.confrelid AND fa.attnum = ANY(con.confkey)
        WHERE con.contype = 'f'
        AND ns.nspname = $1
        AND cl.relname = $2
        AND array_position(con.conkey, a.attnum) = array_position(con.confkey, fa.attnum)
        ORDER BY fns.nspname, fcl.relname, con.conname, key_seq
    "#;

    let rows = sqlx::query(query)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            map_query_error(
                e,
                &format!("table '{}.{}'", schema, table),
                format!("Failed to read foreign keys for table '{}.{}'", schema, table),
            )
        })?;

    let mut keys = Vec::with_capacity(rows.len());
    for row in &rows {
        keys.push(ImportedKeyRow {
            fk_name: row.get_field("fk_name", Some(table))?,
            constraint_ordinal: row.get_field("constraint_ordinal", Some(table))?,
            fk_column: row.get_field("fk_column", Some(table))?,
            pk_table: row.get_field("pk_table", Some(table))?,
            pk_schema: row.get_field("pk_schema", Some(table))?,
            pk_column: row.get_field("pk_column", Some(table))?,
            key_seq: row.get_field("key_seq", Some(table))?,
        });
    }

    Ok(keys)
}
