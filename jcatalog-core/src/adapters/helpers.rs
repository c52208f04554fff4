//! Helper utilities for SQL metadata sources.
//!
//! Provides the row decoding and error mapping shared by the PostgreSQL and
//! SQLite sources so both report failures the same way.

use crate::{Result, error::JcatalogError};
use sqlx::Row;

/// SQLSTATE for "insufficient privilege"
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Extension trait for extracting typed values from database rows
/// with consistent error handling.
///
/// # Example
/// ```rust,ignore
/// use jcatalog_core::adapters::helpers::RowExt;
///
/// let name: String = row.get_field("column_name", Some("my_table"))?;
/// let size: Option<i32> = row.get_field("column_size", None)?;
/// ```
pub trait RowExt {
    /// Database the row belongs to
    type Db: sqlx::Database;

    /// Extracts a typed field from the row with proper error context.
    ///
    /// # Arguments
    /// * `field_name` - Name of the column to extract
    /// * `table_context` - Optional table name for error messages
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, Self::Db> + sqlx::Type<Self::Db>;
}

#[cfg(feature = "postgresql")]
impl RowExt for sqlx::postgres::PgRow {
    type Db = sqlx::Postgres;

    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, Self::Db> + sqlx::Type<Self::Db>,
    {
        self.try_get(field_name)
            .map_err(|e| JcatalogError::parse_field(field_name, table_context, e))
    }
}

#[cfg(feature = "sqlite")]
impl RowExt for sqlx::sqlite::SqliteRow {
    type Db = sqlx::Sqlite;

    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, Self::Db> + sqlx::Type<Self::Db>,
    {
        self.try_get(field_name)
            .map_err(|e| JcatalogError::parse_field(field_name, table_context, e))
    }
}

/// Maps a failed metadata query to a jcatalog error.
///
/// Permission failures become [`JcatalogError::InsufficientPrivileges`] so the
/// operator sees which catalog object was denied; everything else is a
/// metadata query failure carrying `context`.
pub fn map_query_error(error: sqlx::Error, resource: &str, context: String) -> JcatalogError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) => {
            JcatalogError::insufficient_privileges(format!(
                "Cannot access {} - insufficient privileges",
                resource
            ))
        }
        sqlx::Error::PoolTimedOut => JcatalogError::connection_failed(error),
        _ => JcatalogError::query_failed(context, error),
    }
}

/// Who closes a source's connection pool.
///
/// An owned pool was opened by the source and is closed by
/// [`MetadataSource::close`](super::MetadataSource::close); a shared pool
/// belongs to the caller and outlives the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolOwnership {
    Owned,
    Shared,
}

impl PoolOwnership {
    pub fn closes_on_release(self) -> bool {
        self == Self::Owned
    }
}

/// Splits a declared type such as `VARCHAR(255)` or `DECIMAL(10, 2)` into its
/// base name and leading size.
///
/// Types without a parenthesized size, or with an unparsable one, report no
/// size.
pub fn split_declared_type(declared: &str) -> (String, Option<i32>) {
    let declared = declared.trim();
    match declared.split_once('(') {
        Some((base, rest)) => {
            let size = rest
                .trim_end_matches(')')
                .split(',')
                .next()
                .and_then(|s| s.trim().parse::<i32>().ok());
            (base.trim().to_string(), size)
        }
        None => (declared.to_string(), None),
    }
}
