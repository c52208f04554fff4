//! SQLite connection handling.
//!
//! # Connection Modes
//! - File-based: `sqlite:///path/to/database.db`, `sqlite://./relative.db`,
//!   or a bare path ending in `.db`, `.sqlite` or `.sqlite3`
//! - In-memory: `sqlite::memory:` or `:memory:`

use super::{ConnectionConfig, SqliteSource};
use crate::{Result, adapters::helpers::PoolOwnership, error::JcatalogError};
use sqlx::SqlitePool;

impl SqliteSource {
    /// Opens a database that this source owns and closes.
    ///
    /// # Errors
    /// Returns error if the connection string is malformed or the database
    /// cannot be opened (a missing file is an error in read-only mode)
    pub async fn connect(connection_string: &str, config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let pool = create_sqlite_connection(connection_string, config).await?;

        Ok(Self {
            pool,
            config: config.clone(),
            database: Some(database_name(connection_string)),
            ownership: PoolOwnership::Owned,
        })
    }
}

async fn create_sqlite_connection(
    connection_string: &str,
    config: &ConnectionConfig,
) -> Result<SqlitePool> {
    use sqlx::sqlite::SqliteConnectOptions;
    use std::str::FromStr;

    let normalized = normalize_connection_string(connection_string);

    let mut options = SqliteConnectOptions::from_str(&normalized).map_err(|e| {
        JcatalogError::configuration(format!("Invalid SQLite connection string: {}", e))
    })?;

    if config.read_only {
        options = options.read_only(true);
    }

    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
        .map_err(|e| JcatalogError::Connection {
            context: format!("Failed to open SQLite database {}", database_name(connection_string)),
            source: Box::new(e),
        })
}

/// Normalizes a connection string to SQLite URL form.
///
/// # Example
/// ```rust
/// use jcatalog_core::adapters::sqlite::normalize_connection_string;
///
/// assert_eq!(normalize_connection_string(":memory:"), "sqlite::memory:");
/// assert_eq!(normalize_connection_string("/data/shop.db"), "sqlite:///data/shop.db");
/// ```
pub fn normalize_connection_string(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        return "sqlite::memory:".to_string();
    }

    if connection_string.starts_with("sqlite:") {
        return connection_string.to_string();
    }

    format!("sqlite://{}", connection_string)
}

/// File name of the database, used only in messages.
fn database_name(connection_string: &str) -> String {
    if connection_string.contains(":memory:") {
        return ":memory:".to_string();
    }

    let path = connection_string
        .strip_prefix("sqlite:")
        .unwrap_or(connection_string);
    let path = path.split('?').next().unwrap_or(path);

    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("main")
        .to_string()
}
