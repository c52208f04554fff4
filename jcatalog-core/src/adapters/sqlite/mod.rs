//! SQLite metadata source.
//!
//! SQLite has no catalog name and no schemas: the builder falls back to its
//! configured catalog name and the `public` schema, and every table listing
//! reads the main database.
//!
//! # Module Structure
//! - `connection`: Opening databases by URL or file path
//! - `metadata`: `sqlite_master` and PRAGMA queries
//!
//! # Security Guarantees
//! - Databases are opened read-only by default
//! - No network access is involved

mod connection;
mod metadata;


use super::helpers::PoolOwnership;
use super::{ColumnRow, ConnectionConfig, ImportedKeyRow, MetadataSource, PrimaryKeyRow, TableRow};
use crate::{Result, models::DatabaseType};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub use connection::normalize_connection_string;

/// Metadata source over a SQLite database
pub struct SqliteSource {
    pub(crate) pool: SqlitePool,
    pub(crate) config: ConnectionConfig,
    /// File name of the opened database, when known
    pub(crate) database: Option<String>,
    ownership: PoolOwnership,
}

impl std::fmt::Debug for SqliteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSource")
            .field("database", &self.database)
            .field("read_only", &self.config.read_only)
            .field("ownership", &self.ownership)
            .finish()
    }
}

impl SqliteSource {
    /// Wraps a pool the caller keeps ownership of.
    ///
    /// In-memory databases live only as long as their connection, so tests
    /// and embedding hosts hand in the pool they populated.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            config: ConnectionConfig::default(),
            database: None,
            ownership: PoolOwnership::Shared,
        }
    }

    /// Whether `close` will shut the pool down
    pub fn owns_pool(&self) -> bool {
        self.ownership.closes_on_release()
    }
}

#[async_trait]
impl MetadataSource for SqliteSource {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn test_connection(&self) -> Result<()> {
        metadata::check_connectivity(&self.pool).await
    }

    async fn catalog_name(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn list_schemas(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn list_tables(&self, _catalog: &str, _schema: &str) -> Result<Vec<TableRow>> {
        metadata::list_tables(&self.pool).await
    }

    async fn list_columns(
        &self,
        _catalog: &str,
        _schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRow>> {
        metadata::list_columns(&self.pool, table).await
    }

    async fn list_primary_keys(
        &self,
        _catalog: &str,
        _schema: &str,
        table: &str,
    ) -> Result<Vec<PrimaryKeyRow>> {
        metadata::list_primary_keys(&self.pool, table).await
    }

    async fn list_imported_keys(
        &self,
        _catalog: &str,
        _schema: &str,
        table: &str,
    ) -> Result<Vec<ImportedKeyRow>> {
        metadata::list_imported_keys(&self.pool, table).await
    }

    async fn close(&self) -> Result<()> {
        if self.owns_pool() {
            tracing::debug!("Closing SQLite connection pool");
            self.pool.close().await;
        }
        Ok(())
    }
}
