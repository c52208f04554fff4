//! PostgreSQL metadata source.
//!
//! # Module Structure
//! - `connection`: Pool creation with per-session safety settings
//! - `metadata`: Catalog queries behind [`MetadataSource`]
//!
//! # Security Guarantees
//! - Sessions default to `default_transaction_read_only = on`
//! - Connection strings are redacted in every error message
//! - Statement and lock timeouts bound each catalog query

mod connection;
mod metadata;


use super::{ConnectionConfig, ImportedKeyRow, MetadataSource, PrimaryKeyRow, TableRow, ColumnRow};
use super::helpers::PoolOwnership;
use crate::{Result, models::DatabaseType};
use async_trait::async_trait;
use sqlx::PgPool;

/// Metadata source over a PostgreSQL connection pool
pub struct PostgresSource {
    pub(crate) pool: PgPool,
    pub(crate) config: ConnectionConfig,
    ownership: PoolOwnership,
}

impl std::fmt::Debug for PostgresSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSource")
            .field("config", &self.config)
            .field("ownership", &self.ownership)
            .field("pool_size", &self.pool.size())
            .field("pool_idle", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresSource {
    /// Wraps a pool the caller keeps ownership of.
    ///
    /// [`MetadataSource::close`] leaves a shared pool open.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            config: ConnectionConfig::default(),
            ownership: PoolOwnership::Shared,
        }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Whether `close` will shut the pool down
    pub fn owns_pool(&self) -> bool {
        self.ownership.closes_on_release()
    }
}

#[async_trait]
impl MetadataSource for PostgresSource {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::PostgreSQL
    }

    async fn test_connection(&self) -> Result<()> {
        self.check_connectivity().await
    }

    async fn catalog_name(&self) -> Result<Option<String>> {
        metadata::current_database(&self.pool).await
    }

    async fn list_schemas(&self) -> Result<Vec<String>> {
        metadata::list_schemas(&self.pool).await
    }

    async fn list_tables(&self, _catalog: &str, schema: &str) -> Result<Vec<TableRow>> {
        metadata::list_tables(&self.pool, schema).await
    }

    async fn list_columns(
        &self,
        _catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRow>> {
        metadata::list_columns(&self.pool, schema, table).await
    }

    async fn list_primary_keys(
        &self,
        _catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<PrimaryKeyRow>> {
        metadata::list_primary_keys(&self.pool, schema, table).await
    }

    async fn list_imported_keys(
        &self,
        _catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ImportedKeyRow>> {
        metadata::list_imported_keys(&self.pool, schema, table).await
    }

    async fn close(&self) -> Result<()> {
        if self.owns_pool() {
            tracing::debug!("Closing PostgreSQL connection pool");
            self.pool.close().await;
        }
        Ok(())
    }
}
