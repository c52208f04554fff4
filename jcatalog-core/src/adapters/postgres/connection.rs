//! PostgreSQL connection pool management and validation.
//!
//! # Security Features
//! - Validates connection string format before any network activity
//! - Applies read-only and timeout settings to every pooled session
//! - Redacts credentials from all errors

use super::{ConnectionConfig, PostgresSource};
use crate::{Result, adapters::helpers::PoolOwnership, error::JcatalogError};
use sqlx::PgPool;
use url::Url;

impl PostgresSource {
    /// Opens a pool that this source owns and closes.
    ///
    /// The pool connects lazily; the first catalog query (or
    /// [`test_connection`](crate::adapters::MetadataSource::test_connection))
    /// surfaces authentication failures.
    ///
    /// # Errors
    /// Returns error if the connection string or configuration is invalid,
    /// or the pool cannot be created
    pub async fn connect(connection_string: &str, config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        Self::validate_connection_string(connection_string)?;

        let pool = Self::create_connection_pool(connection_string, config)?;

        Ok(Self {
            pool,
            config: config.clone(),
            ownership: PoolOwnership::Owned,
        })
    }

    /// Creates a connection pool whose sessions carry the safety settings
    ///
    /// Every new connection gets, via `after_connect`:
    /// - `statement_timeout` from the configured query timeout
    /// - lock and idle-in-transaction timeouts
    /// - an `application_name` for server-side tracking
    /// - `default_transaction_read_only = on` unless read-only is disabled
    fn create_connection_pool(connection_string: &str, config: &ConnectionConfig) -> Result<PgPool> {
        use sqlx::Executor;

        let query_timeout_secs = config.query_timeout.as_secs().max(1);
        let read_only = config.read_only;

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections.min(100))
            .acquire_timeout(config.connect_timeout)
            .test_before_acquire(true)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute(
                        format!("SET statement_timeout = '{}s'", query_timeout_secs).as_str(),
                    )
                    .await?;
                    conn.execute("SET lock_timeout = '30s'").await?;
                    conn.execute("SET idle_in_transaction_session_timeout = '60s'")
                        .await?;

                    let app_name = format!("jcatalog-export-{}", env!("CARGO_PKG_VERSION"));
                    conn.execute(format!("SET application_name = '{}'", app_name).as_str())
                        .await?;

                    if read_only {
                        conn.execute("SET default_transaction_read_only = on")
                            .await?;
                    }

                    Ok(())
                })
            })
            .connect_lazy(connection_string)
            .map_err(|e| JcatalogError::Connection {
                context: format!(
                    "Failed to create PostgreSQL connection pool to {}",
                    crate::adapters::redact_database_url(connection_string)
                ),
                source: Box::new(e),
            })
    }

    /// Validates connection string format
    ///
    /// # Errors
    /// Returns error if the URL does not parse, uses another scheme, or has
    /// no host
    pub fn validate_connection_string(connection_string: &str) -> Result<()> {
        let url = Url::parse(connection_string).map_err(|e| {
            JcatalogError::configuration(format!(
                "Invalid PostgreSQL connection string format: {}",
                e
            ))
        })?;

        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(JcatalogError::configuration(
                "Connection string must use postgres:// or postgresql:// scheme",
            ));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(JcatalogError::configuration(
                "Connection string must specify a host",
            ));
        }

        Ok(())
    }

    /// Runs a trivial query and checks catalog visibility.
    pub(crate) async fn check_connectivity(&self) -> Result<()> {
        let probe: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(JcatalogError::connection_failed)?;

        if probe != 1 {
            return Err(JcatalogError::configuration(
                "Basic connectivity test failed: unexpected result",
            ));
        }

        let visible: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pg_catalog.pg_namespace")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                crate::adapters::helpers::map_query_error(
                    e,
                    "pg_catalog.pg_namespace",
                    "Failed to read schema catalog".to_string(),
                )
            })?;

        if visible == 0 {
            return Err(JcatalogError::insufficient_privileges(
                "No schemas visible in pg_catalog.pg_namespace",
            ));
        }

        tracing::debug!("PostgreSQL session verified; {} schema(s) visible", visible);
        Ok(())
    }
}
