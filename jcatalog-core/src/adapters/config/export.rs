//! Export configuration.
//!
//! This module provides the `ExportConfig` struct controlling how a catalog
//! is built from metadata and where the resulting document is written.

use super::ConnectionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default output file name
pub const DEFAULT_OUTPUT_PATH: &str = "mendix_metadata.jcatalog";

/// Catalog name used when the source reports none
pub const DEFAULT_CATALOG_NAME: &str = "default";

/// Catalog name used by hosts that embed the exporter
pub const EMBEDDED_CATALOG_NAME: &str = "mendix";

/// Which schemas receive a detected association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationScope {
    /// Attach each association to the schema whose table listing produced
    /// its junction table
    #[default]
    OwningSchema,
    /// Accumulate associations across the run; every emitted schema carries
    /// all associations detected up to and including itself
    Cumulative,
}

/// Configuration for one export run.
///
/// # Security
/// Credentials are never stored here; they are merged into the connection
/// URL immediately before the source is opened.
///
/// # Example
/// ```rust
/// use jcatalog_core::adapters::ExportConfig;
/// use std::time::Duration;
///
/// let config = ExportConfig::new()
///     .with_output_path("shop.jcatalog")
///     .with_system_tables(true)
///     .with_deadline(Duration::from_secs(60));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.catalog_fallback, "default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Connection settings for sources opened by the exporter
    pub connection: ConnectionConfig,
    /// Where the jcatalog document is written
    pub output_path: PathBuf,
    /// Keep system schemas and system/vendor tables
    pub include_system_tables: bool,
    /// Catalog name when the source reports none
    pub catalog_fallback: String,
    /// Association attachment policy
    pub association_scope: AssociationScope,
    /// Skip a table whose columns or keys cannot be read instead of failing
    pub skip_unreadable_tables: bool,
    /// Upper bound on the whole metadata walk
    pub deadline: Option<Duration>,
    /// Validate the document before writing it
    pub validate_output: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            include_system_tables: false,
            catalog_fallback: DEFAULT_CATALOG_NAME.to_string(),
            association_scope: AssociationScope::default(),
            skip_unreadable_tables: true,
            deadline: None,
            validate_output: true,
        }
    }
}

impl ExportConfig {
    /// Creates an export configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration used when the exporter runs inside a host application
    /// that already owns the connection.
    pub fn embedded() -> Self {
        Self {
            catalog_fallback: EMBEDDED_CATALOG_NAME.to_string(),
            ..Self::default()
        }
    }

    /// Validates the export configuration.
    ///
    /// # Errors
    /// Returns error if configuration values are invalid
    pub fn validate(&self) -> crate::Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(crate::error::JcatalogError::configuration(
                "output_path cannot be empty",
            ));
        }

        if self.catalog_fallback.trim().is_empty() {
            return Err(crate::error::JcatalogError::configuration(
                "catalog_fallback cannot be empty",
            ));
        }

        if self.deadline.is_some_and(|d| d.is_zero()) {
            return Err(crate::error::JcatalogError::configuration(
                "deadline must be greater than 0",
            ));
        }

        self.connection.validate()?;

        Ok(())
    }

    /// Builder method to set the output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Builder method to include system schemas and tables.
    pub fn with_system_tables(mut self, include: bool) -> Self {
        self.include_system_tables = include;
        self
    }

    /// Builder method to set the fallback catalog name.
    pub fn with_catalog_fallback(mut self, name: impl Into<String>) -> Self {
        self.catalog_fallback = name.into();
        self
    }

    /// Builder method to set the association attachment policy.
    pub fn with_association_scope(mut self, scope: AssociationScope) -> Self {
        self.association_scope = scope;
        self
    }

    /// Builder method to control per-table fault isolation.
    pub fn with_skip_unreadable_tables(mut self, skip: bool) -> Self {
        self.skip_unreadable_tables = skip;
        self
    }

    /// Builder method to bound the metadata walk.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder method to toggle output validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_output = validate;
        self
    }

    /// Builder method to set connection settings.
    pub fn with_connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = connection;
        self
    }
}
