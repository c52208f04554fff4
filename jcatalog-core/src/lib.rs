//! Core library for jcatalog export.
//!
//! Reads relational catalog metadata (schemas, base tables, columns, primary
//! and foreign keys) through a [`MetadataSource`] and transforms it into a
//! jcatalog document. Tables that only link two other tables are emitted as
//! many-to-many associations instead of tables.
//!
//! # Security Guarantees
//! - Sessions are opened read-only where the engine supports it
//! - Credentials live in `Zeroizing` containers and never reach logs
//! - Credential-bearing URLs found in metadata are reported before the document is written
//!
//! # Example
//! ```rust
//! use jcatalog_core::{CatalogBuilder, MetadataSnapshot};
//! use jcatalog_core::adapters::{ColumnRow, snapshot::SnapshotTable};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let snapshot = MetadataSnapshot::new().with_catalog("shop").with_table(
//!     "public",
//!     SnapshotTable::new("customer").with_column(ColumnRow::new("id", "int8", 19, "NO")),
//! );
//!
//! let build = CatalogBuilder::new().build(&snapshot).await.unwrap();
//! assert_eq!(build.document.table_count(), 1);
//! # });
//! ```

pub mod adapters;
pub mod catalog;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod security;
pub mod validation;

// Re-export commonly used types
pub use adapters::{
    AssociationScope, ConnectionConfig, ExportConfig, MetadataSnapshot, MetadataSource,
    create_source,
};
pub use catalog::{BuildReport, CatalogBuild, CatalogBuilder};
pub use error::{JcatalogError, Result};
pub use export::{ExportSummary, export_catalog, render_document};
pub use logging::init_logging;
pub use models::{
    Association, AssociationKind, Catalog, Column, ColumnMetadata, DatabaseType, ForeignKey,
    ForeignKeyColumn, JCatalog, PrimaryKey, PrimaryKeyColumn, Schema, Table,
};
pub use security::Credentials;
pub use validation::{ValidationError, initialize_schema_validator, validate_catalog_output};
