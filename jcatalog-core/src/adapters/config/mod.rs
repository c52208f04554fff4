//! Configuration types for metadata sources and export runs.
//!
//! - `ConnectionConfig`: session settings for sources the exporter opens
//! - `ExportConfig`: catalog build and output settings
//!
//! # Security
//! These configuration structs intentionally do NOT store passwords or credentials.
//! Credentials must be handled separately through the security module.

mod connection;
mod export;

pub use connection::ConnectionConfig;
pub use export::{
    AssociationScope, DEFAULT_CATALOG_NAME, DEFAULT_OUTPUT_PATH, EMBEDDED_CATALOG_NAME,
    ExportConfig,
};
