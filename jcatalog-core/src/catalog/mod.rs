//! Metadata-to-catalog transformation.
//!
//! The walk runs in stages over metadata already fetched from a
//! [`MetadataSource`](crate::adapters::MetadataSource):
//!
//! 1. `enumerate` picks schemas and tables, applying `filters`
//! 2. `junction` decides, per table, structural table or many-to-many link
//! 3. `columns` and `keys` assemble structural tables
//! 4. `junction` rewrites link tables as associations
//! 5. `builder` composes the document
//!
//! Everything except [`CatalogBuilder::build`] is a pure function and can be
//! tested without a source.

pub mod builder;
pub mod columns;
pub mod enumerate;
pub mod filters;
pub mod junction;
pub mod keys;

pub use builder::{BuildReport, CatalogBuild, CatalogBuilder, DocumentAssembler};
pub use enumerate::{FALLBACK_SCHEMA, TableDescriptor};
pub use filters::NameRules;
