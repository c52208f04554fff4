//! In-memory metadata source.
//!
//! A [`MetadataSnapshot`] holds metadata captured earlier (or written by
//! hand) and answers catalog queries from memory. It is what the exporter's
//! tests build catalogs from, and it can be loaded from a JSON fixture so a
//! catalog can be regenerated without a database.

use super::{ColumnRow, ImportedKeyRow, MetadataSource, PrimaryKeyRow, TableRow};
use crate::{Result, error::JcatalogError, models::DatabaseType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Captured metadata for a whole catalog.
///
/// # Example
/// ```rust
/// use jcatalog_core::adapters::{ColumnRow, MetadataSnapshot, PrimaryKeyRow};
/// use jcatalog_core::adapters::snapshot::SnapshotTable;
///
/// let snapshot = MetadataSnapshot::new()
///     .with_catalog("shop")
///     .with_table(
///         "public",
///         SnapshotTable::new("customer")
///             .with_column(ColumnRow::new("id", "int8", 19, "NO"))
///             .with_primary_key(PrimaryKeyRow::new("id", 1)),
///     );
///
/// assert_eq!(snapshot.table_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    #[serde(default)]
    pub catalog: Option<String>,
    /// When false, `list_schemas` reports nothing (like engines without
    /// schemas) while tables stay reachable by schema name
    #[serde(default = "default_true")]
    pub reports_schemas: bool,
    #[serde(default)]
    pub schemas: Vec<SnapshotSchema>,
}

/// One schema and its base tables, in listing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSchema {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<SnapshotTable>,
}

/// One table's listing row plus its column and key rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTable {
    #[serde(flatten)]
    pub table: TableRow,
    #[serde(default)]
    pub columns: Vec<ColumnRow>,
    #[serde(default)]
    pub primary_keys: Vec<PrimaryKeyRow>,
    #[serde(default)]
    pub imported_keys: Vec<ImportedKeyRow>,
}

fn default_true() -> bool {
    true
}

impl Default for MetadataSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: TableRow::new(name),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            imported_keys: Vec::new(),
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.table.remarks = Some(remarks.into());
        self
    }

    pub fn with_column(mut self, column: ColumnRow) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_primary_key(mut self, key: PrimaryKeyRow) -> Self {
        self.primary_keys.push(key);
        self
    }

    pub fn with_imported_key(mut self, key: ImportedKeyRow) -> Self {
        self.imported_keys.push(key);
        self
    }
}

impl MetadataSnapshot {
    pub fn new() -> Self {
        Self {
            catalog: None,
            reports_schemas: true,
            schemas: Vec::new(),
        }
    }

    /// Loads a snapshot from its JSON form.
    ///
    /// # Errors
    /// Returns a serialization error if the JSON does not describe a snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| JcatalogError::Serialization {
            context: "Failed to parse metadata snapshot".to_string(),
            source: e,
        })
    }

    pub fn with_catalog(mut self, name: impl Into<String>) -> Self {
        self.catalog = Some(name.into());
        self
    }

    /// Hides the schema list, as engines without schemas do.
    pub fn without_schema_listing(mut self) -> Self {
        self.reports_schemas = false;
        self
    }

    /// Adds an empty schema, or leaves an existing one untouched.
    pub fn with_schema(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.schemas.iter().any(|s| s.name == name) {
            self.schemas.push(SnapshotSchema {
                name,
                tables: Vec::new(),
            });
        }
        self
    }

    /// Appends a table to a schema, creating the schema on first use.
    pub fn with_table(mut self, schema: impl Into<String>, table: SnapshotTable) -> Self {
        let schema = schema.into();
        match self.schemas.iter_mut().find(|s| s.name == schema) {
            Some(existing) => existing.tables.push(table),
            None => self.schemas.push(SnapshotSchema {
                name: schema,
                tables: vec![table],
            }),
        }
        self
    }

    /// Total number of tables across schemas
    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables.len()).sum()
    }

    fn find_table(&self, schema: &str, table: &str) -> Option<&SnapshotTable> {
        self.schemas
            .iter()
            .filter(|s| s.name == schema)
            .flat_map(|s| &s.tables)
            .find(|t| t.table.name == table)
    }
}

#[async_trait]
impl MetadataSource for MetadataSnapshot {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Snapshot
    }

    async fn catalog_name(&self) -> Result<Option<String>> {
        Ok(self.catalog.clone())
    }

    async fn list_schemas(&self) -> Result<Vec<String>> {
        if !self.reports_schemas {
            return Ok(Vec::new());
        }
        Ok(self.schemas.iter().map(|s| s.name.clone()).collect())
    }

    async fn list_tables(&self, _catalog: &str, schema: &str) -> Result<Vec<TableRow>> {
        Ok(self
            .schemas
            .iter()
            .filter(|s| s.name == schema)
            .flat_map(|s| &s.tables)
            .map(|t| t.table.clone())
            .collect())
    }

    async fn list_columns(
        &self,
        _catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRow>> {
        Ok(self
            .find_table(schema, table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    async fn list_primary_keys(
        &self,
        _catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<PrimaryKeyRow>> {
        Ok(self
            .find_table(schema, table)
            .map(|t| t.primary_keys.clone())
            .unwrap_or_default())
    }

    async fn list_imported_keys(
        &self,
        _catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ImportedKeyRow>> {
        Ok(self
            .find_table(schema, table)
            .map(|t| t.imported_keys.clone())
            .unwrap_or_default())
    }
}
