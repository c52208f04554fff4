//! Catalog walk and document assembly.

use super::columns::collect_columns;
use super::enumerate::{TableDescriptor, retain_tables, select_schemas};
use super::filters::NameRules;
use super::junction::{is_junction, to_association};
use super::keys::{group_foreign_keys, primary_key_from_rows};
use crate::Result;
use crate::adapters::{AssociationScope, ExportConfig, MetadataSource};
use crate::models::{Association, Catalog, JCatalog, Schema, Table};

/// What the walk did besides producing the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Schemas walked after filtering (including the fallback)
    pub schemas_walked: usize,
    /// Tables dropped by the system/vendor filters
    pub tables_filtered: usize,
    /// Tables rewritten as associations
    pub junction_tables: usize,
    /// `schema.table` names skipped because their metadata could not be read
    pub skipped_tables: Vec<String>,
    /// Associations found in schemas that never produced a structural table
    pub dropped_associations: usize,
}

/// Result of a successful walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBuild {
    pub document: JCatalog,
    pub report: BuildReport,
}

enum TableOutcome {
    Structural(Table),
    Junction(Association),
}

/// Walks a metadata source and builds a jcatalog document.
///
/// The walk is sequential: schemas, then the tables of each schema, then the
/// keys and columns of each table. Filtered tables are never queried, and
/// junction tables only have their foreign keys read.
///
/// # Example
/// ```rust
/// use jcatalog_core::adapters::{ColumnRow, MetadataSnapshot};
/// use jcatalog_core::adapters::snapshot::SnapshotTable;
/// use jcatalog_core::catalog::CatalogBuilder;
///
/// # tokio_test_block(async {
/// let snapshot = MetadataSnapshot::new().with_table(
///     "public",
///     SnapshotTable::new("customer").with_column(ColumnRow::new("id", "int8", 19, "NO")),
/// );
///
/// let build = CatalogBuilder::new().build(&snapshot).await.unwrap();
/// assert_eq!(build.document.table_count(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    include_system_tables: bool,
    catalog_fallback: String,
    association_scope: AssociationScope,
    skip_unreadable_tables: bool,
    rules: NameRules,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the catalog-related settings of an export configuration.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            include_system_tables: config.include_system_tables,
            catalog_fallback: config.catalog_fallback.clone(),
            association_scope: config.association_scope,
            skip_unreadable_tables: config.skip_unreadable_tables,
            rules: NameRules::default(),
        }
    }

    pub fn include_system_tables(mut self, include: bool) -> Self {
        self.include_system_tables = include;
        self
    }

    pub fn catalog_fallback(mut self, name: impl Into<String>) -> Self {
        self.catalog_fallback = name.into();
        self
    }

    pub fn association_scope(mut self, scope: AssociationScope) -> Self {
        self.association_scope = scope;
        self
    }

    pub fn skip_unreadable_tables(mut self, skip: bool) -> Self {
        self.skip_unreadable_tables = skip;
        self
    }

    pub fn name_rules(mut self, rules: NameRules) -> Self {
        self.rules = rules;
        self
    }

    /// Walks `source` and builds the document.
    ///
    /// # Errors
    /// Fails if the catalog, schema or table listings cannot be read. A table
    /// whose columns or keys cannot be read is skipped when
    /// `skip_unreadable_tables` is set and fails the walk otherwise.
    pub async fn build(&self, source: &dyn MetadataSource) -> Result<CatalogBuild> {
        let catalog_name = source
            .catalog_name()
            .await?
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.catalog_fallback.clone());
        tracing::info!("Catalog: {}", catalog_name);

        let schemas = select_schemas(
            source.list_schemas().await?,
            self.include_system_tables,
            &self.rules,
        );
        tracing::info!("Found {} schema(s) to process", schemas.len());

        let mut report = BuildReport::default();
        let mut assembler = DocumentAssembler::new(self.association_scope);

        for schema in &schemas {
            tracing::info!("Processing schema: {}", schema);
            report.schemas_walked = report.schemas_walked.saturating_add(1);

            let (descriptors, filtered) = retain_tables(
                source.list_tables(&catalog_name, schema).await?,
                self.include_system_tables,
                &self.rules,
            );
            report.tables_filtered = report.tables_filtered.saturating_add(filtered);

            let mut tables = Vec::new();
            let mut associations = Vec::new();

            for descriptor in &descriptors {
                match self
                    .read_table(source, &catalog_name, schema, descriptor)
                    .await
                {
                    Ok(TableOutcome::Structural(table)) => tables.push(table),
                    Ok(TableOutcome::Junction(association)) => {
                        report.junction_tables = report.junction_tables.saturating_add(1);
                        associations.push(association);
                    }
                    Err(e) if self.skip_unreadable_tables && e.is_metadata_failure() => {
                        tracing::warn!(
                            "Skipping table {}.{}: {}",
                            schema,
                            descriptor.name,
                            e
                        );
                        report
                            .skipped_tables
                            .push(format!("{}.{}", schema, descriptor.name));
                    }
                    Err(e) => return Err(e),
                }
            }

            tracing::debug!(
                "Schema {}: {} table(s), {} association(s), {} filtered",
                schema,
                tables.len(),
                associations.len(),
                filtered
            );
            assembler.add_schema(schema, tables, associations);
        }

        report.dropped_associations = assembler.dropped_associations();
        let document = assembler.finish(catalog_name);

        tracing::info!(
            "Catalog built: {} table(s), {} association(s) in {} schema(s)",
            document.table_count(),
            document.association_count(),
            document.catalog().map_or(0, |c| c.schemas.len())
        );

        Ok(CatalogBuild { document, report })
    }

    async fn read_table(
        &self,
        source: &dyn MetadataSource,
        catalog: &str,
        schema: &str,
        descriptor: &TableDescriptor,
    ) -> Result<TableOutcome> {
        let name = descriptor.name.as_str();
        tracing::debug!("Processing table: {}.{}", schema, name);

        let foreign_keys =
            group_foreign_keys(&source.list_imported_keys(catalog, schema, name).await?);

        if is_junction(name, &foreign_keys) {
            tracing::info!(
                "Detected junction table: {} (converting to association)",
                name
            );
            return Ok(TableOutcome::Junction(to_association(name, &foreign_keys)));
        }

        let columns = collect_columns(&source.list_columns(catalog, schema, name).await?);
        let primarykey =
            primary_key_from_rows(&source.list_primary_keys(catalog, schema, name).await?);

        Ok(TableOutcome::Structural(Table {
            name: name.to_string(),
            columns,
            primarykey,
            foreignkeys: foreign_keys,
            annotation: descriptor.annotation.clone(),
        }))
    }
}

/// Composes schemas, tables and associations into the final document.
///
/// Schemas without structural tables are left out. Where associations land
/// depends on the [`AssociationScope`].
#[derive(Debug)]
pub struct DocumentAssembler {
    scope: AssociationScope,
    schemas: Vec<Schema>,
    accumulated: Vec<Association>,
    attached: usize,
    dropped: usize,
}

impl DocumentAssembler {
    pub fn new(scope: AssociationScope) -> Self {
        Self {
            scope,
            schemas: Vec::new(),
            accumulated: Vec::new(),
            attached: 0,
            dropped: 0,
        }
    }

    /// Adds one walked schema with its tables and the associations its
    /// junction tables produced.
    pub fn add_schema(&mut self, name: &str, tables: Vec<Table>, associations: Vec<Association>) {
        match self.scope {
            AssociationScope::OwningSchema => {
                if tables.is_empty() {
                    if !associations.is_empty() {
                        tracing::warn!(
                            "Schema {} has no tables; dropping {} association(s)",
                            name,
                            associations.len()
                        );
                        self.dropped = self.dropped.saturating_add(associations.len());
                    }
                    return;
                }
                self.schemas.push(Schema {
                    name: name.to_string(),
                    tables,
                    associations,
                });
            }
            AssociationScope::Cumulative => {
                self.accumulated.extend(associations);
                if tables.is_empty() {
                    return;
                }
                self.attached = self.accumulated.len();
                self.schemas.push(Schema {
                    name: name.to_string(),
                    tables,
                    associations: self.accumulated.clone(),
                });
            }
        }
    }

    /// Associations that were not attached to any emitted schema
    pub fn dropped_associations(&self) -> usize {
        self.dropped
            .saturating_add(self.accumulated.len().saturating_sub(self.attached))
    }

    pub fn finish(self, catalog_name: String) -> JCatalog {
        JCatalog::new(Catalog {
            name: catalog_name,
            schemas: self.schemas,
        })
    }
}
