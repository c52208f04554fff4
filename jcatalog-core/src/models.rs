//! jcatalog document model.
//!
//! Field order in these structs is the key order of the emitted JSON, so the
//! output is stable across runs. Optional members are omitted rather than
//! written as `null`.

use serde::{Deserialize, Serialize};

/// Database engines a metadata source can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
    PostgreSQL,
    SQLite,
    /// Pre-captured metadata held in memory
    Snapshot,
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseType::PostgreSQL => write!(f, "PostgreSQL"),
            DatabaseType::SQLite => write!(f, "SQLite"),
            DatabaseType::Snapshot => write!(f, "Snapshot"),
        }
    }
}

/// Root of a jcatalog document.
///
/// Serializes as `{ "connection": { "catalogs": [ ... ] } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JCatalog {
    pub connection: CatalogConnection,
}

/// The `connection` node; holds exactly one catalog when built by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConnection {
    pub catalogs: Vec<Catalog>,
}

/// A database catalog and its application schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    pub schemas: Vec<Schema>,
}

/// A schema that retained at least one structural table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associations: Vec<Association>,
}

/// A structural (non-junction) table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primarykey: Option<PrimaryKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreignkeys: Vec<ForeignKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

/// Column name plus its metadata bag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub metadata: ColumnMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Vendor type name, omitted when the source reports none
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub size: i32,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Primary key columns in key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub columns: Vec<PrimaryKeyColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyColumn {
    pub column: String,
    /// 1-based key sequence, written as a string in jcatalog
    #[serde(with = "position_string")]
    pub position: i32,
}

/// Foreign key constraint, possibly spanning several columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub name: String,
    pub referenced_table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_schema: Option<String>,
    pub columns: Vec<ForeignKeyColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyColumn {
    pub column: String,
    pub referenced_column: String,
    #[serde(with = "position_string")]
    pub position: i32,
}

/// Kind of relationship an association stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssociationKind {
    #[default]
    #[serde(rename = "many-to-many")]
    ManyToMany,
}

/// A junction table rewritten as a relationship between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    #[serde(rename = "type")]
    pub kind: AssociationKind,
    pub junction_table: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity2: Option<String>,
}

impl Association {
    /// Both entity ends are known
    pub fn is_complete(&self) -> bool {
        self.entity1.is_some() && self.entity2.is_some()
    }
}

impl JCatalog {
    /// Wraps a single catalog into a document
    pub fn new(catalog: Catalog) -> Self {
        Self {
            connection: CatalogConnection {
                catalogs: vec![catalog],
            },
        }
    }

    /// The document's catalog
    pub fn catalog(&self) -> Option<&Catalog> {
        self.connection.catalogs.first()
    }

    /// Number of structural tables across all schemas
    pub fn table_count(&self) -> usize {
        self.connection
            .catalogs
            .iter()
            .flat_map(|c| &c.schemas)
            .map(|s| s.tables.len())
            .sum()
    }

    /// Number of association records across all schemas
    pub fn association_count(&self) -> usize {
        self.connection
            .catalogs
            .iter()
            .flat_map(|c| &c.schemas)
            .map(|s| s.associations.len())
            .sum()
    }

    /// Finds a schema by name
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.catalog()?.schemas.iter().find(|s| s.name == name)
    }
}

impl Schema {
    /// Finds a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// jcatalog writes key positions as decimal strings.
mod position_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| D::Error::custom(format!("invalid key position '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> Table {
        Table {
            name: "customer".to_string(),
            columns: vec![Column {
                name: "id".to_string(),
                metadata: ColumnMetadata {
                    type_name: Some("int8".to_string()),
                    size: 19,
                    nullable: false,
                    annotation: None,
                    default: None,
                },
            }],
            primarykey: Some(PrimaryKey {
                columns: vec![PrimaryKeyColumn {
                    column: "id".to_string(),
                    position: 1,
                }],
            }),
            foreignkeys: Vec::new(),
            annotation: None,
        }
    }

    #[test]
    fn test_table_serializes_jcatalog_keys() {
        let value = serde_json::to_value(sample_table()).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "customer",
                "columns": [
                    {
                        "name": "id",
                        "metadata": { "type": "int8", "size": 19, "nullable": false }
                    }
                ],
                "primarykey": { "columns": [ { "column": "id", "position": "1" } ] }
            })
        );
    }

    #[test]
    fn test_key_order_is_stable() {
        let json = serde_json::to_string(&sample_table()).unwrap();
        let name = json.find("\"name\"").unwrap();
        let columns = json.find("\"columns\"").unwrap();
        let pk = json.find("\"primarykey\"").unwrap();
        assert!(name < columns && columns < pk);
    }

    #[test]
    fn test_foreign_key_uses_camel_case() {
        let fk = ForeignKey {
            name: "FK_ORDER_CUSTOMER".to_string(),
            referenced_table: "customer".to_string(),
            referenced_schema: None,
            columns: vec![ForeignKeyColumn {
                column: "customer_id".to_string(),
                referenced_column: "id".to_string(),
                position: 1,
            }],
        };

        let value = serde_json::to_value(&fk).unwrap();
        assert_eq!(value["referencedTable"], "customer");
        assert!(value.get("referencedSchema").is_none());
        assert_eq!(value["columns"][0]["referencedColumn"], "id");
        assert_eq!(value["columns"][0]["position"], "1");
    }

    #[test]
    fn test_association_serialization() {
        let association = Association {
            kind: AssociationKind::ManyToMany,
            junction_table: "mod$customer_order".to_string(),
            name: "Customer_Order".to_string(),
            entity1: Some("customer".to_string()),
            entity2: None,
        };

        let value = serde_json::to_value(&association).unwrap();
        assert_eq!(value["type"], "many-to-many");
        assert_eq!(value["junctionTable"], "mod$customer_order");
        assert!(value.get("entity2").is_none());
        assert!(!association.is_complete());
    }

    #[test]
    fn test_document_shape_and_counts() {
        let document = JCatalog::new(Catalog {
            name: "shop".to_string(),
            schemas: vec![Schema {
                name: "public".to_string(),
                tables: vec![sample_table()],
                associations: Vec::new(),
            }],
        });

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["connection"]["catalogs"][0]["name"], "shop");
        assert!(
            value["connection"]["catalogs"][0]["schemas"][0]
                .get("associations")
                .is_none()
        );
        assert_eq!(document.table_count(), 1);
        assert_eq!(document.association_count(), 0);
        assert!(document.schema("public").unwrap().table("customer").is_some());
    }

    #[test]
    fn test_position_rejects_non_numeric() {
        let result: std::result::Result<PrimaryKeyColumn, _> =
            serde_json::from_value(json!({ "column": "id", "position": "first" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_database_type_display() {
        assert_eq!(DatabaseType::PostgreSQL.to_string(), "PostgreSQL");
        assert_eq!(DatabaseType::SQLite.to_string(), "SQLite");
        assert_eq!(DatabaseType::Snapshot.to_string(), "Snapshot");
    }
}
