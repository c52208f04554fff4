//! Raw metadata rows as returned by a [`MetadataSource`](super::MetadataSource).
//!
//! These mirror the columns of the classic relational metadata result sets
//! (`TABLE_NAME`/`REMARKS`, `COLUMN_NAME`/`TYPE_NAME`/`COLUMN_SIZE`/...,
//! `KEY_SEQ`, `FK_NAME`/`PKTABLE_NAME`/...). Values are kept exactly as the
//! engine reported them; interpretation happens in the catalog stages.

use serde::{Deserialize, Serialize};

/// One base table in a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub name: String,
    /// Vendor remarks / table comment
    #[serde(default)]
    pub remarks: Option<String>,
}

impl TableRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// One column of a table, in catalog-reported order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub name: String,
    #[serde(default)]
    pub type_name: Option<String>,
    /// Declared size; `None` when the engine reports no size
    #[serde(default)]
    pub size: Option<i32>,
    /// Vendor nullability flag, usually `"YES"`, `"NO"` or empty
    #[serde(default)]
    pub is_nullable: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl ColumnRow {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        size: i32,
        is_nullable: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            size: Some(size),
            is_nullable: Some(is_nullable.into()),
            remarks: None,
            default_value: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

/// One primary-key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    pub column: String,
    /// 1-based position within the key
    pub key_seq: i32,
}

impl PrimaryKeyRow {
    pub fn new(column: impl Into<String>, key_seq: i32) -> Self {
        Self {
            column: column.into(),
            key_seq,
        }
    }
}

/// One column pair of a foreign key declared on the table being inspected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedKeyRow {
    /// Constraint name; absent or empty for engines that do not name FKs
    #[serde(default)]
    pub fk_name: Option<String>,
    /// Engine-local identity of an unnamed constraint (e.g. SQLite's
    /// `foreign_key_list.id`), used to keep composite unnamed keys together
    #[serde(default)]
    pub constraint_ordinal: Option<i64>,
    pub fk_column: String,
    pub pk_table: String,
    #[serde(default)]
    pub pk_schema: Option<String>,
    pub pk_column: String,
    /// 1-based position within the key
    pub key_seq: i32,
}

impl ImportedKeyRow {
    pub fn new(
        fk_name: impl Into<String>,
        fk_column: impl Into<String>,
        pk_table: impl Into<String>,
        pk_column: impl Into<String>,
        key_seq: i32,
    ) -> Self {
        Self {
            fk_name: Some(fk_name.into()),
            constraint_ordinal: None,
            fk_column: fk_column.into(),
            pk_table: pk_table.into(),
            pk_schema: None,
            pk_column: pk_column.into(),
            key_seq,
        }
    }

    /// A row for a constraint the engine did not name
    pub fn unnamed(
        fk_column: impl Into<String>,
        pk_table: impl Into<String>,
        pk_column: impl Into<String>,
        key_seq: i32,
    ) -> Self {
        Self {
            fk_name: None,
            ..Self::new(String::new(), fk_column, pk_table, pk_column, key_seq)
        }
    }

    pub fn with_pk_schema(mut self, schema: impl Into<String>) -> Self {
        self.pk_schema = Some(schema.into());
        self
    }

    pub fn with_ordinal(mut self, ordinal: i64) -> Self {
        self.constraint_ordinal = Some(ordinal);
        self
    }
}
