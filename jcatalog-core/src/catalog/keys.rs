//! Primary-key and foreign-key assembly.

use crate::adapters::{ImportedKeyRow, PrimaryKeyRow};
use crate::models::{ForeignKey, ForeignKeyColumn, PrimaryKey, PrimaryKeyColumn};
use std::collections::HashMap;

/// Builds a primary key from key rows, keeping source order.
///
/// Returns `None` when the table has no key columns.
pub fn primary_key_from_rows(rows: &[PrimaryKeyRow]) -> Option<PrimaryKey> {
    if rows.is_empty() {
        return None;
    }

    Some(PrimaryKey {
        columns: rows
            .iter()
            .map(|row| PrimaryKeyColumn {
                column: row.column.clone(),
                position: row.key_seq,
            })
            .collect(),
    })
}

/// Name used for a foreign key the engine did not name
pub fn synthesized_fk_name(column: &str) -> String {
    format!("FK_{}", column)
}

/// Accumulates imported-key rows into foreign keys, one per constraint.
///
/// Lives for one table; output order is the order in which constraint names
/// were first seen.
#[derive(Debug, Default)]
pub struct ForeignKeyGroups {
    keys: Vec<ForeignKey>,
    by_name: HashMap<String, usize>,
    unnamed_by_ordinal: HashMap<i64, String>,
}

impl ForeignKeyGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the constraint name a row belongs to.
    fn constraint_name(&mut self, row: &ImportedKeyRow) -> String {
        if let Some(name) = row.fk_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        match row.constraint_ordinal {
            Some(ordinal) => self
                .unnamed_by_ordinal
                .entry(ordinal)
                .or_insert_with(|| synthesized_fk_name(&row.fk_column))
                .clone(),
            None => synthesized_fk_name(&row.fk_column),
        }
    }

    /// Adds one column pair.
    ///
    /// The referenced table and schema come from the first row of each
    /// constraint.
    pub fn push(&mut self, row: &ImportedKeyRow) {
        let name = self.constraint_name(row);
        let column = ForeignKeyColumn {
            column: row.fk_column.clone(),
            referenced_column: row.pk_column.clone(),
            position: row.key_seq,
        };

        match self.by_name.get(&name) {
            Some(&index) => {
                if let Some(key) = self.keys.get_mut(index) {
                    key.columns.push(column);
                }
            }
            None => {
                self.by_name.insert(name.clone(), self.keys.len());
                self.keys.push(ForeignKey {
                    name,
                    referenced_table: row.pk_table.clone(),
                    referenced_schema: row.pk_schema.clone().filter(|s| !s.is_empty()),
                    columns: vec![column],
                });
            }
        }
    }

    /// Number of distinct constraints seen so far
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Flattens the groups in first-seen order
    pub fn into_foreign_keys(self) -> Vec<ForeignKey> {
        self.keys
    }
}

/// Groups imported-key rows into foreign keys.
pub fn group_foreign_keys(rows: &[ImportedKeyRow]) -> Vec<ForeignKey> {
    let mut groups = ForeignKeyGroups::new();
    for row in rows {
        groups.push(row);
    }
    groups.into_foreign_keys()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_preserves_order() {
        let pk = primary_key_from_rows(&[
            PrimaryKeyRow::new("id", 1),
            PrimaryKeyRow::new("version", 2),
        ])
        .unwrap();

        let columns: Vec<_> = pk
            .columns
            .iter()
            .map(|c| (c.column.as_str(), c.position))
            .collect();
        assert_eq!(columns, vec![("id", 1), ("version", 2)]);
    }

    #[test]
    fn test_primary_key_absent_without_rows() {
        assert!(primary_key_from_rows(&[]).is_none());
    }

    #[test]
    fn test_rows_sharing_a_name_coalesce() {
        let keys = group_foreign_keys(&[
            ImportedKeyRow::new("FK_ORDER_CUSTOMER", "customer_id", "customer", "id", 1),
            ImportedKeyRow::new("FK_ORDER_CUSTOMER", "customer_region", "customer", "region", 2),
        ]);

        assert_eq!(keys.len(), 1);
        let fk = &keys[0];
        assert_eq!(fk.name, "FK_ORDER_CUSTOMER");
        assert_eq!(fk.referenced_table, "customer");
        assert_eq!(fk.columns.len(), 2);
        assert_eq!(fk.columns[1].column, "customer_region");
        assert_eq!(fk.columns[1].referenced_column, "region");
        assert_eq!(fk.columns[1].position, 2);
    }

    #[test]
    fn test_first_seen_order() {
        let keys = group_foreign_keys(&[
            ImportedKeyRow::new("fk_b", "b_id", "b", "id", 1),
            ImportedKeyRow::new("fk_a", "a_id", "a", "id", 1),
            ImportedKeyRow::new("fk_b", "b_rev", "b", "rev", 2),
        ]);

        let names: Vec<_> = keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["fk_b", "fk_a"]);
        assert_eq!(keys[0].columns.len(), 2);
    }

    #[test]
    fn test_unnamed_keys_get_synthesized_names() {
        let keys = group_foreign_keys(&[
            ImportedKeyRow::unnamed("customer_id", "customer", "id", 1),
            ImportedKeyRow::new("", "product_id", "product", "id", 1),
        ]);

        let names: Vec<_> = keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["FK_customer_id", "FK_product_id"]);
    }

    #[test]
    fn test_unnamed_composite_key_stays_together_by_ordinal() {
        let keys = group_foreign_keys(&[
            ImportedKeyRow::unnamed("a_id", "a", "id", 1).with_ordinal(0),
            ImportedKeyRow::unnamed("a_rev", "a", "rev", 2).with_ordinal(0),
            ImportedKeyRow::unnamed("b_id", "b", "id", 1).with_ordinal(1),
        ]);

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].name, "FK_a_id");
        assert_eq!(keys[0].columns.len(), 2);
        assert_eq!(keys[1].name, "FK_b_id");
    }

    #[test]
    fn test_unnamed_composite_key_without_ordinal_splits() {
        let keys = group_foreign_keys(&[
            ImportedKeyRow::unnamed("a_id", "a", "id", 1),
            ImportedKeyRow::unnamed("a_rev", "a", "rev", 2),
        ]);

        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_referenced_schema_from_first_row() {
        let keys = group_foreign_keys(&[
            ImportedKeyRow::new("fk", "a_id", "a", "id", 1).with_pk_schema("sales"),
            ImportedKeyRow::new("fk", "a_rev", "a", "rev", 2).with_pk_schema("other"),
        ]);

        assert_eq!(keys[0].referenced_schema.as_deref(), Some("sales"));
    }

    #[test]
    fn test_groups_count_distinct_constraints() {
        let mut groups = ForeignKeyGroups::new();
        assert!(groups.is_empty());
        groups.push(&ImportedKeyRow::new("fk", "a_id", "a", "id", 1));
        groups.push(&ImportedKeyRow::new("fk", "a_rev", "a", "rev", 2));
        assert_eq!(groups.len(), 1);
    }
}
