//! Many-to-many junction detection and conversion.
//!
//! A table is a junction when its name looks like a module-scoped link table
//! (`module$left_right`) and it declares exactly two foreign-key constraints.
//! Column composition is not checked, so a `$`/`_` named table holding two
//! unrelated lookup references is also treated as a junction.

use crate::models::{Association, AssociationKind, ForeignKey};

/// Name contains both `$` and `_`
pub fn is_junction_name(table_name: &str) -> bool {
    table_name.contains('$') && table_name.contains('_')
}

/// Classifies a table from its name and grouped foreign keys.
///
/// A composite foreign key counts once.
pub fn is_junction(table_name: &str, foreign_keys: &[ForeignKey]) -> bool {
    is_junction_name(table_name) && foreign_keys.len() == 2
}

/// Display name for a junction table.
///
/// Takes the part after the first `$`, splits it on `_`, upper-cases the
/// first character of each segment and rejoins with `_`. Trailing empty
/// segments are dropped; leading and inner ones are kept.
///
/// ```rust
/// use jcatalog_core::catalog::junction::association_name;
///
/// assert_eq!(association_name("mymodule$customer_order"), "Customer_Order");
/// assert_eq!(association_name("mod$a_b"), "A_B");
/// ```
pub fn association_name(table_name: &str) -> String {
    let local = table_name
        .split_once('$')
        .map_or(table_name, |(_, rest)| rest);

    let mut segments: Vec<&str> = local.split('_').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    segments
        .iter()
        .map(|segment| capitalize(segment))
        .collect::<Vec<_>>()
        .join("_")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrites a junction table as an association.
///
/// The entities are the referenced tables of the two constraints, in source
/// order; with any other constraint count they are left unset and the
/// association is reported as incomplete.
pub fn to_association(table_name: &str, foreign_keys: &[ForeignKey]) -> Association {
    let (entity1, entity2) = match foreign_keys {
        [first, second] => (
            Some(first.referenced_table.clone()),
            Some(second.referenced_table.clone()),
        ),
        _ => {
            tracing::warn!(
                "Junction table {} has {} foreign keys; association emitted without entities",
                table_name,
                foreign_keys.len()
            );
            (None, None)
        }
    };

    Association {
        kind: AssociationKind::ManyToMany,
        junction_table: table_name.to_string(),
        name: association_name(table_name),
        entity1,
        entity2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ImportedKeyRow;
    use crate::catalog::keys::group_foreign_keys;

    fn fks(targets: &[&str]) -> Vec<ForeignKey> {
        let rows: Vec<_> = targets
            .iter()
            .enumerate()
            .map(|(i, target)| {
                ImportedKeyRow::new(
                    format!("fk_{}", i),
                    format!("{}_id", target),
                    *target,
                    "id",
                    1,
                )
            })
            .collect();
        group_foreign_keys(&rows)
    }

    #[test]
    fn test_junction_name_pattern() {
        assert!(is_junction_name("mod$customer_order"));
        assert!(is_junction_name("_x$"));
        assert!(!is_junction_name("customer_order"));
        assert!(!is_junction_name("mod$customer"));
        assert!(!is_junction_name("customer"));
    }

    #[test]
    fn test_junction_requires_exactly_two_constraints() {
        assert!(is_junction("mod$a_b", &fks(&["a", "b"])));
        assert!(!is_junction("mod$a_b", &fks(&[])));
        assert!(!is_junction("mod$a_b", &fks(&["a"])));
        assert!(!is_junction("mod$a_b", &fks(&["a", "b", "c"])));
        assert!(!is_junction("a_b", &fks(&["a", "b"])));
    }

    #[test]
    fn test_composite_key_counts_once() {
        let keys = group_foreign_keys(&[
            ImportedKeyRow::new("fk_a", "a_id", "a", "id", 1),
            ImportedKeyRow::new("fk_a", "a_rev", "a", "rev", 2),
            ImportedKeyRow::new("fk_b", "b_id", "b", "id", 1),
        ]);
        assert!(is_junction("mod$a_b", &keys));
    }

    #[test]
    fn test_association_names() {
        let cases = [
            ("mymodule$customer_order", "Customer_Order"),
            ("mod$a_b", "A_B"),
            ("mod$a_", "A"),
            ("mod$a__b", "A__B"),
            ("mod$_a", "_A"),
            ("a$b$c_d", "B$c_D"),
            ("mod$éclair_tag", "Éclair_Tag"),
        ];

        for (table, expected) in cases {
            assert_eq!(association_name(table), expected, "for {}", table);
        }
    }

    #[test]
    fn test_association_entities() {
        let association = to_association("mod$customer_order", &fks(&["customer", "order"]));

        assert_eq!(association.kind, AssociationKind::ManyToMany);
        assert_eq!(association.junction_table, "mod$customer_order");
        assert_eq!(association.name, "Customer_Order");
        assert_eq!(association.entity1.as_deref(), Some("customer"));
        assert_eq!(association.entity2.as_deref(), Some("order"));
        assert!(association.is_complete());
    }

    #[test]
    fn test_self_referencing_junction() {
        let association = to_association("mod$person_friend", &fks(&["person", "person"]));
        assert_eq!(association.entity1.as_deref(), Some("person"));
        assert_eq!(association.entity2.as_deref(), Some("person"));
    }

    #[test]
    fn test_incomplete_association() {
        let association = to_association("mod$a_b", &fks(&["a"]));
        assert!(association.entity1.is_none());
        assert!(association.entity2.is_none());
        assert!(!association.is_complete());
    }
}
