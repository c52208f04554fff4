//! Column metadata assembly.

use crate::adapters::ColumnRow;
use crate::models::{Column, ColumnMetadata};

/// Converts one column row.
///
/// Nullability is the vendor flag compared to `"YES"` ignoring case; blank
/// remarks and defaults are dropped; a missing size reads as `0`.
pub fn column_from_row(row: &ColumnRow) -> Column {
    Column {
        name: row.name.clone(),
        metadata: ColumnMetadata {
            type_name: row.type_name.clone(),
            size: row.size.unwrap_or(0),
            nullable: row
                .is_nullable
                .as_deref()
                .is_some_and(|flag| flag.eq_ignore_ascii_case("YES")),
            annotation: non_empty(row.remarks.as_deref()),
            default: non_empty(row.default_value.as_deref()),
        },
    }
}

/// Converts column rows in catalog order, without reordering or dedup.
pub fn collect_columns(rows: &[ColumnRow]) -> Vec<Column> {
    rows.iter().map(column_from_row).collect()
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
