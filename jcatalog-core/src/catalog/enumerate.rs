//! Schema and table selection.

use super::columns::non_empty;
use super::filters::NameRules;
use crate::adapters::TableRow;
use std::collections::HashSet;

/// Schema used when the source reports none, or none survive filtering
pub const FALLBACK_SCHEMA: &str = "public";

/// Picks the schemas to walk.
///
/// System schemas are dropped unless `include_system` is set. Duplicates are
/// kept once at their first position. An empty result falls back to
/// [`FALLBACK_SCHEMA`].
pub fn select_schemas(reported: Vec<String>, include_system: bool, rules: &NameRules) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut selected: Vec<String> = reported
        .into_iter()
        .filter(|name| include_system || !rules.is_system_schema(name))
        .filter(|name| seen.insert(name.clone()))
        .collect();

    if selected.is_empty() {
        tracing::debug!("No application schemas reported, using '{}'", FALLBACK_SCHEMA);
        selected.push(FALLBACK_SCHEMA.to_string());
    }

    selected
}

/// A table that survived filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    /// Remarks, only when non-empty
    pub annotation: Option<String>,
}

/// Drops system and platform-module tables unless `include_system` is set.
///
/// Returns the retained tables in listing order and the number dropped.
pub fn retain_tables(
    rows: Vec<TableRow>,
    include_system: bool,
    rules: &NameRules,
) -> (Vec<TableDescriptor>, usize) {
    let total = rows.len();
    let retained: Vec<TableDescriptor> = rows
        .into_iter()
        .filter(|row| include_system || !rules.excludes_table(&row.name))
        .map(|row| TableDescriptor {
            annotation: non_empty(row.remarks.as_deref()),
            name: row.name,
        })
        .collect();

    let filtered = total.saturating_sub(retained.len());
    (retained, filtered)
}
