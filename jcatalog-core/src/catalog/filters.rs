//! System-object classification.
//!
//! All checks are case-insensitive prefix or exact matches against fixed
//! rule tables. [`NameRules::default`] carries the built-in tables; hosts can
//! extend them (for example with their own module prefixes) without touching
//! the catalog walk.

/// Schema name prefixes owned by database engines
pub const SYSTEM_SCHEMA_PREFIXES: &[&str] = &["information_schema", "pg_", "sys"];

/// Schema names owned by database engines
pub const SYSTEM_SCHEMA_NAMES: &[&str] = &["performance_schema", "mysql"];

/// Table name prefixes used by engine-internal tables
pub const SYSTEM_TABLE_PREFIXES: &[&str] = &["sys", "msrep", "dt", "$"];

/// Table name prefixes used by platform modules rather than the application
pub const VENDOR_TABLE_PREFIXES: &[&str] = &[
    "system$",
    "administration$",
    "mx",
    "deeplink$",
    "encryption$",
    "email$",
    "audittrail$",
    "modelreflection$",
    "communitycommons$",
];

/// Rule tables used to classify schema and table names.
///
/// Rules are stored lower-cased; names are lower-cased before matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRules {
    system_schema_prefixes: Vec<String>,
    system_schema_names: Vec<String>,
    system_table_prefixes: Vec<String>,
    vendor_table_prefixes: Vec<String>,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            system_schema_prefixes: lowered(SYSTEM_SCHEMA_PREFIXES),
            system_schema_names: lowered(SYSTEM_SCHEMA_NAMES),
            system_table_prefixes: lowered(SYSTEM_TABLE_PREFIXES),
            vendor_table_prefixes: lowered(VENDOR_TABLE_PREFIXES),
        }
    }
}

fn lowered(rules: &[&str]) -> Vec<String> {
    rules.iter().map(|r| r.to_lowercase()).collect()
}

fn has_prefix(name: &str, prefixes: &[String]) -> bool {
    let lower = name.to_lowercase();
    prefixes.iter().any(|p| lower.starts_with(p.as_str()))
}

impl NameRules {
    /// Adds a vendor/platform table prefix.
    pub fn with_vendor_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.vendor_table_prefixes.push(prefix.as_ref().to_lowercase());
        self
    }

    /// Adds a system schema prefix.
    pub fn with_system_schema_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.system_schema_prefixes
            .push(prefix.as_ref().to_lowercase());
        self
    }

    /// `information_schema*`, `pg_*`, `sys*`, `performance_schema`, `mysql`
    pub fn is_system_schema(&self, name: &str) -> bool {
        has_prefix(name, &self.system_schema_prefixes)
            || self
                .system_schema_names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Engine-internal tables: `sys*`, `msrep*`, `dt*`, `$*`
    pub fn is_system_table(&self, name: &str) -> bool {
        has_prefix(name, &self.system_table_prefixes)
    }

    /// Tables that belong to platform modules
    pub fn is_vendor_system_table(&self, name: &str) -> bool {
        has_prefix(name, &self.vendor_table_prefixes)
    }

    /// Whether a table is dropped when system tables are excluded.
    ///
    /// The generic check runs before the vendor check.
    pub fn excludes_table(&self, name: &str) -> bool {
        self.is_system_table(name) || self.is_vendor_system_table(name)
    }
}

/// Checks a schema name against the built-in rules
pub fn is_system_schema(name: &str) -> bool {
    NameRules::default().is_system_schema(name)
}

/// Checks a table name against the built-in engine rules
pub fn is_system_table(name: &str) -> bool {
    NameRules::default().is_system_table(name)
}

/// Checks a table name against the built-in platform-module rules
pub fn is_vendor_system_table(name: &str) -> bool {
    NameRules::default().is_vendor_system_table(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_schemas() {
        for name in [
            "information_schema",
            "INFORMATION_SCHEMA",
            "pg_catalog",
            "pg_toast",
            "sys",
            "sysadmin",
            "performance_schema",
            "MySQL",
        ] {
            assert!(is_system_schema(name), "{} should be a system schema", name);
        }

        for name in ["public", "sales", "mysql_app", "performance", "app_sys"] {
            assert!(!is_system_schema(name), "{} should be kept", name);
        }
    }

    #[test]
    fn test_system_tables() {
        for name in ["sysobjects", "SYSCOLUMNS", "msreplication", "dtproperties", "$log"] {
            assert!(is_system_table(name), "{} should be a system table", name);
        }

        for name in ["customer", "order", "mod$customer_order", "data"] {
            assert!(!is_system_table(name), "{} should be kept", name);
        }
    }

    #[test]
    fn test_vendor_tables() {
        for name in [
            "system$user",
            "System$Session",
            "administration$account",
            "mxmodelreflection",
            "deeplink$link",
            "encryption$key",
            "email$message",
            "audittrail$log",
            "modelreflection$entity",
            "communitycommons$imagecache",
        ] {
            assert!(is_vendor_system_table(name), "{} should be vendor", name);
        }

        for name in ["shop$customer", "customer", "systemlog"] {
            assert!(!is_vendor_system_table(name), "{} should be kept", name);
        }
    }

    #[test]
    fn test_excludes_table_combines_rules() {
        let rules = NameRules::default();
        assert!(rules.excludes_table("sysusers"));
        assert!(rules.excludes_table("system$user"));
        assert!(!rules.excludes_table("customer"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = NameRules::default()
            .with_vendor_prefix("Legacy$")
            .with_system_schema_prefix("cron");

        assert!(rules.is_vendor_system_table("legacy$import"));
        assert!(rules.is_system_schema("cron_jobs"));
        assert!(!NameRules::default().is_vendor_system_table("legacy$import"));
    }
}
