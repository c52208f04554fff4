//! Library side of the `jcatalog-export` binary.
//!
//! Argument parsing and the export run live here so tests can drive them
//! without spawning a process. `main.rs` only wires logging and exit codes.

use clap::{Args, Parser, ValueEnum};
use jcatalog_core::{
    AssociationScope, ConnectionConfig, ExportConfig, ExportSummary, Result,
    adapters::{create_source, detect_database_type, normalize_endpoint},
    export_catalog,
    models::DatabaseType,
    security::{Credentials, parse_connection_string},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Command-line interface for a single export run.
#[derive(Debug, Parser)]
#[command(name = "jcatalog-export")]
#[command(about = "Export database metadata as a jcatalog document")]
#[command(version)]
#[command(long_about = "
jcatalog-export - Read relational metadata and write a jcatalog document

Lists schemas, base tables, columns, primary keys and foreign keys, then
writes them as pretty-printed JSON. Tables named mod$<a>_<b> that hold
exactly two foreign keys are written as many-to-many associations.

SECURITY FEATURES:
- Sessions are opened read-only
- Credentials are merged into the URL in memory and never logged
- Credential-bearing URLs found in metadata are reported as warnings

SUPPORTED DATABASES:
- PostgreSQL (postgres://, postgresql://, jdbc:postgresql://)
- SQLite (sqlite:// or .db/.sqlite files)

EXAMPLES:
  jcatalog-export jdbc:postgresql://localhost:5432/mendix postgres secret mendix.jcatalog false
  jcatalog-export sqlite:///var/data/app.db \"\" \"\" app.jcatalog true
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Database endpoint, optionally `jdbc:`-prefixed
    pub endpoint: String,

    /// Username merged into the endpoint (empty keeps the URL's own)
    pub username: String,

    /// Password merged into the endpoint (empty keeps the URL's own)
    pub password: String,

    /// Output file path
    pub output: PathBuf,

    /// Include system schemas and vendor tables ("true" or "false")
    #[arg(value_parser = parse_flag, action = clap::ArgAction::Set, default_value = "false")]
    pub include_system_tables: bool,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Logging options.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Tuning options that have no positional counterpart.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Abort the metadata build after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub deadline_secs: Option<u64>,

    /// How long to wait for a database connection
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub connect_timeout_secs: u64,

    /// Per-statement timeout for catalog queries
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub query_timeout_secs: u64,

    /// Catalog name used when the database reports none
    #[arg(long, default_value = jcatalog_core::adapters::DEFAULT_CATALOG_NAME)]
    pub catalog_fallback: String,

    /// Which schemas receive a detected association
    #[arg(long, value_enum, default_value_t = ScopeArg::OwningSchema)]
    pub association_scope: ScopeArg,

    /// Fail the run when one table's metadata cannot be read
    #[arg(long)]
    pub strict: bool,

    /// Write the document without the output checks
    #[arg(long)]
    pub skip_validation: bool,
}

/// CLI spelling of [`AssociationScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Only the schema that lists the junction table
    OwningSchema,
    /// Every schema from the junction's schema onwards
    Cumulative,
}

impl From<ScopeArg> for AssociationScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::OwningSchema => AssociationScope::OwningSchema,
            ScopeArg::Cumulative => AssociationScope::Cumulative,
        }
    }
}

/// Lenient boolean: `true` in any letter case is true, everything else false.
pub fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

impl Cli {
    /// Builds the export configuration from the parsed arguments.
    pub fn export_config(&self) -> ExportConfig {
        let connection = ConnectionConfig::new()
            .with_connect_timeout(Duration::from_secs(self.export.connect_timeout_secs))
            .with_query_timeout(Duration::from_secs(self.export.query_timeout_secs));

        let mut config = ExportConfig::new()
            .with_connection(connection)
            .with_output_path(&self.output)
            .with_system_tables(self.include_system_tables)
            .with_catalog_fallback(self.export.catalog_fallback.clone())
            .with_association_scope(self.export.association_scope.into())
            .with_skip_unreadable_tables(!self.export.strict)
            .with_validation(!self.export.skip_validation);

        if let Some(secs) = self.export.deadline_secs {
            config = config.with_deadline(Duration::from_secs(secs));
        }

        config
    }
}

/// Runs one export: opens the source, builds the catalog, writes the file.
///
/// # Errors
/// Returns error if the endpoint is invalid, the database cannot be reached,
/// the build fails, or the output cannot be written. The source is released
/// in every case.
pub async fn run(cli: &Cli) -> Result<ExportSummary> {
    let endpoint = normalize_endpoint(&cli.endpoint);
    let database_type = detect_database_type(endpoint)?;

    let credentials = Credentials::from_parts(&cli.username, &cli.password);
    let url = credentials.apply_to_url(endpoint)?;

    let config = cli.export_config();
    match database_type {
        DatabaseType::PostgreSQL => {
            let (info, _) = parse_connection_string(&url)?;
            info!("Connecting to database: {}", info.to_safe_string());
        }
        _ => info!("Opening database: {}", endpoint),
    }

    let source = create_source(&url, &config.connection).await?;

    if let Err(e) = source.test_connection().await {
        if let Err(close_err) = source.close().await {
            warn!("Failed to close connection: {}", close_err);
        }
        return Err(e);
    }
    info!("Connected successfully");

    export_catalog(source.as_ref(), &config).await
}
