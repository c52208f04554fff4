//! Database metadata exporter.
//!
//! Connects to a database, reads its catalog metadata and writes it as a
//! jcatalog document. Diagnostics go to stderr; stdout carries only the
//! success line.
//!
//! # Security Guarantees
//! - Read-only database sessions
//! - No credentials stored or logged
//! - Credential-bearing URLs in metadata reported before the output is written

use clap::Parser;
use clap::error::ErrorKind;
use jcatalog_core::{init_logging, initialize_schema_validator};
use jcatalog_export::{Cli, run};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage errors share the exit code of every other failure
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = initialize_schema_validator() {
        error!("Failed to initialize schema validator: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match run(&cli).await {
        Ok(summary) => println!("{}", summary.success_message()),
        Err(e) => {
            error!("Export failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
