//! cqlsh - Rust Edition
//!
//! An offline CQL shell with schema-aware tab completion. Statements are
//! parsed and shown in the configured output format; keyspaces, tables and
//! columns for completion come from a TOML schema snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! cqlsh --schema schema.toml
//!
//! # One-shot
//! cqlsh parse "INSERT INTO ks.t (a) VALUES (1);"
//! cqlsh --schema schema.toml complete "insert into ks."
//! ```

use std::sync::Arc;

use cqlsh::cli::CliInterface;
use cqlsh::error::Result;
use cqlsh::repl::ReplEngine;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands or start the REPL
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    run_interactive_mode(&cli)
}

/// Run application in interactive REPL mode
fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let schema = cli.load_schema()?;
    cli.print_banner(&schema)?;

    let mut repl = ReplEngine::new(cli.config(), Arc::new(schema))?;
    repl.run()?;

    if !cli.args().quiet {
        println!("Goodbye!");
    }
    Ok(())
}

/// Initialize logging system from the effective log level
///
/// Logs go to stderr so subcommand output stays clean on stdout.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
