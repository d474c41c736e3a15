//! Command-line interface for cqlsh
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Schema snapshot selection
//! - One-shot subcommands (parse, complete, config, completion)

pub mod completion;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::Result;
use crate::formatter::Formatter;
use crate::parser::Parser as CqlParser;
use crate::repl::completion::complete;
use crate::schema::SchemaSnapshot;

/// Cassandra Query Language shell
#[derive(Parser, Debug)]
#[command(
    name = "cqlsh",
    version,
    about = "CQL shell written in Rust",
    long_about = "An offline CQL shell with schema-aware tab completion and an INSERT \
statement parser. Keyspaces, tables and columns come from a TOML schema snapshot."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Schema snapshot used for completion
    #[arg(short = 's', long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Output format (table, json, json-pretty, compact)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Do not read or write the history file
    #[arg(long = "no-history")]
    pub no_history: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for cqlsh
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Parse a statement and print it in the configured format
    Parse {
        #[arg(value_name = "STATEMENT")]
        statement: String,
    },

    /// Print completions for a partial statement, one per line
    Complete {
        #[arg(value_name = "INPUT")]
        input: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
        Self::apply_session_args(config, args);
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format_str) = &args.format {
            config.display.format = Self::parse_output_format(format_str);
        }

        if args.no_color {
            config.display.color_output = false;
            config.display.syntax_highlighting = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Apply schema and history arguments to configuration
    fn apply_session_args(config: &mut Config, args: &CliArgs) {
        if let Some(path) = &args.schema {
            config.schema.path = Some(path.clone());
        }

        if args.no_history {
            config.history.persist = false;
        }
    }

    /// Parse output format string
    fn parse_output_format(format_str: &str) -> OutputFormat {
        format_str.parse().unwrap_or_else(|_| {
            eprintln!("Warning: Unknown format '{}', using default", format_str);
            OutputFormat::Table
        })
    }

    /// Load the configured schema snapshot
    ///
    /// Without a configured path the schema is empty and completion only
    /// offers keywords.
    ///
    /// # Returns
    /// * `Result<SchemaSnapshot>` - Loaded or empty snapshot
    pub fn load_schema(&self) -> Result<SchemaSnapshot> {
        match &self.config.schema.path {
            Some(path) => SchemaSnapshot::load(path),
            None => Ok(SchemaSnapshot::default()),
        }
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Parse { statement }) => {
                println!("{}", self.render_parse(statement)?);
                Ok(true)
            }
            Some(Commands::Complete { input }) => {
                let schema = self.load_schema()?;
                for line in self.render_complete(input, &schema) {
                    println!("{}", line);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Parse a statement and format it with the display settings
    fn render_parse(&self, statement: &str) -> Result<String> {
        let parsed = CqlParser::new().parse(statement)?;
        Formatter::from_config(&self.config.display).format(&parsed)
    }

    /// Completion lines for the `complete` subcommand
    fn render_complete(&self, input: &str, schema: &SchemaSnapshot) -> Vec<String> {
        let completions = complete(input, schema);
        if let Some(err) = &completions.degraded {
            eprintln!("Warning: {}", err);
        }
        completions.suffixes
    }

    /// Show version information
    fn show_version(&self) {
        println!("cqlsh version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml_string()?);

        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print the startup banner for a loaded schema
    pub fn print_banner(&self, schema: &SchemaSnapshot) -> Result<()> {
        if !self.args.quiet {
            println!("{}", schema.cluster.banner()?);
            println!("Use HELP for help.");
        }
        Ok(())
    }
}
