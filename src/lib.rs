//! CQL Shell Library
//!
//! This library provides the core of cqlsh: a CQL tokenizer, an INSERT
//! statement parser and schema-aware completion. It can be used without the
//! interactive shell to validate statements or drive completion elsewhere.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `parser`: Tokenizer and statement parsing
//! - `repl`: Interactive REPL engine and completion
//! - `schema`: Schema snapshot used for completion
//!
//! # Example
//!
//! ```
//! use cqlsh::parser::{Parser, Statement};
//! use cqlsh::repl::completion::complete;
//! use cqlsh::schema::SchemaSnapshot;
//!
//! let Statement::Insert(insert) = Parser::new()
//!     .parse("INSERT INTO store.users (id) VALUES (1);")
//!     .unwrap();
//! assert_eq!(insert.qualified_table(), "store.users");
//!
//! let schema = SchemaSnapshot::default();
//! assert_eq!(complete("ins", &schema).suffixes, vec!["ert"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod repl;
pub mod schema;

// Re-export commonly used types
pub use config::Config;
pub use error::{CqlshError, Result};
pub use formatter::Formatter;
pub use parser::{Parser, Statement};
pub use repl::ReplEngine;
pub use schema::SchemaSnapshot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
