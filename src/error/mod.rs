//! Error handling module for cqlsh.
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! [`CqlshError`] wraps the more specific kinds:
//! - [`ParseError`] for tokenizing and statement parsing
//! - [`SchemaError`] for schema snapshot lookups
//! - [`ConfigError`] for configuration loading and validation
//!
//! # Example
//!
//! ```rust
//! use cqlsh::error::{ParseError, Result};
//!
//! fn check(text: &str) -> Result<()> {
//!     if text.trim().is_empty() {
//!         return Err(ParseError::Empty.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("  ").is_err());
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, CqlshError, ParseError, Result, SchemaError};
