//! Output formatting for parsed statements
//!
//! This module renders a parsed statement in the configured format:
//! - Table of column/value pairs
//! - JSON (plain and pretty-printed)
//! - Compact normalized CQL on one line

mod table;

pub use table::TableFormatter;

use serde_json::{Map, Value, json};

use crate::config::{DisplayConfig, OutputFormat};
use crate::error::{CqlshError, Result};
use crate::parser::{InsertStatement, Statement};

/// Main formatter for parsed statements
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            use_colors,
        }
    }

    /// Create a formatter from display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format, config.color_output)
    }

    /// Format a statement according to the configured format
    ///
    /// # Arguments
    /// * `statement` - Parsed statement
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output or error
    pub fn format(&self, statement: &Statement) -> Result<String> {
        let Statement::Insert(insert) = statement;

        match self.format_type {
            OutputFormat::Table => TableFormatter::new(self.use_colors).format(insert),
            OutputFormat::Json => to_json(insert).map(|v| v.to_string()),
            OutputFormat::JsonPretty => {
                let value = to_json(insert)?;
                serde_json::to_string_pretty(&value)
                    .map_err(|e| CqlshError::Generic(format!("JSON format error: {e}")))
            }
            OutputFormat::Compact => Ok(insert.to_string()),
        }
    }
}

/// JSON view of an INSERT statement with decoded values
pub fn to_json(stmt: &InsertStatement) -> Result<Value> {
    let values = stmt
        .literals()?
        .iter()
        .map(|literal| literal.to_json())
        .collect::<Vec<_>>();

    let token_text = |token: &Option<crate::parser::Token>| token.as_ref().map(|t| t.text.clone());

    let mut object = Map::new();
    object.insert("statement".into(), json!("insert"));
    object.insert("keyspace".into(), json!(stmt.keyspace));
    object.insert("table".into(), json!(stmt.table));
    object.insert("json".into(), json!(stmt.json));
    if let Some(payload) = &stmt.json_payload {
        object.insert("payload".into(), json!(payload));
    }
    object.insert("columns".into(), json!(stmt.columns));
    object.insert("values".into(), Value::Array(values));
    object.insert("if_not_exists".into(), json!(stmt.if_not_exists));
    object.insert("ttl".into(), json!(token_text(&stmt.ttl)));
    object.insert("timestamp".into(), json!(token_text(&stmt.timestamp)));

    Ok(Value::Object(object))
}
