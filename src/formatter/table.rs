//! Table formatting for parsed statements using tabled
//!
//! A column-list INSERT is shown as one row per assignment with the decoded
//! value type; a JSON INSERT as the target table and its payload.

use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
        width::Width,
    },
};

use crate::error::Result;
use crate::parser::{InsertStatement, Literal};

/// Maximum width for the value column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 60;

/// Table formatter for INSERT statements
pub struct TableFormatter {
    /// Maximum value column width
    max_column_width: usize,

    /// Enable colored output
    use_colors: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored header
    ///
    /// # Returns
    /// * `Self` - New table formatter
    pub fn new(use_colors: bool) -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            use_colors,
        }
    }

    /// Set maximum column width
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Format a statement as a table
    ///
    /// # Arguments
    /// * `stmt` - Parsed statement
    ///
    /// # Returns
    /// * `Result<String>` - Table followed by any trailing clauses
    pub fn format(&self, stmt: &InsertStatement) -> Result<String> {
        let mut builder = Builder::default();

        match &stmt.json_payload {
            Some(payload) if stmt.json => {
                builder.push_record(["table", "json"]);
                builder.push_record([stmt.qualified_table(), payload.clone()]);
            }
            _ => {
                builder.push_record(["column", "value", "type"]);
                for (column, token) in stmt.assignments() {
                    let literal = Literal::from_token(token)?;
                    builder.push_record([
                        column.to_string(),
                        literal.to_string(),
                        literal.type_name().to_string(),
                    ]);
                }
            }
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        let mut output = format!("{}\n{}", stmt.qualified_table(), table);
        let clauses = clauses(stmt);
        if !clauses.is_empty() {
            output.push('\n');
            output.push_str(&clauses.join(" | "));
        }

        Ok(output)
    }

    fn apply_style(&self, table: &mut Table) {
        table.with(Style::modern());
        table.modify(Columns::new(1..=1), Width::wrap(self.max_column_width));
        table.modify(Rows::first(), Alignment::center());

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }
    }
}

/// IF NOT EXISTS and USING options as display strings
fn clauses(stmt: &InsertStatement) -> Vec<String> {
    let mut clauses = Vec::new();

    if stmt.if_not_exists {
        clauses.push("IF NOT EXISTS".to_string());
    }
    if let Some(ttl) = &stmt.ttl {
        clauses.push(format!("TTL {}", ttl.text));
    }
    if let Some(timestamp) = &stmt.timestamp {
        clauses.push(format!("TIMESTAMP {}", timestamp.text));
    }

    clauses
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}
