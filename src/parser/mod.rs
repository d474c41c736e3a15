//! CQL statement parser
//!
//! Text is tokenized by [`Lexer`] and the first keyword picks the statement
//! form. Only INSERT has a grammar; the other data statements are recognized
//! so they can be reported as unsupported rather than as syntax errors.
//!
//! # Architecture
//!
//! - `lexer`: Tokenizer producing typed [`Token`]s
//! - `insert`: State machine for INSERT statements
//! - `literal`: Typed values decoded from constant tokens
//!
//! # Examples
//!
//! ```
//! use cqlsh::parser::{Parser, Statement};
//!
//! let parser = Parser::new();
//! let Statement::Insert(insert) = parser
//!     .parse("INSERT INTO ks.users (id, name) VALUES (1, 'ann');")
//!     .unwrap();
//!
//! assert_eq!(insert.keyspace.as_deref(), Some("ks"));
//! assert_eq!(insert.columns, vec!["id", "name"]);
//! ```

pub mod insert;
pub mod lexer;
pub mod literal;

pub use insert::{InsertParse, InsertState, InsertStatement, ParseOutcome, parse_insert};
pub use lexer::{Lexer, Token, TokenKind};
pub use literal::Literal;

use crate::error::{ParseError, Result};

/// Statement keywords offered for the first word of a line
pub const STATEMENT_KEYWORDS: &[&str] = &["insert", "select", "update", "delete"];

/// A parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(InsertStatement),
}

/// Statement dispatcher
#[derive(Debug, Default, Clone)]
pub struct Parser {}

impl Parser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {}
    }

    /// Parse an input string into a Statement
    ///
    /// Truncated statements and tokens the grammar cannot place are errors
    /// here. Use [`Parser::inspect`] to get the partial result instead.
    ///
    /// # Arguments
    ///
    /// * `input` - The statement text
    ///
    /// # Returns
    ///
    /// * `Result<Statement>` - The parsed statement or an error
    pub fn parse(&self, input: &str) -> Result<Statement> {
        let parse = self.inspect(input)?;
        Ok(Statement::Insert(parse.into_result()?))
    }

    /// Run the INSERT state machine and keep the partial result
    ///
    /// Only the statement keyword and lexical errors fail this call; how the
    /// grammar walk ended is reported in [`InsertParse::outcome`].
    pub fn inspect(&self, input: &str) -> std::result::Result<InsertParse, ParseError> {
        let mut lexer = Lexer::new(input);
        let first = lexer.next_non_ws();

        match first.kind {
            TokenKind::EOF => Err(ParseError::Empty),
            TokenKind::Error => Err(ParseError::Lexical(first.text)),
            _ if first.is_keyword("insert") => parse_insert(&mut lexer),
            TokenKind::Keyword if STATEMENT_KEYWORDS.contains(&first.text.as_str()) => {
                Err(ParseError::Unsupported(first.text.to_uppercase()))
            }
            _ => Err(ParseError::UnexpectedToken {
                expected: "statement keyword".to_string(),
                found: first.text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CqlshError;

    #[test]
    fn test_parse_insert() {
        let parser = Parser::new();
        let Statement::Insert(stmt) = parser
            .parse(" INSERT INTO ks.tbl(col1, col2) VALUES('v', ?);")
            .unwrap();

        assert_eq!(stmt.keyspace.as_deref(), Some("ks"));
        assert_eq!(stmt.table, "tbl");
        assert_eq!(stmt.columns, vec!["col1", "col2"]);
        assert_eq!(stmt.values.len(), 2);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let parser = Parser::new();
        assert!(parser.parse("insert into t (a) values (1)").is_ok());
        assert!(parser.parse("InSeRt InTo t (a) VaLuEs (1)").is_ok());
    }

    #[test]
    fn test_empty_input() {
        let err = Parser::new().inspect("   ").unwrap_err();
        assert_eq!(err, ParseError::Empty);
    }

    #[test]
    fn test_unsupported_statement() {
        let err = Parser::new().parse("select * from t").unwrap_err();
        assert!(matches!(
            err,
            CqlshError::Parse(ParseError::Unsupported(ref kind)) if kind == "SELECT"
        ));
    }

    #[test]
    fn test_unknown_first_word() {
        let err = Parser::new().inspect("hello world").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "statement keyword".to_string(),
                found: "hello".to_string(),
            }
        );
    }

    #[test]
    fn test_strict_rejects_truncated() {
        let parser = Parser::new();
        let err = parser.parse("INSERT INTO ks.tbl (a").unwrap_err();
        assert!(matches!(err, CqlshError::Parse(ParseError::Incomplete(_))));

        let partial = parser.inspect("INSERT INTO ks.tbl (a").unwrap();
        assert_eq!(partial.outcome, ParseOutcome::Incomplete(InsertState::MoreColumns));
        assert_eq!(partial.statement.columns, vec!["a"]);
    }

    #[test]
    fn test_lexical_error_first() {
        let err = Parser::new().inspect("@").unwrap_err();
        assert_eq!(err, ParseError::Lexical("@".to_string()));
    }
}
