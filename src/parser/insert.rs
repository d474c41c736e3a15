//! INSERT statement parser
//!
//! The grammar is walked by a deterministic state machine. [`InsertState::next`]
//! is a pure function of the current state and one token; it says where to go
//! and which [`Effect`] to apply to the statement under construction. The
//! driver loop in [`parse_insert`] owns the mutable statement and the
//! diagnostic backlog.
//!
//! Recognized shape (after the leading `INSERT`):
//!
//! ```text
//! INTO [keyspace.]table
//!     ( '(' col [, col]* ')' VALUES '(' value [, value]* ')' | JSON 'payload' )
//!     [IF NOT EXISTS]
//!     [USING (TTL | TIMESTAMP) value [AND ...]]
//!     [;]
//! ```

use std::fmt;

use tracing::trace;

use super::lexer::{Lexer, Token, TokenKind};
use super::literal::Literal;
use crate::error::ParseError;

/// Positions in the INSERT grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertState {
    /// Initial state, expects `INTO`
    Into,
    /// Expects the first part of the table name
    TableName,
    /// Name seen; a dot makes it a keyspace
    MaybeDot,
    /// Expects the table part of `keyspace.table`
    Table,
    /// After a qualified name, either `JSON` or the column list follows
    MaybeJson,
    JsonKeyword,
    JsonString,
    NamelistOpen,
    /// First column name
    NameList,
    MoreColumns,
    /// Column name after a comma
    Column,
    NamelistClose,
    ValuesKeyword,
    ValuesListOpen,
    /// First value
    ValuesList,
    MoreValues,
    /// Value after a comma
    Value,
    ValuesListClose,
    /// Optional trailing clauses may start here
    IfNotUsing,
    IfNotExists,
    NotKeyword,
    ExistsKeyword,
    /// `IF NOT EXISTS` consumed, `USING` may still follow
    Using,
    UsingOption,
    UsingValue,
    MoreUsing,
}

/// Change applied to the statement when a transition fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Remember a name until the next token tells what it names
    Pending,
    KeyspaceFromPending,
    TableFromPending,
    SetTable,
    PushColumn,
    PushValue,
    SetJson,
    JsonPayload,
    IfNotExists,
    UsingOption,
    UsingValue,
}

/// Result of feeding one token to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Consume the token and move on
    Advance(InsertState, Effect),
    /// Move on and feed the same token again
    Reprocess(InsertState, Effect),
    /// Statement terminator in an accepting state
    Finish,
    /// No transition for this token
    Stuck,
}

/// Values accepted in a VALUES list
fn is_term(token: &Token) -> bool {
    token.kind.is_constant() || token.kind == TokenKind::QuestionMark
}

impl InsertState {
    /// Perform state transition based on current state and token
    ///
    /// Whitespace and EOF are never passed here; the driver filters them.
    pub fn next(self, token: &Token) -> Transition {
        use Effect as E;
        use InsertState::*;
        use Transition::{Advance, Finish, Reprocess, Stuck};

        match (self, token.kind) {
            (Into, _) if token.is_keyword("into") => Advance(TableName, E::None),

            (TableName, TokenKind::Identifier) => Advance(MaybeDot, E::Pending),

            (MaybeDot, TokenKind::Dot) => Advance(Table, E::KeyspaceFromPending),
            (MaybeDot, TokenKind::Keyword) => Reprocess(JsonKeyword, E::TableFromPending),
            (MaybeDot, TokenKind::Bracket) => Reprocess(NamelistOpen, E::TableFromPending),

            (Table, TokenKind::Identifier) => Advance(MaybeJson, E::SetTable),

            (MaybeJson, TokenKind::Keyword) => Reprocess(JsonKeyword, E::None),
            (MaybeJson, TokenKind::Bracket) => Reprocess(NamelistOpen, E::None),

            (JsonKeyword, _) if token.is_keyword("json") => Advance(JsonString, E::SetJson),
            (JsonString, TokenKind::String) => Advance(IfNotUsing, E::JsonPayload),

            (NamelistOpen, _) if token.is_open_bracket() => Advance(NameList, E::None),
            (NameList | Column, TokenKind::Identifier) => Advance(MoreColumns, E::PushColumn),
            (MoreColumns, TokenKind::Comma) => Advance(Column, E::None),
            (MoreColumns, TokenKind::Bracket) => Reprocess(NamelistClose, E::None),
            (NamelistClose, _) if token.is_close_bracket() => Advance(ValuesKeyword, E::None),

            (ValuesKeyword, _) if token.is_keyword("values") => Advance(ValuesListOpen, E::None),
            (ValuesListOpen, _) if token.is_open_bracket() => Advance(ValuesList, E::None),
            (ValuesList | Value, _) if is_term(token) => Advance(MoreValues, E::PushValue),
            (MoreValues, TokenKind::Comma) => Advance(Value, E::None),
            (MoreValues, TokenKind::Bracket) => Reprocess(ValuesListClose, E::None),
            (ValuesListClose, _) if token.is_close_bracket() => Advance(IfNotUsing, E::None),

            (IfNotUsing, _) if token.is_keyword("if") => Reprocess(IfNotExists, E::None),
            (IfNotUsing, _) if token.is_keyword("using") => Reprocess(Using, E::None),
            (IfNotExists, _) if token.is_keyword("if") => Advance(NotKeyword, E::None),
            (NotKeyword, _) if token.is_keyword("not") => Advance(ExistsKeyword, E::None),
            (ExistsKeyword, _) if token.is_keyword("exists") => Advance(Using, E::IfNotExists),

            (Using, _) if token.is_keyword("using") => Advance(UsingOption, E::None),
            (UsingOption, _) if token.is_keyword("ttl") || token.is_keyword("timestamp") => {
                Advance(UsingValue, E::UsingOption)
            }
            (UsingValue, TokenKind::Integer | TokenKind::QuestionMark) => {
                Advance(MoreUsing, E::UsingValue)
            }
            (MoreUsing, _) if token.is_keyword("and") => Advance(UsingOption, E::None),

            (state, TokenKind::Semicolon) if state.is_accepting() => Finish,

            _ => Stuck,
        }
    }

    /// States in which the statement may legally end
    pub fn is_accepting(self) -> bool {
        matches!(
            self,
            InsertState::IfNotUsing | InsertState::Using | InsertState::MoreUsing
        )
    }

    /// What the grammar wants next, for diagnostics
    pub fn expected(self) -> &'static str {
        use InsertState::*;

        match self {
            Into => "INTO",
            TableName | Table => "table name",
            MaybeDot => "'.', JSON or '('",
            MaybeJson => "JSON or '('",
            JsonKeyword => "JSON",
            JsonString => "JSON string",
            NamelistOpen | ValuesListOpen => "'('",
            NameList | Column => "column name",
            MoreColumns | MoreValues => "',' or ')'",
            NamelistClose | ValuesListClose => "')'",
            ValuesKeyword => "VALUES",
            ValuesList | Value => "value",
            IfNotUsing => "IF, USING or ';'",
            IfNotExists => "IF",
            NotKeyword => "NOT",
            ExistsKeyword => "EXISTS",
            Using => "USING or ';'",
            UsingOption => "TTL or TIMESTAMP",
            UsingValue => "integer or '?'",
            MoreUsing => "AND or ';'",
        }
    }
}

impl fmt::Display for InsertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Structured INSERT statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertStatement {
    pub keyspace: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    /// Value tokens exactly as typed
    pub values: Vec<Token>,
    pub json: bool,
    /// Raw string token of `JSON '...'`
    pub json_payload: Option<String>,
    pub if_not_exists: bool,
    pub ttl: Option<Token>,
    pub timestamp: Option<Token>,
}

impl InsertStatement {
    /// `keyspace.table` or just `table`
    pub fn qualified_table(&self) -> String {
        match &self.keyspace {
            Some(keyspace) => format!("{keyspace}.{}", self.table),
            None => self.table.clone(),
        }
    }

    /// Decode every value token
    pub fn literals(&self) -> Result<Vec<Literal>, ParseError> {
        self.values.iter().map(Literal::from_token).collect()
    }

    /// Column names zipped with their value tokens
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &Token)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl fmt::Display for InsertStatement {
    /// Normalized CQL text
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {}", self.qualified_table())?;

        match &self.json_payload {
            Some(payload) if self.json => write!(f, " JSON {payload}")?,
            _ => {
                let values: Vec<&str> = self.values.iter().map(|t| t.text.as_str()).collect();
                write!(
                    f,
                    " ({}) VALUES ({})",
                    self.columns.join(", "),
                    values.join(", ")
                )?;
            }
        }

        if self.if_not_exists {
            f.write_str(" IF NOT EXISTS")?;
        }

        let using: Vec<String> = [("TTL", &self.ttl), ("TIMESTAMP", &self.timestamp)]
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name} {}", v.text)))
            .collect();
        if !using.is_empty() {
            write!(f, " USING {}", using.join(" AND "))?;
        }

        f.write_str(";")
    }
}

/// How the walk over the grammar ended
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Reached the end (or `;`) in an accepting state
    Complete,
    /// Input ran out in a non-accepting state
    Incomplete(InsertState),
    /// A token had no transition
    Rejected { state: InsertState, token: Token },
}

/// Everything a parse run produced, successful or not
#[derive(Debug, Clone, PartialEq)]
pub struct InsertParse {
    pub statement: InsertStatement,
    pub outcome: ParseOutcome,
    /// Consumed non-whitespace tokens in order, including the one that stopped
    /// the walk
    pub backlog: Vec<Token>,
}

impl InsertParse {
    pub fn is_complete(&self) -> bool {
        self.outcome == ParseOutcome::Complete
    }

    /// Turn a non-complete outcome into an error
    pub fn into_result(self) -> Result<InsertStatement, ParseError> {
        match self.outcome {
            ParseOutcome::Complete => Ok(self.statement),
            ParseOutcome::Incomplete(state) => {
                Err(ParseError::Incomplete(state.expected().to_string()))
            }
            ParseOutcome::Rejected { state, token } => Err(ParseError::UnexpectedToken {
                expected: state.expected().to_string(),
                found: token.text,
            }),
        }
    }
}

/// Which USING option is waiting for its value
#[derive(Debug, Clone, Copy)]
enum UsingKind {
    Ttl,
    Timestamp,
}

/// Mutable statement under construction
#[derive(Default)]
struct Builder {
    statement: InsertStatement,
    pending: Option<String>,
    using: Option<UsingKind>,
}

impl Builder {
    fn apply(&mut self, effect: Effect, token: &Token) {
        let stmt = &mut self.statement;

        match effect {
            Effect::None => {}
            Effect::Pending => self.pending = Some(token.text.clone()),
            Effect::KeyspaceFromPending => stmt.keyspace = self.pending.take(),
            Effect::TableFromPending => stmt.table = self.pending.take().unwrap_or_default(),
            Effect::SetTable => stmt.table = token.text.clone(),
            Effect::PushColumn => stmt.columns.push(token.text.clone()),
            Effect::PushValue => stmt.values.push(token.clone()),
            Effect::SetJson => stmt.json = true,
            Effect::JsonPayload => stmt.json_payload = Some(token.text.clone()),
            Effect::IfNotExists => stmt.if_not_exists = true,
            Effect::UsingOption => {
                self.using = Some(if token.is_keyword("ttl") {
                    UsingKind::Ttl
                } else {
                    UsingKind::Timestamp
                });
            }
            Effect::UsingValue => match self.using.take() {
                Some(UsingKind::Ttl) => stmt.ttl = Some(token.clone()),
                Some(UsingKind::Timestamp) => stmt.timestamp = Some(token.clone()),
                None => {}
            },
        }
    }
}

/// Parse the remainder of an INSERT statement
///
/// The lexer must be positioned right after the `INSERT` keyword. Lexical
/// errors abort the parse; every other way of stopping is reported through
/// [`ParseOutcome`] together with whatever was built so far.
///
/// # Arguments
/// * `lexer` - Lexer positioned after `INSERT`
///
/// # Returns
/// * `Result<InsertParse, ParseError>` - Parse run or lexical error
pub fn parse_insert(lexer: &mut Lexer<'_>) -> Result<InsertParse, ParseError> {
    let mut state = InsertState::Into;
    let mut builder = Builder::default();
    let mut backlog = Vec::new();

    let outcome = loop {
        let token = lexer.next_non_ws();

        match token.kind {
            TokenKind::EOF if state.is_accepting() => break ParseOutcome::Complete,
            TokenKind::EOF => break ParseOutcome::Incomplete(state),
            TokenKind::Error => return Err(ParseError::Lexical(token.text)),
            _ => {}
        }

        backlog.push(token.clone());

        // Lookahead states hand the same token on
        let finished = loop {
            let transition = state.next(&token);
            trace!("insert: {} on {} -> {:?}", state, token, transition);

            match transition {
                Transition::Advance(next, effect) => {
                    builder.apply(effect, &token);
                    state = next;
                    break None;
                }
                Transition::Reprocess(next, effect) => {
                    builder.apply(effect, &token);
                    state = next;
                }
                Transition::Finish => break Some(ParseOutcome::Complete),
                Transition::Stuck => break Some(ParseOutcome::Rejected { state, token }),
            }
        };

        if let Some(outcome) = finished {
            break outcome;
        }
    };

    // Anything after the terminator is not part of this statement
    let outcome = match outcome {
        ParseOutcome::Complete => match lexer.next_non_ws() {
            trailing if trailing.is_eof() => ParseOutcome::Complete,
            trailing if trailing.kind == TokenKind::Error => {
                return Err(ParseError::Lexical(trailing.text));
            }
            trailing => {
                backlog.push(trailing.clone());
                ParseOutcome::Rejected {
                    state,
                    token: trailing,
                }
            }
        },
        other => other,
    };

    Ok(InsertParse {
        statement: builder.statement,
        outcome,
        backlog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> InsertParse {
        parse_insert(&mut Lexer::new(input)).unwrap()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_column_value_lists() {
        let result = parse(" INTO ks.tbl(col1, col2) VALUES('v', ?);");
        assert!(result.is_complete(), "{:?}", result.outcome);

        let stmt = result.statement;
        assert_eq!(stmt.keyspace.as_deref(), Some("ks"));
        assert_eq!(stmt.table, "tbl");
        assert_eq!(stmt.columns, vec!["col1", "col2"]);
        assert_eq!(texts(&stmt.values), vec!["'v'", "?"]);
        assert_eq!(stmt.values[0].kind, TokenKind::String);
        assert_eq!(stmt.values[1].kind, TokenKind::QuestionMark);
        assert!(!stmt.json);
    }

    #[test]
    fn test_json_payload() {
        let result = parse(r#"INTO tbl JSON '{"a":1}'"#);
        assert!(result.is_complete());

        let stmt = result.statement;
        assert_eq!(stmt.keyspace, None);
        assert_eq!(stmt.table, "tbl");
        assert!(stmt.json);
        assert_eq!(stmt.json_payload.as_deref(), Some(r#"'{"a":1}'"#));
        assert!(stmt.columns.is_empty());
        assert!(stmt.values.is_empty());
    }

    #[test]
    fn test_qualified_json() {
        let result = parse("into ks.tbl json '{}' if not exists;");
        assert!(result.is_complete());
        assert_eq!(result.statement.qualified_table(), "ks.tbl");
        assert!(result.statement.json);
        assert!(result.statement.if_not_exists);
    }

    #[test]
    fn test_unqualified_column_list() {
        let result = parse("INTO users (id) VALUES (1)");
        assert!(result.is_complete());
        assert_eq!(result.statement.table, "users");
        assert_eq!(result.statement.columns, vec!["id"]);
    }

    #[test]
    fn test_trailing_clauses() {
        let result = parse(
            "INTO t (a, b) VALUES (1, 0xff) IF NOT EXISTS USING TTL 86400 AND TIMESTAMP ?;",
        );
        assert!(result.is_complete(), "{:?}", result.outcome);

        let stmt = result.statement;
        assert!(stmt.if_not_exists);
        assert_eq!(stmt.ttl.map(|t| t.text).as_deref(), Some("86400"));
        assert_eq!(stmt.timestamp.map(|t| t.text).as_deref(), Some("?"));
    }

    #[test]
    fn test_using_without_if() {
        let stmt = parse("INTO t (a) VALUES (1) USING TIMESTAMP 5").statement;
        assert!(!stmt.if_not_exists);
        assert_eq!(stmt.timestamp.map(|t| t.text).as_deref(), Some("5"));
        assert_eq!(stmt.ttl, None);
    }

    #[test]
    fn test_all_value_kinds() {
        let stmt = parse(
            "INTO t (a, b, c, d, e, f, g) VALUES \
             (1, 2.5, 'x', true, 0x01, 550e8400-e29b-41d4-a716-446655440000, ?)",
        )
        .statement;

        let kinds: Vec<TokenKind> = stmt.values.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Integer,
                TokenKind::Float,
                TokenKind::String,
                TokenKind::Boolean,
                TokenKind::Blob,
                TokenKind::Uuid,
                TokenKind::QuestionMark,
            ]
        );
        assert_eq!(stmt.literals().unwrap().len(), 7);
    }

    #[test]
    fn test_truncated_is_incomplete() {
        let result = parse("INTO ks.tbl (a, b");
        assert_eq!(result.outcome, ParseOutcome::Incomplete(InsertState::MoreColumns));
        assert_eq!(result.statement.columns, vec!["a", "b"]);

        let err = result.into_result().unwrap_err();
        assert_eq!(err, ParseError::Incomplete("',' or ')'".to_string()));
    }

    #[test]
    fn test_empty_after_insert_is_incomplete() {
        assert_eq!(parse("").outcome, ParseOutcome::Incomplete(InsertState::Into));
    }

    #[test]
    fn test_stuck_is_rejected() {
        let result = parse("INTO ks.tbl (a) VALUES (now())");
        match &result.outcome {
            ParseOutcome::Rejected { state, token } => {
                assert_eq!(*state, InsertState::ValuesList);
                assert_eq!(token.text, "now");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(
            texts(&result.backlog),
            vec!["into", "ks", ".", "tbl", "(", "a", ")", "values", "(", "now"]
        );

        let err = result.into_result().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "value".to_string(),
                found: "now".to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_closing_bracket() {
        let result = parse("INTO t (a) VALUES (1(");
        assert!(matches!(
            result.outcome,
            ParseOutcome::Rejected {
                state: InsertState::ValuesListClose,
                ..
            }
        ));
    }

    #[test]
    fn test_text_after_terminator_rejected() {
        let result = parse("INTO t (a) VALUES (1); extra");
        assert!(matches!(result.outcome, ParseOutcome::Rejected { .. }));
    }

    #[test]
    fn test_lexical_error_aborts() {
        let err = parse_insert(&mut Lexer::new("INTO t (a) VALUES ('open")).unwrap_err();
        assert_eq!(err, ParseError::Lexical("'open".to_string()));
    }

    #[test]
    fn test_transitions_are_pure() {
        let into = Lexer::new("into").next_token();
        assert_eq!(
            InsertState::Into.next(&into),
            Transition::Advance(InsertState::TableName, Effect::None)
        );
        assert_eq!(InsertState::Into.next(&into), InsertState::Into.next(&into));
        assert_eq!(InsertState::TableName.next(&into), Transition::Stuck);

        let open = Lexer::new("(").next_token();
        assert_eq!(
            InsertState::MaybeDot.next(&open),
            Transition::Reprocess(InsertState::NamelistOpen, Effect::TableFromPending)
        );
    }

    #[test]
    fn test_display_normalizes() {
        let stmt = parse("into ks.t(a,b) values(1,'x') using ttl 5;").statement;
        assert_eq!(
            stmt.to_string(),
            "INSERT INTO ks.t (a, b) VALUES (1, 'x') USING TTL 5;"
        );
    }
}
