//! Typed values for constant tokens
//!
//! The parser keeps value tokens as they were typed. [`Literal`] is the
//! decoded form used when a statement is rendered or inspected.

use std::fmt;

use serde_json::{Number, Value};
use uuid::Uuid;

use super::lexer::{Token, TokenKind};
use crate::error::ParseError;

/// Decoded constant from a VALUES list or USING clause
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
    Uuid(Uuid),
    /// Bind marker `?`
    Placeholder,
}

impl Literal {
    /// Decode a constant or placeholder token
    ///
    /// # Arguments
    /// * `token` - Token produced by the lexer
    ///
    /// # Returns
    /// * `Result<Self, ParseError>` - The typed value, or an error when the
    ///   token is not a value or its text does not fit the target type
    pub fn from_token(token: &Token) -> Result<Self, ParseError> {
        let invalid = |expected: &str| ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: token.text.clone(),
        };

        match token.kind {
            TokenKind::Integer => token
                .text
                .parse()
                .map(Literal::Int)
                .map_err(|_| invalid("64-bit integer")),
            TokenKind::Float => token
                .text
                .parse()
                .map(Literal::Float)
                .map_err(|_| invalid("float")),
            TokenKind::String => Ok(Literal::Text(unquote(&token.text, '\''))),
            TokenKind::Boolean => Ok(Literal::Boolean(token.text.eq_ignore_ascii_case("true"))),
            TokenKind::Blob => hex::decode(&token.text[2..])
                .map(Literal::Blob)
                .map_err(|_| invalid("even number of hex digits")),
            TokenKind::Uuid => Uuid::parse_str(&token.text)
                .map(Literal::Uuid)
                .map_err(|_| invalid("uuid")),
            TokenKind::QuestionMark => Ok(Literal::Placeholder),
            _ => Err(invalid("value")),
        }
    }

    /// Name of the CQL type family
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "bigint",
            Literal::Float(_) => "double",
            Literal::Text(_) => "text",
            Literal::Boolean(_) => "boolean",
            Literal::Blob(_) => "blob",
            Literal::Uuid(_) => "uuid",
            Literal::Placeholder => "?",
        }
    }

    /// JSON view, blobs as `0x` hex strings and non-finite floats as strings
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Int(n) => Value::from(*n),
            Literal::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string())),
            Literal::Text(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Blob(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
            Literal::Uuid(id) => Value::String(id.to_string()),
            Literal::Placeholder => Value::Null,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(v) if v.is_nan() => f.write_str("NaN"),
            Literal::Float(v) if v.is_infinite() => f.write_str("Infinity"),
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Blob(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Literal::Uuid(id) => write!(f, "{id}"),
            Literal::Placeholder => f.write_str("?"),
        }
    }
}

/// Strip surrounding quotes and collapse doubled quotes
///
/// Text that is not wrapped in `quote` is returned unchanged.
pub fn unquote(text: &str, quote: char) -> String {
    let inner = text
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote));

    match inner {
        Some(inner) => {
            let doubled: String = [quote, quote].iter().collect();
            inner.replace(&doubled, &quote.to_string())
        }
        None => text.to_string(),
    }
}

/// Name of an identifier as CQL resolves it
///
/// Quoted identifiers keep their case, unquoted ones fold to lower case.
pub fn identifier_name(text: &str) -> String {
    if text.starts_with('"') {
        unquote(text, '"')
    } else {
        text.to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn literal(input: &str) -> Result<Literal, ParseError> {
        Literal::from_token(&Lexer::new(input).next_token())
    }

    #[test]
    fn test_numbers() {
        assert_eq!(literal("42").unwrap(), Literal::Int(42));
        assert_eq!(literal("-1").unwrap(), Literal::Int(-1));
        assert_eq!(literal("1.5").unwrap(), Literal::Float(1.5));
        assert_eq!(literal("2e3").unwrap(), Literal::Float(2000.0));

        match literal("NaN").unwrap() {
            Literal::Float(f) => assert!(f.is_nan()),
            other => panic!("expected float, got {other:?}"),
        }
        assert_eq!(literal("Infinity").unwrap(), Literal::Float(f64::INFINITY));
    }

    #[test]
    fn test_integer_overflow() {
        let err = literal("99999999999999999999").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_text_unescapes() {
        assert_eq!(
            literal("'it''s'").unwrap(),
            Literal::Text("it's".to_string())
        );
        assert_eq!(literal("''").unwrap(), Literal::Text(String::new()));
    }

    #[test]
    fn test_blob_and_uuid() {
        assert_eq!(literal("0xCAFE").unwrap(), Literal::Blob(vec![0xca, 0xfe]));
        assert_eq!(literal("0x").unwrap(), Literal::Blob(Vec::new()));
        assert!(literal("0xABC").is_err());

        let id = literal("F2C993B9-6C2F-4137-A8F0-0FD5E5CC4433").unwrap();
        assert_eq!(id.to_string(), "f2c993b9-6c2f-4137-a8f0-0fd5e5cc4433");
    }

    #[test]
    fn test_boolean_and_placeholder() {
        assert_eq!(literal("TRUE").unwrap(), Literal::Boolean(true));
        assert_eq!(literal("false").unwrap(), Literal::Boolean(false));
        assert_eq!(literal("?").unwrap(), Literal::Placeholder);
    }

    #[test]
    fn test_non_values_rejected() {
        assert!(literal("col").is_err());
        assert!(literal(",").is_err());
    }

    #[test]
    fn test_display_round_trips_text() {
        assert_eq!(Literal::Text("it's".into()).to_string(), "'it''s'");
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
        assert_eq!(Literal::Blob(vec![0xff]).to_string(), "0xff");
        assert_eq!(Literal::Placeholder.to_string(), "?");
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Literal::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(Literal::Blob(vec![1, 2]).to_json(), serde_json::json!("0x0102"));
        assert_eq!(Literal::Float(f64::NAN).to_json(), serde_json::json!("NaN"));
        assert_eq!(Literal::Placeholder.to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_identifier_name() {
        assert_eq!(identifier_name("MyTable"), "mytable");
        assert_eq!(identifier_name(r#""MyTable""#), "MyTable");
        assert_eq!(identifier_name(r#""a""b""#), r#"a"b"#);
        assert_eq!(unquote("plain", '\''), "plain");
    }
}
