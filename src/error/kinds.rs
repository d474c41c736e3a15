use std::{fmt, io};

/// Crate-wide `Result` type using [`CqlshError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, CqlshError>;

/// Top-level error type for cqlsh operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum CqlshError {
    /// Statement tokenizing or parsing errors.
    Parse(ParseError),

    /// Schema metadata errors.
    Schema(SchemaError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Parsing-specific errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Nothing but whitespace was given.
    Empty,

    /// The tokenizer produced an error item.
    Lexical(String),

    /// Statement form that the parser does not handle.
    Unsupported(String),

    /// Token that does not fit the grammar at this position.
    UnexpectedToken { expected: String, found: String },

    /// Input ended before the statement was complete.
    Incomplete(String),
}

/// Schema metadata errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Keyspace is not part of the schema.
    UnknownKeyspace(String),

    /// Table is not part of the keyspace.
    UnknownTable { keyspace: String, table: String },

    /// Snapshot file could not be read or decoded.
    InvalidSnapshot(String),

    /// Release version string could not be parsed.
    InvalidVersion(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Generic configuration error.
    Generic(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for CqlshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlshError::Parse(e) => write!(f, "{e}"),
            CqlshError::Schema(e) => write!(f, "Schema error: {e}"),
            CqlshError::Config(e) => write!(f, "Configuration error: {e}"),
            CqlshError::Io(e) => write!(f, "I/O error: {e}"),
            CqlshError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Syntax error: empty statement"),
            ParseError::Lexical(text) => write!(f, "Syntax error: invalid token '{text}'"),
            ParseError::Unsupported(keyword) => {
                write!(f, "Unsupported statement: {keyword}")
            }
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "Expected {expected}, found '{found}'")
            }
            ParseError::Incomplete(expected) => {
                write!(f, "Incomplete statement: expected {expected}")
            }
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownKeyspace(name) => write!(f, "Unknown keyspace: {name}"),
            SchemaError::UnknownTable { keyspace, table } => {
                write!(f, "Unknown table: {keyspace}.{table}")
            }
            SchemaError::InvalidSnapshot(msg) => write!(f, "Invalid schema snapshot: {msg}"),
            SchemaError::InvalidVersion(msg) => write!(f, "Invalid version string: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CqlshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CqlshError::Parse(e) => Some(e),
            CqlshError::Schema(e) => Some(e),
            CqlshError::Config(e) => Some(e),
            CqlshError::Io(e) => Some(e),
            CqlshError::Generic(_) => None,
        }
    }
}
impl std::error::Error for ParseError {}
impl std::error::Error for SchemaError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to CqlshError ========================= */

impl From<io::Error> for CqlshError {
    fn from(err: io::Error) -> Self {
        CqlshError::Io(err)
    }
}

impl From<ParseError> for CqlshError {
    fn from(err: ParseError) -> Self {
        CqlshError::Parse(err)
    }
}

impl From<SchemaError> for CqlshError {
    fn from(err: SchemaError) -> Self {
        CqlshError::Schema(err)
    }
}

impl From<ConfigError> for CqlshError {
    fn from(err: ConfigError) -> Self {
        CqlshError::Config(err)
    }
}

impl From<String> for CqlshError {
    fn from(msg: String) -> Self {
        CqlshError::Generic(msg)
    }
}

impl From<&str> for CqlshError {
    fn from(msg: &str) -> Self {
        CqlshError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnexpectedToken {
            expected: "keyword 'values'".to_string(),
            found: "potato".to_string(),
        };
        assert_eq!(err.to_string(), "Expected keyword 'values', found 'potato'");
        assert_eq!(
            ParseError::Lexical("@".to_string()).to_string(),
            "Syntax error: invalid token '@'"
        );
    }

    #[test]
    fn test_wrapped_error_display() {
        let err: CqlshError = SchemaError::UnknownKeyspace("ks".to_string()).into();
        assert_eq!(err.to_string(), "Schema error: Unknown keyspace: ks");

        let err: CqlshError = ParseError::Empty.into();
        assert_eq!(err.to_string(), "Syntax error: empty statement");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err: CqlshError = SchemaError::InvalidVersion("x".to_string()).into();
        assert!(err.source().is_some());
        assert!(CqlshError::Generic("oops".to_string()).source().is_none());
    }
}
