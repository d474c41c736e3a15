//! CQL lexer producing typed tokens one at a time
//!
//! The lexer is a cursor over the input string. Each call to
//! [`Lexer::next_token`] scans one maximal run starting at the cursor and
//! classifies it. The cursor only moves forward; restarting means building
//! a new lexer from the original text.
//!
//! # Design Principles
//!
//! - **Never panic** - malformed input becomes `Error` tokens
//! - **Lossless text** - token text is the exact slice consumed, except
//!   keywords which are normalized to lower case
//! - **Whitespace is a token** - completion needs to know where separators are

use std::fmt;
use std::ops::Range;

/// Token type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EOF,
    Error,

    Keyword,
    Whitespace,
    Identifier,
    Star,

    // Constants
    String,
    Integer,
    Float,
    Uuid,
    Boolean,
    Blob,

    Comma,
    /// Opening or closing parenthesis, compare the text to tell them apart
    Bracket,
    Semicolon,
    Dot,
    QuestionMark,
    Colon,
}

impl TokenKind {
    /// Short uppercase name used in diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::EOF => "<eof>",
            TokenKind::Error => "ERROR",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Whitespace => "WS",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Star => "STAR",
            TokenKind::String => "STRING",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Uuid => "UUID",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Blob => "BLOB",
            TokenKind::Comma => "COMMA",
            TokenKind::Bracket => "BRACKET",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Dot => "DOT",
            TokenKind::QuestionMark => "QMARK",
            TokenKind::Colon => "COLON",
        }
    }

    /// True for the constant kinds accepted as a value term
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Uuid
                | TokenKind::Boolean
                | TokenKind::Blob
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte range of the run in the original input
    pub span: Range<usize>,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// End-of-input token positioned at `at`
    pub fn eof(at: usize) -> Self {
        Self::new(TokenKind::EOF, "", at..at)
    }

    /// Check both kind and text
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    /// Check for a keyword, `word` must be lower case
    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }

    pub fn is_open_bracket(&self) -> bool {
        self.is(TokenKind::Bracket, "(")
    }

    pub fn is_close_bracket(&self) -> bool {
        self.is(TokenKind::Bracket, ")")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {:?}]", self.kind, self.text)
    }
}

/// Reserved CQL words plus the unreserved ones the INSERT grammar keys on.
///
/// Kept sorted so lookups can binary search on the lower-cased word.
pub const KEYWORDS: &[&str] = &[
    "add",
    "allow",
    "alter",
    "and",
    "apply",
    "asc",
    "authorize",
    "batch",
    "begin",
    "by",
    "columnfamily",
    "create",
    "default",
    "delete",
    "desc",
    "describe",
    "drop",
    "entries",
    "execute",
    "exists",
    "from",
    "full",
    "grant",
    "if",
    "in",
    "index",
    "infinity",
    "insert",
    "into",
    "json",
    "keyspace",
    "limit",
    "modify",
    "nan",
    "norecursive",
    "not",
    "null",
    "of",
    "on",
    "or",
    "order",
    "primary",
    "rename",
    "replace",
    "revoke",
    "schema",
    "select",
    "set",
    "table",
    "timestamp",
    "to",
    "token",
    "truncate",
    "ttl",
    "unlogged",
    "unset",
    "update",
    "use",
    "using",
    "values",
    "view",
    "where",
    "with",
];

/// Case-insensitive keyword lookup
pub fn is_keyword(word: &str) -> bool {
    word.is_ascii() && KEYWORDS.binary_search(&word.to_ascii_lowercase().as_str()).is_ok()
}

/// Characters that always form a token on their own
fn is_singleton(ch: char) -> bool {
    matches!(ch, '(' | ')' | ',' | '.' | ';' | '*' | '?' | ':')
}

fn is_hex(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// `0x` or `0X` followed by hex digits
fn is_blob(token: &str) -> bool {
    match token.as_bytes() {
        [b'0', b'x' | b'X', rest @ ..] => rest.iter().all(u8::is_ascii_hexdigit),
        _ => false,
    }
}

/// `8-4-4-4-12` hex groups separated by `-`
fn is_uuid(token: &str) -> bool {
    if token.len() != 36 {
        return false;
    }

    token.char_indices().all(|(i, ch)| match i {
        8 | 13 | 18 | 23 => ch == '-',
        _ => is_hex(ch),
    })
}

fn is_unquoted_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

/// Classify a run that starts with a digit or `-`
fn scan_number(token: &str) -> TokenKind {
    let bytes = token.as_bytes();
    let mut pos = 0;

    let skip_digits = |mut pos: usize| {
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        pos
    };

    if bytes.first() == Some(&b'-') {
        pos += 1;
    }

    let digits_start = pos;
    pos = skip_digits(pos);
    if pos == digits_start {
        return TokenKind::Error;
    }

    let mut kind = TokenKind::Integer;
    if pos < bytes.len() && bytes[pos] == b'.' {
        kind = TokenKind::Float;
        pos = skip_digits(pos + 1);
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        kind = TokenKind::Float;
        pos += 1;
        if pos < bytes.len() && matches!(bytes[pos], b'-' | b'+') {
            pos += 1;
        }

        let exponent_start = pos;
        pos = skip_digits(pos);
        if pos == exponent_start {
            return TokenKind::Error;
        }
    }

    if pos != bytes.len() {
        return TokenKind::Error;
    }

    kind
}

/// Scanner sub-state for a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Start,
    /// `closing` is set once a lone quote has been seen; a second one
    /// right after it is an escape, anything else ends the run.
    InQuote { quote: char, closing: bool },
    InIdent,
    InSpace,
    InNumber,
}

/// One scanned run before classification
struct Run {
    span: Range<usize>,
    unterminated: bool,
}

/// CQL Lexer - cursor over the input
pub struct Lexer<'a> {
    input: &'a str,
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from input string
    pub fn new(input: &'a str) -> Self {
        Self { input, start: 0 }
    }

    /// Tokenize the entire input, the last token is always EOF
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();

        loop {
            let token = lexer.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// The text being scanned
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Byte offset of the cursor
    pub fn position(&self) -> usize {
        self.start
    }

    /// Get the next token, EOF once the input is exhausted
    pub fn next_token(&mut self) -> Token {
        match self.next_run() {
            Some(run) => self.classify(run),
            None => Token::eof(self.input.len()),
        }
    }

    /// Get the next token that is not whitespace
    pub fn next_non_ws(&mut self) -> Token {
        loop {
            let token = self.next_token();
            if token.kind != TokenKind::Whitespace {
                return token;
            }
        }
    }

    /// Scan the maximal run at the cursor and advance past it
    fn next_run(&mut self) -> Option<Run> {
        if self.start >= self.input.len() {
            return None;
        }

        let mut state = ScanState::Start;
        let mut end = self.start;

        for (offset, ch) in self.input[self.start..].char_indices() {
            let pos = self.start + offset;

            match state {
                ScanState::Start => {
                    end = pos + ch.len_utf8();
                    match ch {
                        c if is_singleton(c) => break,
                        '\'' | '"' => {
                            state = ScanState::InQuote {
                                quote: ch,
                                closing: false,
                            }
                        }
                        '-' => state = ScanState::InNumber,
                        c if c.is_whitespace() => state = ScanState::InSpace,
                        c if c.is_ascii_digit() => state = ScanState::InNumber,
                        _ => state = ScanState::InIdent,
                    }
                    continue;
                }
                ScanState::InSpace => {
                    if !ch.is_whitespace() {
                        break;
                    }
                }
                ScanState::InNumber => {
                    if !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '+' | '-')) {
                        break;
                    }
                }
                ScanState::InIdent => {
                    if is_singleton(ch) || ch.is_whitespace() || ch == '\'' || ch == '"' {
                        break;
                    }
                }
                ScanState::InQuote { quote, closing } => {
                    if closing && ch != quote {
                        break;
                    }
                    let closing = if ch == quote { !closing } else { false };
                    state = ScanState::InQuote { quote, closing };
                }
            }

            end = pos + ch.len_utf8();
        }

        let unterminated = matches!(state, ScanState::InQuote { closing: false, .. });
        let span = self.start..end;
        self.start = end;

        Some(Run { span, unterminated })
    }

    /// Classify a run; the order of the checks matters
    fn classify(&self, run: Run) -> Token {
        let text = &self.input[run.span.clone()];
        let token = |kind: TokenKind| Token::new(kind, text, run.span.clone());

        if run.unterminated {
            return token(TokenKind::Error);
        }

        if is_uuid(text) {
            return token(TokenKind::Uuid);
        }
        if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
            return token(TokenKind::Boolean);
        }
        if text.eq_ignore_ascii_case("nan") || text.eq_ignore_ascii_case("infinity") {
            return token(TokenKind::Float);
        }
        if is_blob(text) {
            return token(TokenKind::Blob);
        }

        match text {
            "," => return token(TokenKind::Comma),
            "(" | ")" => return token(TokenKind::Bracket),
            ";" => return token(TokenKind::Semicolon),
            "." => return token(TokenKind::Dot),
            "?" => return token(TokenKind::QuestionMark),
            ":" => return token(TokenKind::Colon),
            "*" => return token(TokenKind::Star),
            _ => {}
        }

        // A run is never empty, so there is always a first character
        let first = text.chars().next().unwrap_or_default();
        if first.is_whitespace() {
            return token(TokenKind::Whitespace);
        }

        if is_keyword(text) {
            return Token::new(TokenKind::Keyword, text.to_ascii_lowercase(), run.span.clone());
        }
        if first == '"' || is_unquoted_identifier(text) {
            return token(TokenKind::Identifier);
        }

        if first.is_ascii_digit() || first == '-' {
            return token(scan_number(text));
        }
        if first == '\'' {
            return token(TokenKind::String);
        }

        token(TokenKind::Error)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to, but not including, EOF
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (!token.is_eof()).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(input: &str) -> Token {
        Lexer::new(input).next_token()
    }

    fn texts(input: &str) -> Vec<String> {
        Lexer::tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_keywords_sorted() {
        let mut sorted = KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KEYWORDS);
    }

    #[test]
    fn test_classify_single_tokens() {
        let cases: &[(TokenKind, &[&str])] = &[
            (TokenKind::Integer, &["0", "-1", "12309124801293"]),
            (
                TokenKind::Float,
                &["1.0", "-1.0", "31.231E-1212", "31.231e+1212", "nan", "INFINITY"],
            ),
            (TokenKind::Boolean, &["true", "false", "TRUE", "FALSE"]),
            (TokenKind::String, &["'raw string'", "'escaped ''string'", "''"]),
            (
                TokenKind::Uuid,
                &[
                    "f2c993b9-6c2f-4137-a8f0-0fd5e5cc4433",
                    "F2C993B9-6C2F-4137-A8F0-0FD5E5CC4433",
                    "12345678-1234-1234-1234-123456789abc",
                ],
            ),
            (TokenKind::Blob, &["0xFF", "0X23eFaa", "0x"]),
            (
                TokenKind::Identifier,
                &[
                    "sometable",
                    "INFINITYtable",
                    "col_1",
                    r#""quoted ident""#,
                    r#""nested "" quote""#,
                ],
            ),
            (TokenKind::Comma, &[","]),
            (TokenKind::Semicolon, &[";"]),
            (TokenKind::QuestionMark, &["?"]),
            (TokenKind::Star, &["*"]),
            (TokenKind::Colon, &[":"]),
            (TokenKind::Dot, &["."]),
            (TokenKind::Bracket, &["(", ")"]),
            (TokenKind::Whitespace, &[" ", " \t\n"]),
        ];

        for (kind, inputs) in cases {
            for input in *inputs {
                let token = first(input);
                assert_eq!(token.kind, *kind, "{input} classified as {token}");
                assert_eq!(token.text, *input);
                assert_eq!(token.span, 0..input.len());
            }
        }
    }

    #[test]
    fn test_keywords_are_lowercased() {
        for input in ["select", "into", "INSERT", "Update", "create", "VALUES"] {
            let token = first(input);
            assert_eq!(token.kind, TokenKind::Keyword);
            assert_eq!(token.text, input.to_ascii_lowercase());
        }
    }

    #[test]
    fn test_letters_only_is_one_identifier() {
        for input in ["potato", "Horse", "abcdefghijklmnopqrstuvwxyz", "keyspaceName"] {
            let tokens = Lexer::tokenize(input);
            assert_eq!(tokens.len(), 2);
            assert_eq!(tokens[0].kind, TokenKind::Identifier);
            assert_eq!(tokens[0].text, input);
            assert!(tokens[1].is_eof());
        }
    }

    #[test]
    fn test_uuid_before_identifier() {
        let token = first("abcdefab-abcd-abcd-abcd-abcdefabcdef");
        assert_eq!(token.kind, TokenKind::Uuid);

        // Wrong group layout is not a uuid
        let token = first("abcdefabc-bcd-abcd-abcd-abcdefabcdef");
        assert_eq!(token.kind, TokenKind::Error);
    }

    #[test]
    fn test_blob_requires_hex() {
        assert_eq!(first("0x00ff").kind, TokenKind::Blob);
        assert_eq!(first("0xZZ").kind, TokenKind::Error);
        assert_eq!(first("0xZZ").text, "0xZZ");
        assert_eq!(first("0x12g").kind, TokenKind::Error);
    }

    #[test]
    fn test_malformed_numbers() {
        for input in ["-", "1e", "1.5e+", "12abc", "1-2", "--1"] {
            assert_eq!(first(input).kind, TokenKind::Error, "{input}");
        }
    }

    #[test]
    fn test_unterminated_quotes() {
        assert_eq!(first("'open").kind, TokenKind::Error);
        assert_eq!(first("'open''").kind, TokenKind::Error);
        assert_eq!(first(r#""ident"#).kind, TokenKind::Error);
    }

    #[test]
    fn test_unclassifiable() {
        for input in ["@", "=", "_leading", "a=b"] {
            assert_eq!(first(input).kind, TokenKind::Error, "{input}");
        }
    }

    #[test]
    fn test_scan_runs() {
        let cases: &[(&str, &[&str])] = &[
            ("test simple input", &["test", " ", "simple", " ", "input", ""]),
            ("single", &["single", ""]),
            (" ", &[" ", ""]),
            (r#"  "quoted""#, &["  ", r#""quoted""#, ""]),
            (
                "table(column, col2)",
                &["table", "(", "column", ",", " ", "col2", ")", ""],
            ),
            ("ks.tbl;", &["ks", ".", "tbl", ";", ""]),
            ("('it''s', ?)", &["(", "'it''s'", ",", " ", "?", ")", ""]),
            ("", &[""]),
        ];

        for (input, expected) in cases {
            assert_eq!(texts(input), *expected, "{input}");
        }
    }

    #[test]
    fn test_spans_cover_input() {
        let input = "INSERT INTO ks.tbl (a) VALUES ('é', 1.5e3);";
        let tokens = Lexer::tokenize(input);

        let mut expected_start = 0;
        for token in &tokens {
            assert_eq!(token.span.start, expected_start);
            expected_start = token.span.end;
        }
        assert_eq!(expected_start, input.len());
    }

    #[test]
    fn test_non_ascii_runs() {
        let token = first("'é'");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text, "'é'");

        assert_eq!(first("'Ünïcødé text'").kind, TokenKind::String);
        assert_eq!(first(r#""Straße""#).kind, TokenKind::Identifier);

        // Unquoted names are ASCII only
        for input in ["aé", "é", "日本"] {
            let token = first(input);
            assert_eq!(token.kind, TokenKind::Error, "{input}");
            assert_eq!(token.text, input);
        }
    }

    #[test]
    fn test_non_ascii_error_then_continue() {
        let tokens = Lexer::tokenize("é (1)");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Error,
                TokenKind::Whitespace,
                TokenKind::Bracket,
                TokenKind::Integer,
                TokenKind::Bracket,
                TokenKind::EOF,
            ]
        );
        assert_eq!(tokens[0].span, 0..2);
    }

    #[test]
    fn test_next_non_ws() {
        let mut lexer = Lexer::new("  insert   into ");
        assert!(lexer.next_non_ws().is_keyword("insert"));
        assert!(lexer.next_non_ws().is_keyword("into"));
        assert!(lexer.next_non_ws().is_eof());
        assert!(lexer.next_non_ws().is_eof());
        assert_eq!(lexer.position(), 16);
    }

    #[test]
    fn test_iterator_stops_before_eof() {
        let kinds: Vec<TokenKind> = Lexer::new("a, b").map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_token_display() {
        assert_eq!(first("into").to_string(), r#"[KEYWORD "into"]"#);
        assert_eq!(Token::eof(0).to_string(), r#"[<eof> ""]"#);
    }
}
