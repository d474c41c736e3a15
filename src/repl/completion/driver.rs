//! Completion driver for partially typed statements
//!
//! The buffer is tokenized from the start and walked along the INSERT
//! grammar. The walk stops at the first position that needs more input than
//! was typed and returns what could be typed there. Only the end of the
//! buffer is completed.
//!
//! Three primitives do the work:
//! - `space`: a separator, offering `" "` when the buffer ends
//! - `expect`: a fixed word, offering its remainder
//! - `accept`: a name, offering schema candidates through a [`Trie`]
//!
//! Each returns `None` when the walk must stop, so a grammar path reads as a
//! chain of `?`.

use tracing::debug;

use super::provider::{SchemaProvider, rank_candidates};
use super::trie::Trie;
use crate::error::{CqlshError, Result};
use crate::parser::{Lexer, STATEMENT_KEYWORDS, Token, TokenKind};

/// Result of a completion request
#[derive(Debug, Default)]
pub struct Completions {
    /// Text to insert at the end of the buffer, ranked and de-duplicated
    pub suffixes: Vec<String>,
    /// Metadata lookup that failed; nothing was offered at that position
    pub degraded: Option<CqlshError>,
}

impl Completions {
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

/// Complete the end of `input` against the schema
///
/// # Arguments
/// * `input` - Buffer up to the cursor
/// * `provider` - Schema metadata source
///
/// # Returns
/// * `Completions` - Suffixes for the first incomplete position
pub fn complete<P: SchemaProvider + ?Sized>(input: &str, provider: &P) -> Completions {
    let mut walker = Walker::new(input, provider);
    walker.statement();
    walker.finish()
}

/// Repeat the case of what was typed onto a keyword remainder
fn match_case(typed: &str, rest: &str) -> String {
    let mut letters = typed.chars().filter(|c| c.is_alphabetic()).peekable();
    let upper = letters.peek().is_some() && letters.all(char::is_uppercase);

    if upper {
        rest.to_uppercase()
    } else {
        rest.to_string()
    }
}

fn starts_with_ignore_case(word: &str, typed: &str) -> bool {
    word.get(..typed.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(typed))
}

/// Names and partial names
fn is_word(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword)
}

struct Walker<'a, P: ?Sized> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    provider: &'a P,
    offers: Vec<String>,
    degraded: Option<CqlshError>,
}

impl<'a, P: SchemaProvider + ?Sized> Walker<'a, P> {
    fn new(input: &'a str, provider: &'a P) -> Self {
        Self {
            input,
            tokens: Lexer::tokenize(input),
            pos: 0,
            provider,
            offers: Vec::new(),
            degraded: None,
        }
    }

    fn finish(self) -> Completions {
        Completions {
            suffixes: rank_candidates(self.offers),
            degraded: self.degraded,
        }
    }

    /// Current token; EOF once the tokens run out
    fn peek(&self) -> Token {
        self.tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| Token::eof(self.input.len()))
    }

    fn skip_ws(&mut self) {
        while self.peek().kind == TokenKind::Whitespace {
            self.pos += 1;
        }
    }

    /// Source text of a token, keywords keep their typed case here
    fn typed(&self, token: &Token) -> &'a str {
        &self.input[token.span.clone()]
    }

    /// The token is the last thing in the buffer
    fn ends_buffer(&self, token: &Token) -> bool {
        !token.is_eof() && token.span.end == self.input.len()
    }

    fn offer(&mut self, items: impl IntoIterator<Item = String>) {
        self.offers.extend(items);
    }

    fn stop(&self, token: &Token, wanted: &str) -> Option<()> {
        debug!("completion: stopped at {} while expecting {}", token, wanted);
        None
    }

    fn space(&mut self) -> Option<()> {
        match self.peek().kind {
            TokenKind::EOF => {
                self.offer([" ".to_string()]);
                None
            }
            TokenKind::Whitespace => {
                self.pos += 1;
                Some(())
            }
            _ => Some(()),
        }
    }

    fn expect(&mut self, word: &str) -> Option<()> {
        self.skip_ws();
        let token = self.peek();

        if token.is_eof() {
            self.offer([word.to_string()]);
            return None;
        }

        let typed = self.typed(&token);
        if typed.eq_ignore_ascii_case(word) {
            self.pos += 1;
            return Some(());
        }

        if self.ends_buffer(&token) && starts_with_ignore_case(word, typed) {
            self.offer([match_case(typed, &word[typed.len()..])]);
            return None;
        }

        self.stop(&token, word)
    }

    /// Run a metadata lookup, recording a failure instead of returning it
    fn fetch<F>(&mut self, what: &str, lookup: F) -> Option<Vec<String>>
    where
        F: FnOnce(&P) -> Result<Vec<String>>,
    {
        match lookup(self.provider) {
            Ok(candidates) => {
                debug!("completion: {} {} candidates", candidates.len(), what);
                Some(candidates)
            }
            Err(e) => {
                debug!("completion: {} lookup failed: {}", what, e);
                self.degraded = Some(e);
                None
            }
        }
    }

    fn accept<F>(&mut self, what: &str, lookup: F) -> Option<String>
    where
        F: FnOnce(&P) -> Result<Vec<String>>,
    {
        self.skip_ws();
        let token = self.peek();

        if token.is_eof() {
            let candidates = self.fetch(what, lookup)?;
            self.offer(candidates);
            return None;
        }

        if !is_word(&token) {
            self.stop(&token, what)?;
        }

        let typed = self.typed(&token);
        if !self.ends_buffer(&token) {
            self.pos += 1;
            return Some(typed.to_string());
        }

        let candidates = self.fetch(what, lookup)?;
        let trie: Trie = candidates.iter().collect();
        let suffixes = trie.complete(typed);

        // Exact match with nothing longer: the name is done
        if suffixes.len() == 1 && suffixes[0].is_empty() {
            self.pos += 1;
            return Some(typed.to_string());
        }

        self.offer(suffixes);
        None
    }

    fn statement(&mut self) -> Option<()> {
        self.skip_ws();
        let token = self.peek();

        if token.is_keyword("insert") {
            self.pos += 1;
            return self.insert();
        }

        if is_word(&token) && self.ends_buffer(&token) {
            let typed = self.typed(&token);
            let trie: Trie = STATEMENT_KEYWORDS.iter().collect();
            let suffixes = trie
                .complete(&typed.to_ascii_lowercase())
                .into_iter()
                .map(|rest| match_case(typed, &rest))
                .collect::<Vec<_>>();
            self.offer(suffixes);
        }

        None
    }

    /// `INSERT INTO keyspace.table (col, ...) VALUES (`
    fn insert(&mut self) -> Option<()> {
        self.space()?;
        self.expect("into")?;
        self.space()?;

        let keyspace = self.accept("keyspace", |p| p.keyspaces())?;
        self.expect(".")?;
        let table = self.accept("table", |p| p.tables(&keyspace))?;
        self.expect("(")?;

        let mut used: Vec<String> = Vec::new();
        loop {
            let column = self.accept("column", |p| {
                p.columns(&keyspace, &table).map(|columns| {
                    columns
                        .into_iter()
                        .filter(|c| !used.contains(c))
                        .collect()
                })
            })?;
            used.push(column);

            self.skip_ws();
            let token = self.peek();
            match token.kind {
                TokenKind::EOF => {
                    self.offer([",".to_string(), ")".to_string()]);
                    return None;
                }
                TokenKind::Comma => {
                    self.pos += 1;
                    self.space()?;
                }
                _ if token.is_close_bracket() => {
                    self.pos += 1;
                    break;
                }
                _ => return self.stop(&token, "',' or ')'"),
            }
        }

        self.space()?;
        self.expect("values")?;
        self.expect("(")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    struct MockProvider;

    impl SchemaProvider for MockProvider {
        fn keyspaces(&self) -> Result<Vec<String>> {
            Ok(vec!["system_auth".into(), "store".into(), "system".into()])
        }

        fn tables(&self, keyspace: &str) -> Result<Vec<String>> {
            match keyspace {
                "store" => Ok(vec!["orders".into(), "users".into(), "order_items".into()]),
                "system" | "system_auth" => Ok(vec!["local".into()]),
                other => Err(SchemaError::UnknownKeyspace(other.to_string()).into()),
            }
        }

        fn columns(&self, keyspace: &str, table: &str) -> Result<Vec<String>> {
            match (keyspace, table) {
                ("store", "users") => Ok(vec!["id".into(), "name".into(), "email".into()]),
                _ => Err(SchemaError::UnknownTable {
                    keyspace: keyspace.to_string(),
                    table: table.to_string(),
                }
                .into()),
            }
        }
    }

    struct OfflineProvider;

    impl SchemaProvider for OfflineProvider {
        fn keyspaces(&self) -> Result<Vec<String>> {
            Err(CqlshError::Generic("connection refused".to_string()))
        }

        fn tables(&self, _keyspace: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn columns(&self, _keyspace: &str, _table: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn suggest(input: &str) -> Vec<String> {
        let completions = complete(input, &MockProvider);
        assert!(completions.degraded.is_none(), "{input}");
        completions.suffixes
    }

    #[test]
    fn test_first_word() {
        assert!(suggest("").is_empty());
        assert!(suggest("   ").is_empty());
        assert_eq!(suggest("ins"), vec!["ert"]);
        assert_eq!(suggest("INS"), vec!["ERT"]);
        assert_eq!(suggest("se"), vec!["lect"]);
        assert_eq!(suggest("u"), vec!["pdate"]);
        assert!(suggest("x").is_empty());
        assert!(suggest("select").is_empty());
    }

    #[test]
    fn test_into_keyword() {
        assert_eq!(suggest("insert"), vec![" "]);
        assert_eq!(suggest("insert "), vec!["into"]);
        assert_eq!(suggest("insert i"), vec!["nto"]);
        assert_eq!(suggest("INSERT IN"), vec!["TO"]);
        assert_eq!(suggest("insert into"), vec![" "]);
        assert!(suggest("insert onto").is_empty());
    }

    #[test]
    fn test_keyspace_names() {
        assert_eq!(
            suggest("insert into "),
            vec!["store", "system", "system_auth"]
        );
        assert_eq!(suggest("insert into sys"), vec!["tem", "tem_auth"]);
        assert_eq!(suggest("insert into system"), vec!["_auth"]);
        assert_eq!(suggest("insert into store"), vec!["."]);
        assert!(suggest("insert into nothing").is_empty());
    }

    #[test]
    fn test_table_names() {
        assert_eq!(
            suggest("insert into store."),
            vec!["users", "orders", "order_items"]
        );
        assert_eq!(suggest("insert into store.ord"), vec!["ers", "er_items"]);
        assert_eq!(suggest("insert into store.users"), vec!["("]);
        assert_eq!(suggest("insert into store.users "), vec!["("]);
    }

    #[test]
    fn test_column_names() {
        assert_eq!(
            suggest("insert into store.users ("),
            vec!["id", "name", "email"]
        );
        assert_eq!(suggest("insert into store.users (n"), vec!["ame"]);
        assert_eq!(suggest("insert into store.users (id"), vec![")", ","]);
        assert_eq!(suggest("insert into store.users (id,"), vec![" "]);
        assert_eq!(
            suggest("insert into store.users (id, "),
            vec!["name", "email"]
        );
        assert_eq!(suggest("insert into store.users (id, name,email"), vec![")", ","]);
    }

    #[test]
    fn test_values_clause() {
        assert_eq!(suggest("insert into store.users (id)"), vec![" "]);
        assert_eq!(suggest("insert into store.users (id) "), vec!["values"]);
        assert_eq!(suggest("insert into store.users (id) VAL"), vec!["UES"]);
        assert_eq!(suggest("insert into store.users (id) values"), vec!["("]);
        assert!(suggest("insert into store.users (id) values (").is_empty());
    }

    #[test]
    fn test_stops_on_unexpected_tokens() {
        assert!(suggest("insert into 'store'").is_empty());
        assert!(suggest("insert into store.users (id;").is_empty());
        assert!(suggest("insert into store.users (id) values ('open").is_empty());
    }

    #[test]
    fn test_lookup_errors_degrade() {
        let completions = complete("insert into nope.", &MockProvider);
        assert!(completions.is_empty());
        assert!(matches!(
            completions.degraded,
            Some(CqlshError::Schema(SchemaError::UnknownKeyspace(ref ks))) if ks == "nope"
        ));

        let completions = complete("insert into ", &OfflineProvider);
        assert!(completions.is_empty());
        assert!(completions.degraded.is_some());
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("IN", "to"), "TO");
        assert_eq!(match_case("In", "to"), "to");
        assert_eq!(match_case("(", ")"), ")");
    }
}
