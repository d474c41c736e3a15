//! Completer for reedline - provides completion suggestions

use std::sync::Arc;

use reedline::{Completer, Span, Suggestion};
use tracing::warn;

use super::completion::{SchemaProvider, complete};
use crate::parser::{Lexer, TokenKind};

/// Schema-aware CQL completer for reedline
pub struct CqlCompleter {
    /// Metadata source for keyspace, table and column names
    provider: Arc<dyn SchemaProvider + Send + Sync>,
}

impl CqlCompleter {
    /// Create a new completer
    ///
    /// # Arguments
    /// * `provider` - Schema metadata source
    ///
    /// # Returns
    /// * `Self` - New completer
    pub fn new(provider: Arc<dyn SchemaProvider + Send + Sync>) -> Self {
        Self { provider }
    }

    /// Start of the word being typed at the end of `line`
    ///
    /// Suggestions replace that word, so the menu shows whole names rather
    /// than bare suffixes.
    fn word_start(line: &str) -> usize {
        Lexer::new(line)
            .last()
            .filter(|t| matches!(t.kind, TokenKind::Identifier | TokenKind::Keyword))
            .filter(|t| t.span.end == line.len())
            .map_or(line.len(), |t| t.span.start)
    }
}

impl Completer for CqlCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        // Only the end of the buffer is completed
        if pos != line.len() {
            return Vec::new();
        }

        let completions = complete(line, &*self.provider);
        if let Some(err) = &completions.degraded {
            warn!("Completion metadata unavailable: {}", err);
        }

        let start = Self::word_start(line);
        let word = &line[start..pos];

        completions
            .suffixes
            .into_iter()
            .map(|suffix| Suggestion {
                value: format!("{}{}", word, suffix),
                span: Span::new(start, pos),
                append_whitespace: false,
                ..Suggestion::default()
            })
            .collect()
    }
}
