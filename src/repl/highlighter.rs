//! Syntax highlighter for CQL input
//!
//! The line is split with the statement lexer so highlighting agrees with
//! what the parser and the completer see.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::parser::{Lexer, TokenKind};

/// CQL syntax highlighter
pub struct CqlHighlighter {
    enabled: bool,
}

impl CqlHighlighter {
    /// Create a new highlighter
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn style(kind: TokenKind) -> Style {
        match kind {
            TokenKind::Keyword => Color::Green.bold(),
            TokenKind::Identifier => Style::default(),
            TokenKind::String => Color::Yellow.normal(),
            TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Boolean
            | TokenKind::Uuid
            | TokenKind::Blob => Color::Magenta.normal(),
            TokenKind::Bracket => Color::Cyan.normal(),
            TokenKind::Comma | TokenKind::Dot | TokenKind::Semicolon | TokenKind::Colon => {
                Color::DarkGray.normal()
            }
            TokenKind::Star | TokenKind::QuestionMark => Color::Blue.normal(),
            TokenKind::Error => Color::Red.underline(),
            TokenKind::Whitespace | TokenKind::EOF => Style::default(),
        }
    }
}

impl Default for CqlHighlighter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Highlighter for CqlHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        let mut end = 0;
        for token in Lexer::new(line) {
            // Source text, since keyword tokens carry the lower-cased form
            styled.push((Self::style(token.kind), line[token.span.clone()].to_string()));
            end = token.span.end;
        }

        if end < line.len() {
            styled.push((Style::default(), line[end..].to_string()));
        }

        styled
    }
}
