//! Interactive shell for cqlsh
//!
//! This module provides the REPL and its reedline integration:
//! - Schema-aware tab completion
//! - Syntax highlighting from the statement lexer
//! - Multi-line input until a statement is complete
//! - Persistent command history

pub mod completion;

mod completer;
mod engine;
mod highlighter;
mod prompt;
mod validator;

pub use completer::CqlCompleter;
pub use engine::{Evaluation, ReplEngine, Session};
pub use highlighter::CqlHighlighter;
pub use prompt::CqlPrompt;
pub use validator::CqlValidator;

/// Commands handled by the shell itself rather than parsed as CQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Exit,
}

/// Recognize a shell command, ignoring case and a trailing `;`
pub fn shell_command(input: &str) -> Option<ShellCommand> {
    let word = input.trim().trim_end_matches(';').trim_end();

    match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Some(ShellCommand::Help),
        "exit" | "quit" => Some(ShellCommand::Exit),
        _ => None,
    }
}

pub(crate) fn is_shell_command(input: &str) -> bool {
    shell_command(input).is_some()
}
