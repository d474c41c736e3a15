//! Validator for reedline - decides when a statement is ready to run

use reedline::{ValidationResult, Validator};

use super::is_shell_command;

/// CQL statement validator for reedline
///
/// Input is complete when it ends with `;` outside a string, or when every
/// parenthesis opened outside a string has been closed. An open string
/// always keeps the editor in multi-line mode.
pub struct CqlValidator;

impl CqlValidator {
    pub fn new() -> Self {
        Self
    }

    /// Scan the input, returning (open string, paren depth)
    fn scan(input: &str) -> (bool, i32) {
        let mut depth = 0;
        let mut quote: Option<char> = None;

        for ch in input.chars() {
            match quote {
                // A doubled quote closes and reopens, which nets out
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None => match ch {
                    '\'' | '"' => quote = Some(ch),
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    _ => {}
                },
            }
        }

        (quote.is_some(), depth)
    }
}

impl Default for CqlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for CqlValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        let trimmed = line.trim();

        if trimmed.is_empty() || is_shell_command(trimmed) {
            return ValidationResult::Complete;
        }

        let (in_string, depth) = Self::scan(trimmed);
        if in_string {
            return ValidationResult::Incomplete;
        }

        if trimmed.ends_with(';') || depth <= 0 {
            ValidationResult::Complete
        } else {
            ValidationResult::Incomplete
        }
    }
}
