//! Custom prompt implementation for cqlsh

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Prompt for the cqlsh REPL
pub struct CqlPrompt {
    /// Keyspace shown in the prompt, if any
    keyspace: Option<String>,
}

impl CqlPrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `keyspace` - Keyspace to show before the prompt marker
    ///
    /// # Returns
    /// * `Self` - New prompt
    pub fn new(keyspace: Option<String>) -> Self {
        Self { keyspace }
    }
}

impl Default for CqlPrompt {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Prompt for CqlPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        match &self.keyspace {
            Some(keyspace) => format!("cqlsh:{}> ", keyspace).into(),
            None => "cqlsh> ".into(),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    /// Indicator is part of the left prompt
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "   ... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
