//! Interactive read-eval-print loop built on reedline

use std::sync::Arc;

use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::{debug, info};

use super::completer::CqlCompleter;
use super::completion::SchemaProvider;
use super::highlighter::CqlHighlighter;
use super::prompt::CqlPrompt;
use super::validator::CqlValidator;
use super::{ShellCommand, shell_command};
use crate::config::{Config, HistoryConfig};
use crate::error::{CqlshError, Result};
use crate::formatter::Formatter;
use crate::parser::Parser;

const COMPLETION_MENU: &str = "completion_menu";

const HELP_TEXT: &str = "\
Statements are parsed and shown in the configured output format.
Supported: INSERT INTO [keyspace.]table (columns) VALUES (values)
           [IF NOT EXISTS] [USING TTL n [AND TIMESTAMP n]];
           INSERT INTO [keyspace.]table JSON 'document';

Shell commands:
  HELP           show this text
  EXIT, QUIT     leave the shell

Press Tab to complete keywords, keyspaces, tables and columns.";

/// Outcome of one line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Text to print
    Output(String),
    /// Nothing to do
    Empty,
    /// Leave the loop
    Exit,
}

/// Parses and formats statements; holds no terminal state
pub struct Session {
    parser: Parser,
    formatter: Formatter,
}

impl Session {
    pub fn new(formatter: Formatter) -> Self {
        Self {
            parser: Parser::new(),
            formatter,
        }
    }

    /// Evaluate one complete input
    ///
    /// # Arguments
    /// * `input` - Statement or shell command
    ///
    /// # Returns
    /// * `Result<Evaluation>` - What to show, or a parse error
    pub fn evaluate(&self, input: &str) -> Result<Evaluation> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Evaluation::Empty);
        }

        match shell_command(input) {
            Some(ShellCommand::Exit) => return Ok(Evaluation::Exit),
            Some(ShellCommand::Help) => return Ok(Evaluation::Output(HELP_TEXT.to_string())),
            None => {}
        }

        let statement = self.parser.parse(input)?;
        Ok(Evaluation::Output(self.formatter.format(&statement)?))
    }
}

/// REPL engine for interactive statement entry
pub struct ReplEngine {
    /// Line editor for statement input
    editor: Reedline,

    prompt: CqlPrompt,

    session: Session,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `config` - Effective configuration
    /// * `provider` - Schema metadata for completion
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(config: &Config, provider: Arc<dyn SchemaProvider + Send + Sync>) -> Result<Self> {
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let menu = ColumnarMenu::default().with_name(COMPLETION_MENU);

        let editor = Reedline::create()
            .with_history(Self::history(&config.history)?)
            .with_completer(Box::new(CqlCompleter::new(provider)))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_validator(Box::new(CqlValidator::new()))
            .with_highlighter(Box::new(CqlHighlighter::new(
                config.display.syntax_highlighting,
            )));

        Ok(Self {
            editor,
            prompt: CqlPrompt::default(),
            session: Session::new(Formatter::from_config(&config.display)),
        })
    }

    /// In-memory or file-backed history per configuration
    fn history(config: &HistoryConfig) -> Result<Box<FileBackedHistory>> {
        let history = if config.persist {
            debug!("Using history file {}", config.file_path.display());
            FileBackedHistory::with_file(config.max_size, config.file_path.clone())
        } else {
            FileBackedHistory::new(config.max_size)
        };

        history
            .map(Box::new)
            .map_err(|e| CqlshError::Generic(format!("History error: {}", e)))
    }

    /// Read a single input from the editor
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input or None on Ctrl-C / Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let signal = self.editor.read_line(&self.prompt)?;
        Ok(Self::line_from_signal(signal))
    }

    /// Input carried by an editor signal; anything but a line ends the loop
    fn line_from_signal(signal: Signal) -> Option<String> {
        match signal {
            Signal::Success(line) => Some(line),
            Signal::CtrlC | Signal::CtrlD => None,
            #[allow(unreachable_patterns)]
            other => {
                debug!("Unhandled editor signal {:?}, leaving REPL", other);
                None
            }
        }
    }

    /// Run the loop until EXIT, QUIT or end of input
    ///
    /// Statement errors are printed and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        info!("Starting REPL");

        while let Some(line) = self.read_line()? {
            match self.session.evaluate(&line) {
                Ok(Evaluation::Output(text)) => println!("{}", text),
                Ok(Evaluation::Empty) => {}
                Ok(Evaluation::Exit) => break,
                Err(e) => eprintln!("{}", e),
            }
        }

        info!("REPL finished");
        Ok(())
    }
}
