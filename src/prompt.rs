//! Obtaining the question to ask

use std::io::{self, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::display::{Presenter, Tone};
use crate::error::DemoError;

const EXAMPLE_QUESTIONS: &[&str] = &[
    "What are the benefits of Medicare Advantage?",
    "How do I choose between Original Medicare and Medicare Advantage?",
];

/// Where the question comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// Read it from the terminal
    Interactive,
    /// Use this text
    Fixed(String),
}

/// Result of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user pressed Ctrl+C
    Interrupted,
    /// Input ended (Ctrl+D or closed stdin)
    Eof,
}

/// Source of interactive input lines
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome>;
}

/// Line reader on the controlling terminal, backed by rustyline
#[derive(Default)]
pub struct TerminalReader {
    editor: Option<DefaultEditor>,
}

impl TerminalReader {
    pub fn new() -> Self {
        Self::default()
    }

    fn editor(&mut self) -> io::Result<&mut DefaultEditor> {
        if self.editor.is_none() {
            self.editor = Some(DefaultEditor::new().map_err(readline_to_io)?);
        }
        self.editor
            .as_mut()
            .ok_or_else(|| io::Error::other("line editor unavailable"))
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        match self.editor()?.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(readline_to_io(e)),
        }
    }
}

fn readline_to_io(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

/// What prompting produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Question(String),
    /// The user cancelled; not an error
    Cancelled,
}

/// Get the question, either the fixed one or by asking until a non-empty line arrives
pub fn ask_question<R, W>(
    source: &PromptSource,
    reader: &mut R,
    presenter: &mut Presenter<W>,
) -> Result<PromptOutcome, DemoError>
where
    R: LineReader + ?Sized,
    W: Write,
{
    let PromptSource::Fixed(text) = source else {
        return ask_interactively(reader, presenter);
    };
    Ok(PromptOutcome::Question(text.trim().to_string()))
}

fn ask_interactively<R, W>(
    reader: &mut R,
    presenter: &mut Presenter<W>,
) -> Result<PromptOutcome, DemoError>
where
    R: LineReader + ?Sized,
    W: Write,
{
    presenter.section_header("ENTER YOUR QUESTION", Tone::Yellow)?;
    presenter.line("Ask any question about your knowledge base:", Tone::White)?;
    for example in EXAMPLE_QUESTIONS {
        presenter.line(&format!("Example: {}", example), Tone::Cyan)?;
    }
    presenter.blank()?;

    loop {
        match reader.read_line("Your question: ")? {
            ReadOutcome::Line(line) => {
                let question = line.trim();
                if !question.is_empty() {
                    return Ok(PromptOutcome::Question(question.to_string()));
                }
                presenter.error("Please enter a question. Cannot be empty.")?;
            }
            ReadOutcome::Interrupted => {
                presenter.blank()?;
                presenter.error("Operation cancelled by user.")?;
                return Ok(PromptOutcome::Cancelled);
            }
            ReadOutcome::Eof => {
                presenter.blank()?;
                presenter.error("Unexpected end of input.")?;
                return Err(DemoError::InputClosed);
            }
        }
    }
}

/// Replays canned outcomes in place of a terminal, then reports end of input
#[derive(Debug, Default)]
pub struct ScriptedReader {
    outcomes: std::collections::VecDeque<ReadOutcome>,
}

impl ScriptedReader {
    pub fn new(outcomes: impl IntoIterator<Item = ReadOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    /// Reader that yields the given lines, then end of input
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| ReadOutcome::Line(l.into())))
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> io::Result<ReadOutcome> {
        Ok(self.outcomes.pop_front().unwrap_or(ReadOutcome::Eof))
    }
}
