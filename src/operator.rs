//! Operator interaction
//!
//! Everything the wallet says to, or asks of, the person at the terminal goes
//! through the [`Operator`] trait. The CLI uses [`TerminalOperator`]; tests
//! drive the pipelines with [`ScriptedOperator`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Errors while reading an operator response
#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Input closed before a response was entered")]
    Closed,
}

/// Operator console: questions, notices and warnings
pub trait Operator {
    /// Ask a question and block until a line of input arrives
    ///
    /// The returned string has its line terminator removed but is otherwise raw.
    fn ask(&mut self, question: &str) -> Result<String, OperatorError>;

    /// Informational message
    fn notify(&mut self, message: &str);

    /// Something went wrong or was adjusted on the operator's behalf
    fn warn(&mut self, message: &str);
}

/// Operator backed by stdin/stdout/stderr
#[derive(Debug, Default)]
pub struct TerminalOperator;

impl TerminalOperator {
    pub fn new() -> Self {
        Self
    }
}

impl Operator for TerminalOperator {
    fn ask(&mut self, question: &str) -> Result<String, OperatorError> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(OperatorError::Closed);
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message);
    }

    fn warn(&mut self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}

/// One interaction recorded by [`ScriptedOperator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorEvent {
    Asked(String),
    Notice(String),
    Warning(String),
}

/// Operator that answers from a fixed script and records every interaction
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    transcript: Vec<OperatorEvent>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Operator that never has an answer ready
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[OperatorEvent] {
        &self.transcript
    }

    pub fn questions(&self) -> Vec<&str> {
        self.filter(|e| match e {
            OperatorEvent::Asked(q) => Some(q.as_str()),
            _ => None,
        })
    }

    pub fn notices(&self) -> Vec<&str> {
        self.filter(|e| match e {
            OperatorEvent::Notice(m) => Some(m.as_str()),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.filter(|e| match e {
            OperatorEvent::Warning(m) => Some(m.as_str()),
            _ => None,
        })
    }

    /// Answers not consumed yet
    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }

    fn filter<'a, F>(&'a self, pick: F) -> Vec<&'a str>
    where
        F: Fn(&'a OperatorEvent) -> Option<&'a str>,
    {
        self.transcript.iter().filter_map(pick).collect()
    }
}

impl Operator for ScriptedOperator {
    fn ask(&mut self, question: &str) -> Result<String, OperatorError> {
        self.transcript.push(OperatorEvent::Asked(question.to_string()));
        self.answers.pop_front().ok_or(OperatorError::Closed)
    }

    fn notify(&mut self, message: &str) {
        self.transcript.push(OperatorEvent::Notice(message.to_string()));
    }

    fn warn(&mut self, message: &str) {
        self.transcript.push(OperatorEvent::Warning(message.to_string()));
    }
}
