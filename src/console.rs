//! Operator console
//!
//! All interactive output and line input goes through [`Console`], so the
//! selection menus can be replayed from a script in tests.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

/// The operator closed the input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled by user")
    }
}

impl std::error::Error for Cancelled {}

/// Line-oriented interaction with the operator
pub trait Console {
    /// Print a full line
    fn say(&mut self, text: &str);

    /// Overwrite the current line with a progress counter
    fn progress(&mut self, text: &str);

    /// Print `question` and block until a line of input arrives.
    ///
    /// The answer is trimmed. A closed input stream yields [`Cancelled`].
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Console bound to the process stdin/stdout
#[derive(Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    fn progress(&mut self, text: &str) {
        print!("{text}\r");
        io::stdout().flush().ok();
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        print!("{question}");
        io::stdout().flush().ok();

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Err(Cancelled.into());
        }
        Ok(line.trim().to_string())
    }
}

/// Console that replays canned answers and records everything printed
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    /// Every line printed, prompts included
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Whether any recorded line contains `needle`
    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn progress(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.output.push(question.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer.trim().to_string()),
            None => Err(Cancelled.into()),
        }
    }
}
