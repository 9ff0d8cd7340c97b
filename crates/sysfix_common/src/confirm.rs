//! Operator confirmation
//!
//! The engine never reads stdin itself; it asks a `Confirmer`. End of input
//! and read errors always resolve to the caller's default.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Operator answer to a confirmation question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Yes,
    No,
    /// Yes, and stop asking for the rest of the session
    AutomateAll,
}

impl Choice {
    /// Parse a typed answer; None for anything unrecognized
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Choice::Yes),
            "n" | "no" => Some(Choice::No),
            "a" | "all" | "automate" => Some(Choice::AutomateAll),
            _ => None,
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Choice::Yes => "y",
            Choice::No => "n",
            Choice::AutomateAll => "a",
        }
    }
}

/// Asks the operator before a destructive action
pub trait Confirmer {
    fn confirm(&mut self, question: &str, default: Choice) -> Choice;
}

impl<C: Confirmer + ?Sized> Confirmer for Box<C> {
    fn confirm(&mut self, question: &str, default: Choice) -> Choice {
        (**self).confirm(question, default)
    }
}

/// Attempts before an unrecognized answer falls back to the default
const MAX_ATTEMPTS: usize = 3;

/// Interactive confirmer over any reader/writer pair (stdin/stdout by default)
pub struct StdinConfirmer<R = io::StdinLock<'static>, W = io::Stdout> {
    input: R,
    output: W,
}

impl StdinConfirmer {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl Default for StdinConfirmer {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinConfirmer<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirmer for StdinConfirmer<R, W> {
    fn confirm(&mut self, question: &str, default: Choice) -> Choice {
        for _ in 0..MAX_ATTEMPTS {
            let shown = write!(
                self.output,
                "{}\n[y]es / [n]o / [a]utomate all remaining [{}]: ",
                question,
                default.hint()
            )
            .and_then(|_| self.output.flush());
            if shown.is_err() {
                return default;
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                // End of input
                Ok(0) | Err(_) => return default,
                Ok(_) => {}
            }

            if line.trim().is_empty() {
                return default;
            }
            if let Some(choice) = Choice::parse(&line) {
                return choice;
            }
            let _ = writeln!(self.output, "Please answer y, n or a.");
        }
        default
    }
}

/// Confirmer returning pre-recorded answers, for tests and scripted runs
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: VecDeque<Choice>,
    questions: Vec<String>,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            questions: Vec::new(),
        }
    }

    /// Questions asked so far
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn prompt_count(&self) -> usize {
        self.questions.len()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, question: &str, default: Choice) -> Choice {
        self.questions.push(question.to_string());
        // Exhausted script behaves like end of input
        self.answers.pop_front().unwrap_or(default)
    }
}
