use std::{collections::BTreeMap, fmt};

use colored::Colorize;
use log::debug;

use super::position::Position;

/// A single recorded compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic<'a> {
    pub position: Position,
    pub message: &'a str,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.position.is_internal() {
            write!(f, "ERROR {} in low level system", self.message)
        } else {
            write!(f, "ERROR {} at position {}", self.message, self.position)
        }
    }
}

/// Run-scoped sink for every diagnostic produced during a compilation.
///
/// The error count goes up on every report. Only the first message for a
/// given position is kept, and only such a first-time report sets the
/// has-errors flag. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    errors: usize,
    has_errors: bool,
    messages: BTreeMap<Position, String>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, position: Position, message: impl Into<String>) {
        let message = message.into();
        debug!(
            "{}",
            Diagnostic {
                position,
                message: &message
            }
        );

        self.errors += 1;
        if !self.messages.contains_key(&position) {
            self.has_errors = true;
            self.messages.insert(position, message);
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn message_at(&self, position: Position) -> Option<&str> {
        self.messages.get(&position).map(String::as_str)
    }

    // diagnostics in source order, internal ones first
    pub fn diagnostics(&self) -> impl Iterator<Item = Diagnostic<'_>> {
        self.messages.iter().map(|(position, message)| Diagnostic {
            position: *position,
            message,
        })
    }

    pub fn summary(&self) -> String {
        if self.errors > 0 {
            format!("[ERROR] Compilation failed with {} error(s)", self.errors)
        } else {
            "[SUCCESS] Compilation successful, no errors".into()
        }
    }
}

/// Print every recorded diagnostic to stdout, pointing at the source line.
pub fn print_diagnostics(file: &str, reporter: &ErrorReporter, source: &str) {
    let lines: Vec<&str> = source.split('\n').collect();

    for diagnostic in reporter.diagnostics() {
        println!("{}: {}", "error".red().bold(), diagnostic.message);

        let position = diagnostic.position;
        if position.is_internal() {
            println!(" {} {}", "-->".bright_blue(), "in low level system".dimmed());
            continue;
        }

        println!(
            " {} {}:{}:{}",
            "-->".bright_blue(),
            file,
            position.line,
            position.column
        );

        let Some(line) = position.line.checked_sub(1).and_then(|l| lines.get(l)) else {
            continue;
        };

        let gutter = position.line.to_string();
        let padding = " ".repeat(gutter.len());
        println!("{} |", padding);
        println!("{} | {}", gutter, line);
        println!(
            "{} | {}{}",
            padding,
            " ".repeat((position.column.max(1) - 1) as usize),
            "^".red()
        );
    }
}
