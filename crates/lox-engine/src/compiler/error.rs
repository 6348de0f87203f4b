//! Compile-time diagnostics.

use std::fmt;

/// The three contexts spec.md §7 distinguishes in a compile-error message:
/// at end-of-file, at a specific lexeme, or omitted entirely (scanner-
/// originated error tokens carry their own message and have no lexeme to
/// point at).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtContext {
    Eof,
    Lexeme(String),
}

/// A single compile error, tied to the source line it was reported at.
///
/// The compiler collects these rather than stopping at the first one: it
/// recovers via `synchronize` and keeps parsing so one run can report
/// every syntax error in the file, matching
/// `examples/original_source/c/source/compile.c`'s panic-mode recovery.
///
/// Implemented by hand rather than via `#[derive(thiserror::Error)]`: the
/// `at` clause is conditionally present (`Some`/`None`, and `Some` itself
/// splits into `Eof`/`Lexeme`), which doesn't fit thiserror's
/// single-format-string-per-variant model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub line: u32,
    pub at: Option<AtContext>,
    pub message: String,
}

impl CompileError {
    pub fn new(line: u32, at: Option<AtContext>, message: impl Into<String>) -> Self {
        Self {
            line,
            at,
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error", self.line)?;
        match &self.at {
            Some(AtContext::Eof) => write!(f, " at EOF")?,
            Some(AtContext::Lexeme(lexeme)) => write!(f, " at '{lexeme}'")?,
            None => {}
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for CompileError {}
