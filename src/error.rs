//! Error types and reporting for the shell.
//!
//! Instead of returning bare strings, the lexer and parser return
//! `ShellError`, which carries:
//! - Error kind (lexing, parsing, redirection, fatal)
//! - Human-readable message
//! - Optional context about what input caused the error
//!
//! The kind also decides which stream a diagnostic goes to: parse errors are
//! printed to standard output, everything else to standard error (see
//! `ShellState::report`).

use std::fmt;

/// Categorized error types for better diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unterminated quote while scanning a line; aborts that line only
    Lex,
    /// Syntax error during parsing (unexpected token, trailing operator)
    Parse,
    /// Malformed redirection (missing filename after the operator)
    Redirection,
    /// Unrecoverable internal error; the whole shell unwinds with status 2
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "Lex error"),
            ErrorKind::Parse => write!(f, "Syntax error"),
            ErrorKind::Redirection => write!(f, "Redirection error"),
            ErrorKind::Fatal => write!(f, "Fatal error"),
        }
    }
}

/// Rich error type with context information
#[derive(Debug, Clone)]
pub struct ShellError {
    pub kind: ErrorKind,
    pub message: String,
    /// Additional context explaining what was being processed
    pub context: Option<String>,
}

impl ShellError {
    /// Create a new error with just the kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ShellError {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Add context string (e.g., "Expected: cmd < filename")
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind != ErrorKind::Fatal
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ShellError {}

/// Convenience type alias for Results with ShellError
pub type ShellResult<T> = Result<T, ShellError>;
