//! Process-wide shell context.
//!
//! Error flags and the line counter live in an explicit `ShellState` owned by
//! the driver and passed by mutable reference into the lexer, parser, and
//! executor. No module touches hidden global state.

use crate::error::{ErrorKind, ShellError};

pub struct ShellState {
    /// Name used as the diagnostics prefix: argv[0], or the script path when
    /// one was given on the command line.
    pub program_name: String,
    /// 1-based line counter, incremented by the driver before each read.
    pub line_number: u32,
    pub is_interactive: bool,
    /// Recoverable error seen for the current line; cleared once the line's
    /// remaining statements have been abandoned.
    pub had_error: bool,
    /// Unrecoverable error; the driver stops reading and exits with status 2.
    pub fatal_error: bool,
    /// Exit status of the last executed statement.
    pub last_status: i32,
}

impl ShellState {
    pub fn new(program_name: impl Into<String>, is_interactive: bool) -> Self {
        ShellState {
            program_name: program_name.into(),
            line_number: 0,
            is_interactive,
            had_error: false,
            fatal_error: false,
            last_status: 0,
        }
    }

    /// Print a diagnostic as `<program>: <line>: <message>` (with the error's
    /// context appended in parentheses when present) and record the matching
    /// flag. Syntax errors go to stdout, everything else to stderr; this
    /// split mirrors historical shell behaviour and is relied on by the
    /// scripted tests.
    pub fn report(&mut self, err: &ShellError) {
        if err.is_recoverable() {
            self.had_error = true;
        } else {
            self.fatal_error = true;
        }
        let mut line = format!("{}: {}: {}", self.program_name, self.line_number, err.message);
        if let Some(context) = &err.context {
            line.push_str(&format!(" ({context})"));
        }
        if err.kind == ErrorKind::Parse {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_sets_the_matching_flag() {
        let mut shell = ShellState::new("minishell", false);
        shell.report(&ShellError::new(ErrorKind::Lex, "bad"));
        assert!(shell.had_error);
        assert!(!shell.fatal_error);

        let mut shell = ShellState::new("minishell", false);
        shell.report(&ShellError::new(ErrorKind::Fatal, "broken"));
        assert!(shell.fatal_error);
        assert!(!shell.had_error);
    }
}
