//! The read loop.
//!
//! One raw line at a time: tokenize, split at semicolons, parse each
//! statement, execute, record the status. Interactive sessions prompt with
//! rustyline and recover from errors by reprompting; script and pipe input
//! stops at the first error on a line, matching classic non-interactive
//! shell behaviour.

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;

use log::debug;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use crate::execution::execute;
use crate::parse::{parse, split_statements, tokenize};
use crate::state::ShellState;

const PROMPT: &str = "$ ";

enum LineOutcome {
    Continue,
    Stop,
}

/// Interactive loop: prompt, read, run, repeat until EOF (Ctrl-D). Ctrl-C
/// abandons the current line and reprompts. History persists under $HOME.
pub fn run_interactive(shell: &mut ShellState) -> io::Result<()> {
    let config = Config::builder().auto_add_history(true).build();
    let mut editor: Editor<(), DefaultHistory> =
        Editor::with_config(config).map_err(io::Error::other)?;
    let history_path = history_path();
    let _ = editor.load_history(&history_path);

    loop {
        shell.line_number += 1;
        let line = match editor.readline(PROMPT) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(io::Error::other(err)),
        };
        if let LineOutcome::Stop = run_line(shell, &line) {
            break;
        }
    }

    let _ = editor.save_history(&history_path);
    println!();
    Ok(())
}

/// Non-interactive loop over a script file or piped standard input.
pub fn run_stream<R: BufRead>(shell: &mut ShellState, mut reader: R) -> io::Result<()> {
    loop {
        shell.line_number += 1;
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if let LineOutcome::Stop = run_line(shell, &line) {
            break;
        }
    }
    Ok(())
}

/// Tokenize, split, parse, and execute one raw line. A lex error discards
/// only the offending line; a parse error additionally stops non-interactive
/// input; a fatal error always stops the loop.
fn run_line(shell: &mut ShellState, line: &str) -> LineOutcome {
    let tokens = match tokenize(shell, line) {
        Ok(tokens) => tokens,
        Err(err) => {
            shell.report(&err);
            // Lex errors are line-local in every mode.
            if shell.fatal_error {
                return LineOutcome::Stop;
            }
            shell.had_error = false;
            return LineOutcome::Continue;
        }
    };

    for statement in split_statements(tokens) {
        let command = match parse(shell, &statement) {
            Ok(command) => command,
            Err(err) => {
                shell.report(&err);
                return recover(shell);
            }
        };
        if let Some(command) = command {
            shell.last_status = execute(shell, &command);
            debug!(
                "statement line={} status={}",
                shell.line_number, shell.last_status
            );
        }
        if shell.fatal_error {
            return LineOutcome::Stop;
        }
    }
    LineOutcome::Continue
}

/// After a reported parse error: interactive sessions clear the flag and
/// reprompt, everything else stops. Fatal errors always stop.
fn recover(shell: &mut ShellState) -> LineOutcome {
    if shell.fatal_error {
        return LineOutcome::Stop;
    }
    shell.had_error = false;
    if shell.is_interactive {
        LineOutcome::Continue
    } else {
        LineOutcome::Stop
    }
}

fn history_path() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".minishell_history")
}
