//! Shell front end and executor.
//!
//! This crate exposes the lexer, parser, and execution engine as a library
//! so unit and integration tests can drive each stage without a terminal.

pub mod builtins;
pub mod error;
pub mod execution;
pub mod parse;
pub mod repl;
pub mod state;

pub use error::{ErrorKind, ShellError, ShellResult};
pub use parse::{
    parse, split_statements, tokenize, Command, CommandKind, SimpleCommand, Token, TokenKind,
};
pub use state::ShellState;
