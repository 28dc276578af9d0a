//! Tokens, the command tree, and statement splitting.
//!
//! A raw input line flows through three stages: `tokenize` turns it into a
//! flat `Vec<Token>` ending in a single `EndOfLine` sentinel,
//! `split_statements` cuts that vector at semicolons into independent
//! statements (each re-terminated with its own sentinel), and `parse` builds
//! one `Command` tree per statement.

mod lexer;
mod parser;

pub use lexer::tokenize;
pub use parser::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    AssignmentWord,
    Pipe,           // |
    And,            // &&
    Or,             // ||
    Semicolon,      // ;
    Background,     // &
    RedirectIn,     // <
    RedirectOut,    // >
    RedirectAppend, // >>
    EndOfLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
        }
    }

    fn end_of_line() -> Self {
        Token::new(TokenKind::EndOfLine, "\n")
    }
}

/// A single program invocation: argv, leading `KEY=VALUE` assignments, and
/// optional I/O redirections. An argv-less command with assignments mutates
/// the shell's own environment instead of spawning a process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleCommand {
    pub argv: Vec<String>,
    pub assignments: Vec<String>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub append: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Simple(SimpleCommand),
    Pipe(Box<Command>, Box<Command>),
    And(Box<Command>, Box<Command>),
    Or(Box<Command>, Box<Command>),
    Sequence(Box<Command>, Box<Command>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub background: bool,
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Command {
            kind,
            background: false,
        }
    }
}

/// Split one line's tokens at semicolons into independent statements. Each
/// statement is terminated by its own `EndOfLine` sentinel so the parser can
/// treat every segment like a full line. Empty segments (stray or doubled
/// semicolons) come out as a lone sentinel and parse to nothing.
pub fn split_statements(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut statements = Vec::new();
    let mut current = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::Semicolon => {
                current.push(Token::end_of_line());
                statements.push(std::mem::take(&mut current));
            }
            TokenKind::EndOfLine => {
                current.push(token);
                statements.push(std::mem::take(&mut current));
            }
            _ => current.push(token),
        }
    }
    // A well-formed token stream ends at the sentinel, but guard against a
    // trailing segment anyway.
    if !current.is_empty() {
        current.push(Token::end_of_line());
        statements.push(current);
    }
    statements
}
