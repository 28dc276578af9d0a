//! Recursive-descent parser: token stream to command tree.
//!
//! Precedence, lowest binding first: background/sequence chaining, logical
//! AND/OR lists, pipelines, simple commands. All binary operators are
//! left-associative and built iteratively, so `a | b | c` becomes
//! `Pipe(Pipe(a, b), c)` and evaluation order reads left to right.

use log::trace;

use crate::error::{ErrorKind, ShellError, ShellResult};
use crate::parse::{Command, CommandKind, SimpleCommand, Token, TokenKind};
use crate::state::ShellState;

/// Parse one statement (a semicolon-split, sentinel-terminated token slice)
/// into a command tree. `Ok(None)` means the statement held nothing to run.
/// Any partially built subtree is dropped on the error path.
pub fn parse(shell: &ShellState, tokens: &[Token]) -> ShellResult<Option<Command>> {
    if tokens.is_empty() {
        return Ok(None);
    }
    let mut cursor = Cursor::new(tokens);
    let command = parse_command(&mut cursor)?;
    if !cursor.at_end_of_line() {
        return Err(unexpected(cursor.peek()));
    }
    trace!(
        "parse line={} parsed={}",
        shell.line_number,
        command.is_some()
    );
    Ok(command)
}

/// Shared cursor over one statement's tokens. Never advances past the
/// `EndOfLine` sentinel.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    prev: Option<usize>,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Cursor {
            tokens,
            pos: 0,
            prev: None,
        }
    }

    fn peek(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    fn previous(&self) -> Option<&'a Token> {
        self.prev.map(|idx| &self.tokens[idx])
    }

    fn at_end_of_line(&self) -> bool {
        self.peek().kind == TokenKind::EndOfLine
    }

    /// Consume the current token when it matches one of `kinds`, recording it
    /// as the previous token. The sentinel never matches.
    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if self.at_end_of_line() {
            return false;
        }
        if kinds.contains(&self.peek().kind) {
            self.prev = Some(self.pos);
            self.pos += 1;
            return true;
        }
        false
    }
}

fn unexpected(token: &Token) -> ShellError {
    ShellError::new(
        ErrorKind::Parse,
        format!("Syntax error: \"{}\" unexpected", token.lexeme),
    )
}

fn unexpected_end_of_line() -> ShellError {
    ShellError::new(ErrorKind::Parse, "Syntax error: end of line unexpected")
}

/// command := logical_list ( '&' logical_list? )*
///
/// Each `&` marks the just-parsed subtree as background; further input on the
/// same statement folds into `Sequence` nodes.
fn parse_command(cursor: &mut Cursor) -> ShellResult<Option<Command>> {
    let Some(mut command) = parse_logical_list(cursor)? else {
        return Ok(None);
    };
    while cursor.matches(&[TokenKind::Background]) {
        mark_latest_background(&mut command);
        if cursor.at_end_of_line() {
            return Ok(Some(command));
        }
        let Some(right) = parse_logical_list(cursor)? else {
            return Ok(Some(command));
        };
        command = Command::new(CommandKind::Sequence(Box::new(command), Box::new(right)));
    }
    Ok(Some(command))
}

/// Mark the most recently parsed subtree as background: the tree root, or the
/// right child once previous chaining has wrapped it in a `Sequence`.
fn mark_latest_background(command: &mut Command) {
    match &mut command.kind {
        CommandKind::Sequence(_, right) => right.background = true,
        _ => command.background = true,
    }
}

/// logical_list := pipeline ( ('&&' | '||') pipeline )*
fn parse_logical_list(cursor: &mut Cursor) -> ShellResult<Option<Command>> {
    let Some(mut command) = parse_pipeline(cursor)? else {
        return Ok(None);
    };
    while cursor.matches(&[TokenKind::And, TokenKind::Or]) {
        let is_and = cursor
            .previous()
            .is_some_and(|t| t.kind == TokenKind::And);
        if cursor.at_end_of_line() {
            return Err(unexpected_end_of_line());
        }
        let Some(right) = parse_pipeline(cursor)? else {
            return Err(unexpected_end_of_line());
        };
        let (left, right) = (Box::new(command), Box::new(right));
        command = Command::new(if is_and {
            CommandKind::And(left, right)
        } else {
            CommandKind::Or(left, right)
        });
    }
    Ok(Some(command))
}

/// pipeline := simple ( '|' simple )*
fn parse_pipeline(cursor: &mut Cursor) -> ShellResult<Option<Command>> {
    let Some(mut command) = parse_simple(cursor)? else {
        return Ok(None);
    };
    while cursor.matches(&[TokenKind::Pipe]) {
        if cursor.at_end_of_line() {
            return Err(unexpected_end_of_line());
        }
        let Some(right) = parse_simple(cursor)? else {
            return Err(unexpected_end_of_line());
        };
        command = Command::new(CommandKind::Pipe(Box::new(command), Box::new(right)));
    }
    Ok(Some(command))
}

/// simple := AssignmentWord* ( Word (Word | AssignmentWord | redirect)* )?
///
/// A statement of only assignment-words is a valid environment-mutation-only
/// command, regardless of what follows. After the first bare word,
/// assignment-words are plain positional arguments.
fn parse_simple(cursor: &mut Cursor) -> ShellResult<Option<Command>> {
    let mut simple = SimpleCommand::default();

    while cursor.matches(&[TokenKind::AssignmentWord]) {
        let assignment = cursor.previous().expect("matched token");
        simple.assignments.push(assignment.lexeme.clone());
    }

    if cursor.matches(&[TokenKind::Word]) {
        let word = cursor.previous().expect("matched token");
        simple.argv.push(word.lexeme.clone());
        parse_trailing(cursor, &mut simple)?;
    } else if !simple.assignments.is_empty() {
        // Assignment-only: no process will be spawned.
    } else if cursor.at_end_of_line() {
        return Ok(None);
    } else {
        let token = cursor.previous().unwrap_or_else(|| cursor.peek());
        return Err(unexpected(token));
    }

    Ok(Some(Command::new(CommandKind::Simple(simple))))
}

/// Arguments and redirections after the command word. Each redirection
/// operator must be followed by exactly one word naming the file; a later
/// redirection of the same direction replaces the earlier one.
fn parse_trailing(cursor: &mut Cursor, simple: &mut SimpleCommand) -> ShellResult<()> {
    const REDIRECTS: [TokenKind; 3] = [
        TokenKind::RedirectIn,
        TokenKind::RedirectOut,
        TokenKind::RedirectAppend,
    ];
    loop {
        if cursor.matches(&[TokenKind::Word, TokenKind::AssignmentWord]) {
            let word = cursor.previous().expect("matched token");
            simple.argv.push(word.lexeme.clone());
        } else if cursor.matches(&REDIRECTS) {
            let op = cursor.previous().expect("matched token");
            let (op_kind, op_lexeme) = (op.kind, op.lexeme.clone());
            if !cursor.matches(&[TokenKind::Word]) {
                return Err(ShellError::new(
                    ErrorKind::Redirection,
                    format!("Syntax error: expected filename after '{op_lexeme}'"),
                ));
            }
            let filename = cursor.previous().expect("matched token").lexeme.clone();
            match op_kind {
                TokenKind::RedirectIn => simple.input_file = Some(filename),
                TokenKind::RedirectOut => {
                    simple.output_file = Some(filename);
                    simple.append = false;
                }
                TokenKind::RedirectAppend => {
                    simple.output_file = Some(filename);
                    simple.append = true;
                }
                _ => unreachable!("redirect match yields a redirect kind"),
            }
        } else {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tokenize;

    fn parse_line(input: &str) -> ShellResult<Option<Command>> {
        let shell = ShellState::new("minishell", false);
        let tokens = tokenize(&shell, input).unwrap();
        parse(&shell, &tokens)
    }

    fn simple_argv(command: &Command) -> Vec<String> {
        match &command.kind {
            CommandKind::Simple(simple) => simple.argv.clone(),
            other => panic!("expected simple command, got {other:?}"),
        }
    }

    #[test]
    fn simple_command_round_trip() {
        let command = parse_line("echo hi\n").unwrap().unwrap();
        assert!(!command.background);
        match &command.kind {
            CommandKind::Simple(simple) => {
                assert_eq!(simple.argv, vec!["echo", "hi"]);
                assert!(simple.assignments.is_empty());
                assert!(simple.input_file.is_none());
                assert!(simple.output_file.is_none());
            }
            other => panic!("expected simple command, got {other:?}"),
        }
    }

    #[test]
    fn empty_statement_parses_to_nothing() {
        assert_eq!(parse_line("\n").unwrap(), None);
        assert_eq!(parse_line("   \n").unwrap(), None);
    }

    #[test]
    fn pipes_are_left_associative() {
        let command = parse_line("a | b | c\n").unwrap().unwrap();
        match &command.kind {
            CommandKind::Pipe(left, right) => {
                assert_eq!(simple_argv(right), vec!["c"]);
                match &left.kind {
                    CommandKind::Pipe(ll, lr) => {
                        assert_eq!(simple_argv(ll), vec!["a"]);
                        assert_eq!(simple_argv(lr), vec!["b"]);
                    }
                    other => panic!("expected nested pipe, got {other:?}"),
                }
            }
            other => panic!("expected pipe, got {other:?}"),
        }
    }

    #[test]
    fn logical_list_binds_looser_than_pipe() {
        let command = parse_line("a | b && c || d\n").unwrap().unwrap();
        let CommandKind::Or(or_left, or_right) = &command.kind else {
            panic!("expected or at root");
        };
        assert_eq!(simple_argv(or_right), vec!["d"]);
        let CommandKind::And(and_left, and_right) = &or_left.kind else {
            panic!("expected and under or");
        };
        assert_eq!(simple_argv(and_right), vec!["c"]);
        assert!(matches!(and_left.kind, CommandKind::Pipe(_, _)));
    }

    #[test]
    fn assignments_collect_before_command_word() {
        let command = parse_line("FOO=1 BAR=2 env -i\n").unwrap().unwrap();
        let CommandKind::Simple(simple) = &command.kind else {
            panic!("expected simple");
        };
        assert_eq!(simple.assignments, vec!["FOO=1", "BAR=2"]);
        assert_eq!(simple.argv, vec!["env", "-i"]);
    }

    #[test]
    fn assignment_only_statement_is_valid() {
        let command = parse_line("FOO=bar\n").unwrap().unwrap();
        let CommandKind::Simple(simple) = &command.kind else {
            panic!("expected simple");
        };
        assert!(simple.argv.is_empty());
        assert_eq!(simple.assignments, vec!["FOO=bar"]);
    }

    #[test]
    fn assignment_only_before_logical_operator_is_valid() {
        let command = parse_line("FOO=bar && echo ok\n").unwrap().unwrap();
        let CommandKind::And(left, right) = &command.kind else {
            panic!("expected and");
        };
        let CommandKind::Simple(simple) = &left.kind else {
            panic!("expected simple left");
        };
        assert!(simple.argv.is_empty());
        assert_eq!(simple_argv(right), vec!["echo", "ok"]);
    }

    #[test]
    fn assignment_words_after_command_word_are_arguments() {
        let command = parse_line("env FOO=bar\n").unwrap().unwrap();
        let CommandKind::Simple(simple) = &command.kind else {
            panic!("expected simple");
        };
        assert_eq!(simple.argv, vec!["env", "FOO=bar"]);
        assert!(simple.assignments.is_empty());
    }

    #[test]
    fn redirections_attach_to_the_simple_command() {
        let command = parse_line("sort < in.txt > out.txt\n").unwrap().unwrap();
        let CommandKind::Simple(simple) = &command.kind else {
            panic!("expected simple");
        };
        assert_eq!(simple.input_file.as_deref(), Some("in.txt"));
        assert_eq!(simple.output_file.as_deref(), Some("out.txt"));
        assert!(!simple.append);

        let command = parse_line("log >> file.txt\n").unwrap().unwrap();
        let CommandKind::Simple(simple) = &command.kind else {
            panic!("expected simple");
        };
        assert!(simple.append);
    }

    #[test]
    fn background_marks_the_preceding_list() {
        let command = parse_line("sleep 1 &\n").unwrap().unwrap();
        assert!(command.background);

        let command = parse_line("a & b\n").unwrap().unwrap();
        let CommandKind::Sequence(left, right) = &command.kind else {
            panic!("expected sequence");
        };
        assert!(left.background);
        assert!(!right.background);
        assert!(!command.background);

        let command = parse_line("a & b &\n").unwrap().unwrap();
        let CommandKind::Sequence(left, right) = &command.kind else {
            panic!("expected sequence");
        };
        assert!(left.background);
        assert!(right.background);
    }

    #[test]
    fn leading_operator_is_a_syntax_error() {
        let err = parse_line("| foo\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(err.message, "Syntax error: \"|\" unexpected");
    }

    #[test]
    fn trailing_operator_is_a_syntax_error() {
        let err = parse_line("a |\n").unwrap_err();
        assert_eq!(err.message, "Syntax error: end of line unexpected");

        let err = parse_line("a &&\n").unwrap_err();
        assert_eq!(err.message, "Syntax error: end of line unexpected");
    }

    #[test]
    fn redirect_without_filename_is_an_error() {
        let err = parse_line("cat <\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redirection);
        assert_eq!(err.message, "Syntax error: expected filename after '<'");

        let err = parse_line("cat > | wc\n").unwrap_err();
        assert_eq!(err.message, "Syntax error: expected filename after '>'");
    }

    #[test]
    fn trailing_garbage_after_assignment_only_is_an_error() {
        let err = parse_line("FOO=1 > out\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(err.message, "Syntax error: \">\" unexpected");
    }
}
