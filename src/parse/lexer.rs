//! Lexer for shell input.
//!
//! One call scans one line (up to and including its newline) in a single
//! left-to-right pass with one character of lookahead, producing a flat token
//! stream terminated by exactly one `EndOfLine` sentinel.

use log::trace;

use crate::error::{ErrorKind, ShellError, ShellResult};
use crate::parse::{Token, TokenKind};
use crate::state::ShellState;

/// Characters that end an unquoted word.
const WORD_DELIMITERS: &str = " \r\t\n;|&<>#";

pub fn tokenize(shell: &ShellState, line: &str) -> ShellResult<Vec<Token>> {
    let mut lexer = Lexer::new(line);
    let tokens = lexer.scan()?;
    trace!(
        "lex line={} tokens={}",
        shell.line_number,
        tokens.len()
    );
    Ok(tokens)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn scan(&mut self) -> ShellResult<Vec<Token>> {
        while !self.at_end() {
            self.skip_blanks();
            if self.at_end() {
                break;
            }
            self.scan_token()?;
            if self
                .tokens
                .last()
                .is_some_and(|t| t.kind == TokenKind::EndOfLine)
            {
                // Only one line is ever tokenized per call.
                break;
            }
        }
        if !self
            .tokens
            .last()
            .is_some_and(|t| t.kind == TokenKind::EndOfLine)
        {
            self.tokens.push(Token::end_of_line());
        }
        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> ShellResult<()> {
        match self.peek() {
            ';' => {
                self.advance();
                self.push(TokenKind::Semicolon, ";");
            }
            '<' => {
                self.advance();
                self.push(TokenKind::RedirectIn, "<");
            }
            '>' => {
                self.advance();
                if self.matches('>') {
                    self.push(TokenKind::RedirectAppend, ">>");
                } else {
                    self.push(TokenKind::RedirectOut, ">");
                }
            }
            '&' => {
                self.advance();
                if self.matches('&') {
                    self.push(TokenKind::And, "&&");
                } else {
                    self.push(TokenKind::Background, "&");
                }
            }
            '|' => {
                self.advance();
                if self.matches('|') {
                    self.push(TokenKind::Or, "||");
                } else {
                    self.push(TokenKind::Pipe, "|");
                }
            }
            '\n' => {
                self.advance();
                self.tokens.push(Token::end_of_line());
            }
            '#' => {
                self.advance();
                while !self.at_end() && self.peek() != '\n' {
                    self.advance();
                }
            }
            _ => self.word()?,
        }
        Ok(())
    }

    /// Accumulate a word, honoring single- and double-quote spans where the
    /// delimiter set is suspended. Quote characters are stripped from the
    /// lexeme. The assembled word is classified as an assignment word when a
    /// valid identifier precedes the first `=` and no quoted segment came
    /// before it.
    fn word(&mut self) -> ShellResult<()> {
        let mut text = String::new();
        let mut found_equals = false;
        let mut quote_before_equals = false;

        while !self.at_end() && !WORD_DELIMITERS.contains(self.peek()) {
            let ch = self.peek();
            if ch == '\'' || ch == '"' {
                let quote = self.advance();
                while !self.at_end() && self.peek() != quote {
                    text.push(self.advance());
                }
                if self.at_end() {
                    return Err(ShellError::new(
                        ErrorKind::Lex,
                        "Unterminated quoted string",
                    )
                    .with_context(format!("Missing closing {quote}")));
                }
                self.advance();
                if !found_equals {
                    quote_before_equals = true;
                }
            } else {
                if ch == '=' && !found_equals {
                    found_equals = true;
                }
                text.push(self.advance());
            }
        }

        // Quotes producing zero characters yield nothing at all.
        if text.is_empty() {
            return Ok(());
        }

        let kind = classify_word(&text, quote_before_equals);
        self.tokens.push(Token::new(kind, text));
        Ok(())
    }

    fn skip_blanks(&mut self) {
        while !self.at_end() && matches!(self.peek(), ' ' | '\r' | '\t') {
            self.advance();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.at_end() || self.chars[self.pos] != expected {
            return false;
        }
        self.pos += 1;
        true
    }

    fn push(&mut self, kind: TokenKind, lexeme: &str) {
        self.tokens.push(Token::new(kind, lexeme));
    }
}

fn classify_word(text: &str, quote_before_equals: bool) -> TokenKind {
    if quote_before_equals {
        return TokenKind::Word;
    }
    match text.find('=') {
        Some(pos) if pos > 0 && is_valid_identifier(&text[..pos]) => TokenKind::AssignmentWord,
        _ => TokenKind::Word,
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}
