//! Databinding Lexer
//!
//! Splits text into literal runs and directive delimiters. Only the syntax is
//! classified here; balance is the caller's concern, so a stray `}}` is just
//! another token.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CURLY_DELIMITER_RE: Regex = Regex::new(r"\{\{|\}\}").unwrap();
    static ref ALL_DELIMITER_RE: Regex = Regex::new(r"\{\{|\}\}|\[\[|\]\]").unwrap();
}

/// Which directive delimiters are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiters {
    /// `{{ }}` only.
    CurlyOnly,
    /// `{{ }}` and `[[ ]]`.
    CurlyAndSquare,
}

impl Delimiters {
    fn pattern(self) -> &'static Regex {
        match self {
            Delimiters::CurlyOnly => &CURLY_DELIMITER_RE,
            Delimiters::CurlyAndSquare => &ALL_DELIMITER_RE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Curly,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'s> {
    Open(Bracket, &'s str),
    Close(Bracket, &'s str),
    Text(&'s str),
}

impl<'s> Token<'s> {
    /// The exact slice of input this token covers.
    pub fn as_str(&self) -> &'s str {
        match self {
            Token::Open(_, text) | Token::Close(_, text) | Token::Text(text) => *text,
        }
    }
}

/// Iterator over the tokens of one input string.
pub struct BindingLexer<'s> {
    input: &'s str,
    pos: usize,
    delimiters: Delimiters,
}

impl<'s> BindingLexer<'s> {
    pub fn new(input: &'s str, delimiters: Delimiters) -> Self {
        Self {
            input,
            pos: 0,
            delimiters,
        }
    }
}

impl<'s> Iterator for BindingLexer<'s> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Token<'s>> {
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        match self.delimiters.pattern().find_at(self.input, start) {
            Some(m) if m.start() == start => {
                self.pos = m.end();
                Some(classify_delimiter(m.as_str()))
            }
            Some(m) => {
                self.pos = m.start();
                Some(Token::Text(&self.input[start..m.start()]))
            }
            None => {
                self.pos = self.input.len();
                Some(Token::Text(&self.input[start..]))
            }
        }
    }
}

fn classify_delimiter(delimiter: &str) -> Token<'_> {
    match delimiter {
        "{{" => Token::Open(Bracket::Curly, delimiter),
        "}}" => Token::Close(Bracket::Curly, delimiter),
        "[[" => Token::Open(Bracket::Square, delimiter),
        _ => Token::Close(Bracket::Square, delimiter),
    }
}

pub fn lex(input: &str, delimiters: Delimiters) -> Vec<Token<'_>> {
    BindingLexer::new(input, delimiters).collect()
}
