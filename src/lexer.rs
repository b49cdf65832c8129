use std::collections::VecDeque;
use std::fmt;

/// The kind of a pattern token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    End,
    Error,
    Slash,
    Path,
    OpenCurly,
    CloseCurly,
    Slot,
    Regexp,
    Question,
    Star,
    Pipe,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::End => "end",
            Self::Error => "error",
            Self::Slash => "/",
            Self::Path => "path",
            Self::OpenCurly => "{",
            Self::CloseCurly => "}",
            Self::Slot => "slot",
            Self::Regexp => "regexp",
            Self::Question => "?",
            Self::Star => "*",
            Self::Pipe => "|",
        };
        f.write_str(kind)
    }
}

/// A single pattern token. For `Error` tokens the text carries the
/// lexer's message rather than input bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub line: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.text.is_empty() && self.text != self.kind.to_string() {
            write!(f, ":{:?}", self.text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    // slashes, curlies and literal path runs
    Normal,
    // immediately after `{`: a slot identifier
    SlotName,
    // after the identifier: `?`, `*`, `|` or `}`
    SlotTail,
    // after `|`: raw regexp source up to the closing `}`
    Regex,
}

/// A hand-written tokeniser over a pattern string with arbitrary-depth
/// lookahead. After the input ends it keeps returning `End`; after an
/// error it keeps returning the same `Error` token.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    mode: Mode,
    peeked: VecDeque<Token>,
    failed: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            mode: Mode::Normal,
            peeked: VecDeque::new(),
            failed: None,
        }
    }

    /// Advances to the next token and returns it.
    pub(crate) fn next(&mut self) -> Token {
        match self.peeked.pop_front() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    /// Looks `n` tokens ahead (n >= 1) without consuming anything.
    pub(crate) fn peek(&mut self, n: usize) -> &Token {
        while self.peeked.len() < n {
            let token = self.scan();
            self.peeked.push_back(token);
        }
        &self.peeked[n - 1]
    }

    fn scan(&mut self) -> Token {
        if let Some(failed) = &self.failed {
            return failed.clone();
        }
        match self.mode {
            Mode::Normal => self.scan_normal(),
            Mode::SlotName => self.scan_slot_name(),
            Mode::SlotTail => self.scan_slot_tail(),
            Mode::Regex => self.scan_regex(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        let text = &self.input[start..self.pos];
        self.line += text.matches('\n').count();
        Token {
            kind,
            text: text.to_string(),
            start,
            line: self.line,
        }
    }

    fn error(&mut self, start: usize, message: String) -> Token {
        let token = Token {
            kind: TokenKind::Error,
            text: message,
            start,
            line: self.line,
        };
        self.failed = Some(token.clone());
        token
    }

    fn scan_normal(&mut self) -> Token {
        let start = self.pos;
        match self.rest().chars().next() {
            None => Token {
                kind: TokenKind::End,
                text: String::new(),
                start,
                line: self.line,
            },
            Some('/') => {
                self.pos += 1;
                self.token(TokenKind::Slash, start)
            }
            Some('{') => {
                self.pos += 1;
                self.mode = Mode::SlotName;
                self.token(TokenKind::OpenCurly, start)
            }
            Some(_) => {
                let rest = self.rest();
                let end = rest.find(|c| c == '/' || c == '{').unwrap_or(rest.len());
                self.pos += end;
                self.token(TokenKind::Path, start)
            }
        }
    }

    fn scan_slot_name(&mut self) -> Token {
        let start = self.pos;
        match self.rest().chars().next() {
            None => self.error(start, "unclosed slot".to_string()),
            Some(c) if !c.is_ascii_alphanumeric() && c != '_' => {
                self.error(start, format!("unexpected character {:?} in slot name", c))
            }
            Some(_) => {
                let rest = self.rest();
                let end = rest
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .unwrap_or(rest.len());
                self.pos += end;
                self.mode = Mode::SlotTail;
                self.token(TokenKind::Slot, start)
            }
        }
    }

    fn scan_slot_tail(&mut self) -> Token {
        let start = self.pos;
        match self.rest().chars().next() {
            None => self.error(start, "unclosed slot".to_string()),
            Some('?') => {
                self.pos += 1;
                self.token(TokenKind::Question, start)
            }
            Some('*') => {
                self.pos += 1;
                self.token(TokenKind::Star, start)
            }
            Some('|') => {
                self.pos += 1;
                self.mode = Mode::Regex;
                self.token(TokenKind::Pipe, start)
            }
            Some('}') => {
                self.pos += 1;
                self.mode = Mode::Normal;
                self.token(TokenKind::CloseCurly, start)
            }
            Some(c) => self.error(start, format!("unexpected character {:?} in slot", c)),
        }
    }

    // Consumes regexp source up to the matching `}`, balancing
    // character classes and curly quantifiers so both may contain `}`.
    fn scan_regex(&mut self) -> Token {
        let start = self.pos;
        let mut in_class = false;
        let mut depth = 0usize;
        let mut escaped = false;
        for (i, c) in self.rest().char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '[' if !in_class => in_class = true,
                ']' if in_class => in_class = false,
                '{' if !in_class => depth += 1,
                '}' if !in_class => {
                    if depth == 0 {
                        self.pos = start + i;
                        self.mode = Mode::SlotTail;
                        return self.token(TokenKind::Regexp, start);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        self.pos = self.input.len();
        self.error(start, "unclosed regexp in slot".to_string())
    }
}
