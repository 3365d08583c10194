//! Single-pass CMake scanner.
//!
//! Works on bytes with explicit depth tracking. All delimiters are ASCII, so
//! every offset produced here lands on a UTF-8 character boundary.

use crate::grammar::Token;

/// A delimiter that was opened but never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Quote,
    Bracket,
}

impl Delimiter {
    pub fn describe(self) -> &'static str {
        match self {
            Delimiter::Paren => "unbalanced parenthesis",
            Delimiter::Quote => "unterminated quoted argument",
            Delimiter::Bracket => "unterminated bracket argument or comment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unclosed {
    pub delimiter: Delimiter,
    pub offset: usize,
}

/// A command name followed by an opening parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub name: &'a str,
    pub start: usize,
    pub open_paren: usize,
}

const BLOCK_OPENERS: &[&str] = &["if", "foreach", "while", "function", "macro", "block"];
const BLOCK_CLOSERS: &[&str] = &[
    "endif",
    "endforeach",
    "endwhile",
    "endfunction",
    "endmacro",
    "endblock",
];

pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
    }

    /// Advance to the next `name(` at top level, skipping comments.
    pub fn next_command(&mut self) -> Option<Command<'a>> {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'#' {
                self.pos = self.skip_comment(self.pos).unwrap_or(self.bytes.len());
                continue;
            }
            let at_word_start = self.pos == 0 || !is_ident(self.bytes[self.pos - 1]);
            if !(is_ident_start(b) && at_word_start) {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            let mut end = start;
            while end < self.bytes.len() && is_ident(self.bytes[end]) {
                end += 1;
            }
            let mut paren = end;
            while paren < self.bytes.len() && matches!(self.bytes[paren], b' ' | b'\t') {
                paren += 1;
            }
            self.pos = end;
            if paren < self.bytes.len() && self.bytes[paren] == b'(' {
                return Some(Command {
                    name: &self.source[start..end],
                    start,
                    open_paren: paren,
                });
            }
        }
        None
    }

    /// Skip a comment starting at `at` (which holds `#`).
    ///
    /// Returns the offset just past the comment; for a line comment that is
    /// the newline itself, which stays part of the surrounding text.
    fn skip_comment(&self, at: usize) -> Result<usize, Unclosed> {
        if let Some(level) = self.bracket_open(at + 1) {
            return self
                .bracket_close(at + 1 + level + 2, level)
                .ok_or(Unclosed {
                    delimiter: Delimiter::Bracket,
                    offset: at,
                });
        }
        let mut i = at;
        while i < self.bytes.len() && self.bytes[i] != b'\n' {
            i += 1;
        }
        Ok(i)
    }

    /// If a bracket opener `[=*[` starts at `at`, return its `=` count.
    fn bracket_open(&self, at: usize) -> Option<usize> {
        if self.bytes.get(at) != Some(&b'[') {
            return None;
        }
        let mut level = 0;
        while self.bytes.get(at + 1 + level) == Some(&b'=') {
            level += 1;
        }
        (self.bytes.get(at + 1 + level) == Some(&b'[')).then_some(level)
    }

    /// Find the end of `]=*]` with `level` equals, searching from `from`.
    fn bracket_close(&self, from: usize, level: usize) -> Option<usize> {
        let mut i = from;
        while i < self.bytes.len() {
            if self.bytes[i] == b']' {
                let mut j = i + 1;
                let mut eq = 0;
                while self.bytes.get(j) == Some(&b'=') {
                    eq += 1;
                    j += 1;
                }
                if eq == level && self.bytes.get(j) == Some(&b']') {
                    return Some(j + 1);
                }
            }
            i += 1;
        }
        None
    }

    /// Skip a quoted argument starting at `at` (which holds `"`).
    fn skip_quoted(&self, at: usize) -> Result<usize, Unclosed> {
        let mut i = at + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'"' => return Ok(i + 1),
                _ => i += 1,
            }
        }
        Err(Unclosed {
            delimiter: Delimiter::Quote,
            offset: at,
        })
    }

    /// Find the `)` matching the `(` at `open`.
    pub fn matching_paren(&self, open: usize) -> Result<usize, Unclosed> {
        let mut stack = vec![open];
        let mut i = open + 1;
        let mut token_start = true;

        while i < self.bytes.len() {
            let b = self.bytes[i];
            match b {
                b'(' => {
                    stack.push(i);
                    i += 1;
                    token_start = true;
                }
                b')' => {
                    stack.pop();
                    if stack.is_empty() {
                        return Ok(i);
                    }
                    i += 1;
                    token_start = true;
                }
                b'"' => {
                    i = self.skip_quoted(i)?;
                    token_start = false;
                }
                b'#' => {
                    i = self.skip_comment(i)?;
                    token_start = true;
                }
                b'\\' => {
                    i += 2;
                    token_start = false;
                }
                b'[' if token_start => match self.bracket_open(i) {
                    Some(level) => {
                        i = self.bracket_close(i + level + 2, level).ok_or(Unclosed {
                            delimiter: Delimiter::Bracket,
                            offset: i,
                        })?;
                        token_start = false;
                    }
                    None => {
                        i += 1;
                        token_start = false;
                    }
                },
                _ => {
                    token_start = is_space(b);
                    i += 1;
                }
            }
        }

        Err(Unclosed {
            delimiter: Delimiter::Paren,
            offset: stack.last().copied().unwrap_or(open),
        })
    }

    /// Offset just past the first newline at or after `from` that lies
    /// outside any command's arguments and any bracket comment.
    ///
    /// Returns `None` when there is no such newline or a delimiter is left
    /// open.
    pub fn line_end(&self, from: usize) -> Option<usize> {
        let mut i = from;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\n' => return Some(i + 1),
                b'#' => i = self.skip_comment(i).ok()?,
                b'(' => i = self.matching_paren(i).ok()? + 1,
                _ => i += 1,
            }
        }
        None
    }

    /// Block nesting (`if`/`endif`, `foreach`/`endforeach`, ...) after the
    /// remaining commands, starting from `depth`.
    pub fn block_depth(&mut self, mut depth: usize) -> usize {
        while let Some(command) = self.next_command() {
            let name = command.name.to_ascii_lowercase();
            if BLOCK_OPENERS.contains(&name.as_str()) {
                depth += 1;
            } else if BLOCK_CLOSERS.contains(&name.as_str()) {
                depth = depth.saturating_sub(1);
            }
            match self.matching_paren(command.open_paren) {
                Ok(close) => self.seek(close + 1),
                Err(_) => break,
            }
        }
        depth
    }

    /// Split the argument region `start..end` (already known to be balanced)
    /// into tokens on top-level whitespace.
    ///
    /// Returns `None` if the region holds nested unquoted parentheses.
    pub fn tokenize(&self, start: usize, end: usize) -> Option<Vec<Token<'a>>> {
        let mut tokens = Vec::new();
        let mut i = start;
        let mut current: Option<(usize, bool)> = None;

        macro_rules! finish {
            ($at:expr) => {
                if let Some((from, quoted)) = current.take() {
                    tokens.push(Token {
                        text: &self.source[from..$at],
                        quoted,
                    });
                }
            };
        }

        while i < end {
            let b = self.bytes[i];
            match b {
                b'(' | b')' => return None,
                b'#' => {
                    finish!(i);
                    i = self.skip_comment(i).ok()?;
                }
                b'"' => {
                    if current.is_none() {
                        current = Some((i, true));
                    }
                    i = self.skip_quoted(i).ok()?;
                }
                b'[' if current.is_none() => match self.bracket_open(i) {
                    Some(level) => {
                        current = Some((i, true));
                        i = self.bracket_close(i + level + 2, level)?;
                        finish!(i);
                    }
                    None => {
                        current = Some((i, false));
                        i += 1;
                    }
                },
                b'\\' => {
                    if current.is_none() {
                        current = Some((i, false));
                    }
                    i += 2;
                }
                _ if is_space(b) => {
                    finish!(i);
                    i += 1;
                }
                _ => {
                    if current.is_none() {
                        current = Some((i, false));
                    }
                    i += 1;
                }
            }
        }
        finish!(end.min(i));

        Some(tokens)
    }
}
