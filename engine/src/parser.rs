//! Pull parser over a single JSON object.
//!
//! The parser does not build values. It only finds the boundaries of the raw
//! key and value tokens of one top-level object and hands them out one at a
//! time, alternating key, value, key, value. Decoding the raw bytes is left to
//! the caller, which is what lets [`FieldList::from_tokens`] work against any
//! source implementing [`TokenSource`].
//!
//! [`FieldList::from_tokens`]: crate::FieldList::from_tokens

use crate::Limits;
use thiserror::Error;

/// Errors produced while pulling tokens.
///
/// [`ParseError::EndOfInput`] is not a failure by itself: it is how a source
/// signals that the object has no more members.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("end of input")]
    EndOfInput,

    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("input of {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("nesting depth at offset {offset} exceeds limit of {limit}")]
    NestingTooDeep { offset: usize, limit: usize },
}

/// A source of raw JSON object tokens.
///
/// Calls alternate between returning a raw key token (a quoted, possibly
/// escaped JSON string) and a raw value token (any JSON value). Once the
/// object is exhausted every call returns [`ParseError::EndOfInput`].
pub trait TokenSource<'a> {
    /// Pull the next raw token.
    fn parse(&mut self) -> Result<&'a [u8], ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Key { first: bool },
    Value,
    Done,
}

/// [`TokenSource`] over an in-memory byte slice.
#[derive(Debug)]
pub struct ObjParser<'a> {
    input: &'a [u8],
    pos: usize,
    state: State,
    limits: Limits,
}

impl<'a> ObjParser<'a> {
    /// Create a parser with default limits.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_limits(input, Limits::default())
    }

    /// Create a parser with explicit limits.
    pub fn with_limits(input: &'a [u8], limits: Limits) -> Self {
        Self {
            input,
            pos: 0,
            state: State::Start,
            limits,
        }
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn syntax(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn describe(byte: Option<u8>) -> String {
        match byte {
            None => "end of input".to_string(),
            Some(b) if b.is_ascii_graphic() => format!("'{}'", b as char),
            Some(b) => format!("byte 0x{:02x}", b),
        }
    }

    /// Consume the closing brace and anything after it.
    fn finish(&mut self) -> Result<&'a [u8], ParseError> {
        self.pos += 1;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.syntax(format!(
                "unexpected {} after object",
                Self::describe(self.peek())
            )));
        }
        self.state = State::Done;
        Err(ParseError::EndOfInput)
    }

    fn open(&mut self) -> Result<(), ParseError> {
        if self.input.len() > self.limits.max_input_size {
            return Err(ParseError::InputTooLarge {
                size: self.input.len(),
                limit: self.limits.max_input_size,
            });
        }
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                self.state = State::Key { first: true };
                Ok(())
            }
            other => Err(self.syntax(format!(
                "expected '{{', found {}",
                Self::describe(other)
            ))),
        }
    }

    fn parse_key(&mut self, first: bool) -> Result<&'a [u8], ParseError> {
        self.skip_whitespace();
        // A trailing comma never reaches this check: the comma is consumed below.
        if self.peek() == Some(b'}') {
            return self.finish();
        }
        if !first {
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                other => {
                    return Err(self.syntax(format!(
                        "expected ',' or '}}', found {}",
                        Self::describe(other)
                    )))
                }
            }
        }
        match self.peek() {
            Some(b'"') => {
                let token = self.scan_string()?;
                self.state = State::Value;
                Ok(token)
            }
            other => Err(self.syntax(format!(
                "expected string key, found {}",
                Self::describe(other)
            ))),
        }
    }

    fn parse_value(&mut self) -> Result<&'a [u8], ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => return Err(ParseError::EndOfInput),
            Some(b':') => self.pos += 1,
            other => {
                return Err(self.syntax(format!(
                    "expected ':', found {}",
                    Self::describe(other)
                )))
            }
        }
        self.skip_whitespace();
        let token = match self.peek() {
            None => return Err(ParseError::EndOfInput),
            Some(b'"') => self.scan_string()?,
            Some(b'{' | b'[') => self.scan_composite()?,
            Some(_) => self.scan_scalar()?,
        };
        self.state = State::Key { first: false };
        Ok(token)
    }

    /// Scan a quoted string, escapes included. Decoding happens later.
    fn scan_string(&mut self) -> Result<&'a [u8], ParseError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::Syntax {
                        offset: start,
                        message: "unterminated string".into(),
                    })
                }
                Some(b'\\') => self.pos += 2,
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(&self.input[start..self.pos]);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Scan a balanced array or object. Bracket kinds are not matched here;
    /// a mismatch surfaces when the token is decoded.
    fn scan_composite(&mut self) -> Result<&'a [u8], ParseError> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::Syntax {
                        offset: start,
                        message: "unterminated value".into(),
                    })
                }
                Some(b'"') => {
                    self.scan_string()?;
                }
                Some(b'{' | b'[') => {
                    depth += 1;
                    if depth > self.limits.max_nesting_depth {
                        return Err(ParseError::NestingTooDeep {
                            offset: self.pos,
                            limit: self.limits.max_nesting_depth,
                        });
                    }
                    self.pos += 1;
                }
                Some(b'}' | b']') => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(&self.input[start..self.pos]);
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Scan a bare literal or number up to the next delimiter.
    fn scan_scalar(&mut self) -> Result<&'a [u8], ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b',' | b'}' | b']' | b':' | b' ' | b'\t' | b'\n' | b'\r') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.syntax(format!(
                "expected value, found {}",
                Self::describe(self.peek())
            )));
        }
        Ok(&self.input[start..self.pos])
    }
}

impl<'a> TokenSource<'a> for ObjParser<'a> {
    fn parse(&mut self) -> Result<&'a [u8], ParseError> {
        if self.state == State::Start {
            self.open()?;
        }
        match self.state {
            State::Start => unreachable!("open() leaves the start state"),
            State::Key { first } => self.parse_key(first),
            State::Value => self.parse_value(),
            State::Done => Err(ParseError::EndOfInput),
        }
    }
}
