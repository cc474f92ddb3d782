//! interp::tokenize
//!
//! Splits a command line into a bounded argument list.
//!
//! # Grammar
//!
//! ```text
//! line   := arg (' '+ arg)*
//! arg    := (char | '\' ' ' | '"' quoted '"')+
//! ```
//!
//! The tokenizer is a three-state machine:
//!
//! - `Normal`: a space ends the current argument, `"` enters `InQuote`,
//!   `\` enters `Escape`, anything else is accumulated.
//! - `InQuote`: everything up to the closing `"` is accumulated, spaces
//!   included. The quote characters themselves are dropped.
//! - `Escape`: a space is accumulated as a literal and the argument goes on.
//!   Any other character is kept together with its backslash.
//!
//! An unterminated quote runs to the end of the line. A trailing backslash is
//! kept. Runs of spaces never produce empty arguments. Parsing stops once
//! [`MAX_NUM_ARGS`] arguments are collected; the rest of the line is ignored.
//!
//! # Example
//!
//! ```
//! use toxbot::interp::tokenize::tokenize;
//!
//! let args = tokenize(r#"title 3 "my room""#, 64).unwrap();
//! assert_eq!(args.command(), Some("title"));
//! assert_eq!(args.get(2).map(|a| a.as_str()), Some("my room"));
//! assert!(args.get(2).unwrap().is_quoted());
//! ```

use serde::Serialize;
use thiserror::Error;

/// Maximum number of arguments, including the command name.
pub const MAX_NUM_ARGS: usize = 4;

/// Errors from tokenizing a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("argument {index} exceeds {capacity} bytes")]
    ArgumentTooLong { index: usize, capacity: usize },
}

/// One parsed argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    text: String,
    quoted: bool,
}

impl Arg {
    /// Create an argument.
    pub fn new(text: impl Into<String>, quoted: bool) -> Self {
        Self {
            text: text.into(),
            quoted,
        }
    }

    /// The argument text, with quotes stripped and escapes resolved.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether any part of the argument was enclosed in quotes.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }
}

impl AsRef<str> for Arg {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// A bounded argument list. Index 0 is the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Args {
    items: Vec<Arg>,
}

impl Args {
    /// Build an argument list from already-split words.
    ///
    /// Words beyond [`MAX_NUM_ARGS`] are dropped.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            items: words
                .iter()
                .take(MAX_NUM_ARGS)
                .map(|w| Arg::new(w.as_ref(), false))
                .collect(),
        }
    }

    /// The command name, if any argument was parsed.
    pub fn command(&self) -> Option<&str> {
        self.items.first().map(Arg::as_str)
    }

    /// Argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.items.get(index)
    }

    /// Arguments after the command name.
    pub fn rest(&self) -> &[Arg] {
        self.items.get(1..).unwrap_or(&[])
    }

    /// Number of arguments, including the command name.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was parsed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all arguments.
    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.items.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InQuote,
    Escape,
}

/// Accumulates one argument at a time.
struct Builder {
    capacity: usize,
    items: Vec<Arg>,
    buf: String,
    quoted: bool,
    started: bool,
}

impl Builder {
    fn push(&mut self, c: char) -> Result<(), TokenizeError> {
        if self.buf.len() + c.len_utf8() > self.capacity {
            return Err(TokenizeError::ArgumentTooLong {
                index: self.items.len(),
                capacity: self.capacity,
            });
        }
        self.buf.push(c);
        self.started = true;
        Ok(())
    }

    /// Close the current argument. Returns true once the list is full.
    fn finish(&mut self) -> bool {
        if self.started {
            self.items
                .push(Arg::new(std::mem::take(&mut self.buf), self.quoted));
            self.quoted = false;
            self.started = false;
        }
        self.items.len() == MAX_NUM_ARGS
    }
}

/// Tokenize a line (without its prefix).
///
/// `capacity` bounds each argument in bytes.
///
/// # Errors
///
/// Returns `TokenizeError::ArgumentTooLong` if an argument would exceed
/// `capacity`.
pub fn tokenize(line: &str, capacity: usize) -> Result<Args, TokenizeError> {
    let mut b = Builder {
        capacity,
        items: Vec::with_capacity(MAX_NUM_ARGS),
        buf: String::new(),
        quoted: false,
        started: false,
    };
    let mut state = State::Normal;

    for c in line.chars() {
        state = match (state, c) {
            (State::Normal, ' ') => {
                if b.finish() {
                    return Ok(Args { items: b.items });
                }
                State::Normal
            }
            (State::Normal, '"') => {
                b.quoted = true;
                b.started = true;
                State::InQuote
            }
            (State::Normal, '\\') => State::Escape,
            (State::Normal, c) => {
                b.push(c)?;
                State::Normal
            }
            (State::InQuote, '"') => State::Normal,
            (State::InQuote, c) => {
                b.push(c)?;
                State::InQuote
            }
            (State::Escape, ' ') => {
                b.push(' ')?;
                State::Normal
            }
            (State::Escape, c) => {
                b.push('\\')?;
                b.push(c)?;
                State::Normal
            }
        };
    }

    if state == State::Escape {
        b.push('\\')?;
    }
    b.finish();
    Ok(Args { items: b.items })
}
