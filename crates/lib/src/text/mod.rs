//! Textual notation for element trees.
//!
//! The human-facing format of the control channel: a JSON-shaped notation
//! with double-quoted strings (standard escape set including `\uXXXX`),
//! `i64` integer literals, floating-point literals, `true`/`false`,
//! `[v, ...]` lists and `{"k": v, ...}` maps. Whitespace between tokens is
//! insignificant. There is no `null` literal because the element model has
//! no null kind.
//!
//! Parsing is a hand-written recursive descent over a cursor that tracks
//! line and column, so every [`ParseError`] points at the offending input.
//! Rendering is the `Display` impl on [`Element`]; round-tripping text is a
//! structural equivalence, not a byte identity (formatting may differ).

use std::{collections::BTreeMap, fmt, fmt::Write as _, io::Read, str::FromStr};

use tracing::trace;

use crate::element::{Element, Payload};

pub mod errors;

pub use errors::ParseError;

/// Composites nested deeper than this are rejected rather than risking the
/// parser's stack.
const MAX_DEPTH: usize = 128;

/// Parses one element from `input`.
///
/// The whole input must be consumed: anything but whitespace after the
/// top-level element is a [`ParseError::TrailingData`].
///
/// ```
/// use confdata::text;
///
/// let cfg = text::parse(r#"{"a": [1, 2, 3], "b": true}"#)?;
/// assert_eq!(cfg.get_key("a")?.unwrap().len()?, 3);
/// # Ok::<(), confdata::Error>(())
/// ```
pub fn parse(input: &str) -> Result<Element, ParseError> {
    trace!(len = input.len(), "parsing element text");
    Parser::new(input).parse_root()
}

/// Streaming variant of [`parse`]: reads `reader` to its end and parses the
/// result, reporting I/O failures as [`ParseError::Io`].
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Element, ParseError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse(&buf)
}

impl Element {
    /// Parses an element from its textual notation. See [`parse`].
    pub fn from_text(input: &str) -> Result<Element, ParseError> {
        parse(input)
    }

    /// Parses an element from a stream of textual notation. See
    /// [`parse_reader`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Element, ParseError> {
        parse_reader(reader)
    }
}

impl FromStr for Element {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Cursor over the input text. `line` and `column` are 1-based; the column
/// counts bytes within the line.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn parse_root(mut self) -> Result<Element, ParseError> {
        self.skip_whitespace();
        let element = self.parse_value(0)?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(ParseError::TrailingData {
                line: self.line,
                column: self.column,
            });
        }
        Ok(element)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += ch.len_utf8() as u32;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.bump();
        }
    }

    fn unexpected(&self, found: char) -> ParseError {
        ParseError::UnexpectedChar {
            found,
            line: self.line,
            column: self.column,
        }
    }

    fn end_of_input(&self) -> ParseError {
        ParseError::UnexpectedEnd {
            line: self.line,
            column: self.column,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(self.unexpected(ch)),
            None => Err(self.end_of_input()),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Element, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                line: self.line,
                column: self.column,
            });
        }
        match self.peek() {
            None => Err(self.end_of_input()),
            Some('"') => Ok(Element::from(self.parse_string()?)),
            Some('[') => self.parse_list(depth),
            Some('{') => self.parse_map(depth),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_number(),
            Some(ch) if ch.is_ascii_alphabetic() => self.parse_keyword(),
            Some(ch) => Err(self.unexpected(ch)),
        }
    }

    fn parse_keyword(&mut self) -> Result<Element, ParseError> {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphabetic()) {
            self.bump();
        }
        match &self.input[start..self.pos] {
            "true" => Ok(Element::from(true)),
            "false" => Ok(Element::from(false)),
            word => Err(ParseError::UnknownKeyword {
                keyword: word.to_string(),
                line,
                column,
            }),
        }
    }

    fn parse_number(&mut self) -> Result<Element, ParseError> {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        let mut real = false;
        if self.peek() == Some('-') {
            self.bump();
        }
        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => {
                    self.bump();
                }
                '.' | 'e' | 'E' => {
                    real = true;
                    self.bump();
                }
                // exponent signs; full validity is left to the numeric parse
                '+' | '-' => {
                    self.bump();
                }
                _ => break,
            }
        }
        let literal = &self.input[start..self.pos];
        let invalid = || ParseError::InvalidNumber {
            literal: literal.to_string(),
            line,
            column,
        };
        if real {
            literal
                .parse::<f64>()
                .map(Element::from)
                .map_err(|_| invalid())
        } else {
            literal
                .parse::<i64>()
                .map(Element::from)
                .map_err(|_| invalid())
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let (start_line, start_column) = (self.line, self.column);
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(ParseError::UnterminatedString {
                    line: start_line,
                    column: start_column,
                });
            };
            match ch {
                '"' => return Ok(out),
                '\\' => out.push(self.parse_escape()?),
                _ => out.push(ch),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, ParseError> {
        let (line, column) = (self.line, self.column);
        let Some(ch) = self.bump() else {
            return Err(self.end_of_input());
        };
        Ok(match ch {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => self.parse_unicode_escape(line, column)?,
            other => {
                return Err(ParseError::InvalidEscape {
                    escape: other.to_string(),
                    line,
                    column,
                });
            }
        })
    }

    fn parse_hex4(&mut self, line: u32, column: u32) -> Result<u16, ParseError> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let Some(ch) = self.bump() else {
                return Err(self.end_of_input());
            };
            let digit = ch.to_digit(16).ok_or_else(|| ParseError::InvalidEscape {
                escape: format!("u{ch}"),
                line,
                column,
            })?;
            value = (value << 4) | digit as u16;
        }
        Ok(value)
    }

    fn parse_unicode_escape(&mut self, line: u32, column: u32) -> Result<char, ParseError> {
        let bad = |unit: u16| ParseError::InvalidEscape {
            escape: format!("u{unit:04x}"),
            line,
            column,
        };
        let unit = self.parse_hex4(line, column)?;
        if (0xD800..0xDC00).contains(&unit) {
            // high surrogate; a low surrogate escape must follow
            if self.bump() != Some('\\') || self.bump() != Some('u') {
                return Err(bad(unit));
            }
            let low = self.parse_hex4(line, column)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(bad(low));
            }
            let combined = 0x10000 + (((unit as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
            char::from_u32(combined).ok_or_else(|| bad(unit))
        } else if (0xDC00..0xE000).contains(&unit) {
            Err(bad(unit))
        } else {
            char::from_u32(unit as u32).ok_or_else(|| bad(unit))
        }
    }

    fn parse_list(&mut self, depth: usize) -> Result<Element, ParseError> {
        self.bump(); // '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Element::from(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    return Ok(Element::from(items));
                }
                Some(ch) => return Err(self.unexpected(ch)),
                None => return Err(self.end_of_input()),
            }
        }
    }

    fn parse_map(&mut self, depth: usize) -> Result<Element, ParseError> {
        self.bump(); // '{'
        let mut entries = BTreeMap::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Element::from(entries));
        }
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('"') => {}
                Some(ch) => return Err(self.unexpected(ch)),
                None => return Err(self.end_of_input()),
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            // re-setting a key replaces its value, never duplicates
            entries.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(Element::from(entries));
                }
                Some(ch) => return Err(self.unexpected(ch)),
                None => return Err(self.end_of_input()),
            }
        }
    }
}

/// Renders the element in the textual notation: maps as `{"k": v, ...}` in
/// sorted key order, lists as `[v, ...]`, scalars as their literal form.
///
/// Integral reals keep a `.1` fractional digit so the literal re-parses as a
/// real. Non-finite reals (`inf`, `NaN`) fall outside the grammar and only
/// round-trip through the wire format.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner.borrow() {
            Payload::Int(v) => write!(f, "{v}"),
            Payload::Real(v) => write_real(f, *v),
            Payload::Bool(v) => write!(f, "{v}"),
            Payload::Str(s) => write_quoted(f, s),
            Payload::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Payload::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_real(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_finite() && value == value.trunc() {
        write!(f, "{value:.1}")
    } else {
        write!(f, "{value}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{0008}' => f.write_str("\\b")?,
            '\u{000C}' => f.write_str("\\f")?,
            ch if (ch as u32) < 0x20 => write!(f, "\\u{:04x}", ch as u32)?,
            ch => f.write_char(ch)?,
        }
    }
    f.write_str("\"")
}
