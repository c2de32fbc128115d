//! Error types for the textual notation.

use thiserror::Error;

/// Structured error types for parsing the textual element notation.
///
/// Every syntax variant carries the 1-based line and column of the offending
/// input; [`ParseError::location`] extracts them uniformly. A failed parse
/// yields no partial tree.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
    /// A character that cannot start or continue the expected token.
    #[error("unexpected character '{found}' at line {line}, column {column}")]
    UnexpectedChar { found: char, line: u32, column: u32 },

    /// Input ended in the middle of an element.
    #[error("unexpected end of input at line {line}, column {column}")]
    UnexpectedEnd { line: u32, column: u32 },

    /// A string literal with no closing quote.
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: u32, column: u32 },

    /// A backslash escape outside the supported set.
    #[error("invalid escape sequence '\\{escape}' at line {line}, column {column}")]
    InvalidEscape {
        escape: String,
        line: u32,
        column: u32,
    },

    /// A numeric literal that does not parse as an integer or real.
    #[error("invalid number literal '{literal}' at line {line}, column {column}")]
    InvalidNumber {
        literal: String,
        line: u32,
        column: u32,
    },

    /// A bare word other than `true` or `false`. The notation has no `null`
    /// literal; absence is a query-result concept, not a parseable value.
    #[error("unknown keyword '{keyword}' at line {line}, column {column}")]
    UnknownKeyword {
        keyword: String,
        line: u32,
        column: u32,
    },

    /// Non-whitespace input after the top-level element.
    #[error("trailing data after element at line {line}, column {column}")]
    TrailingData { line: u32, column: u32 },

    /// Composite nesting beyond the parser's depth limit.
    #[error("nesting deeper than {limit} levels at line {line}, column {column}")]
    TooDeep { limit: usize, line: u32, column: u32 },

    /// Reading from the underlying stream failed.
    #[error("I/O error while reading element text: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// The 1-based line and column of the offending input, when known.
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            ParseError::UnexpectedChar { line, column, .. }
            | ParseError::UnexpectedEnd { line, column }
            | ParseError::UnterminatedString { line, column }
            | ParseError::InvalidEscape { line, column, .. }
            | ParseError::InvalidNumber { line, column, .. }
            | ParseError::UnknownKeyword { line, column, .. }
            | ParseError::TrailingData { line, column }
            | ParseError::TooDeep { line, column, .. } => Some((*line, *column)),
            ParseError::Io(_) => None,
        }
    }
}

// Conversion from ParseError to the main Error type
impl From<ParseError> for crate::Error {
    fn from(err: ParseError) -> Self {
        crate::Error::Parse(err)
    }
}
