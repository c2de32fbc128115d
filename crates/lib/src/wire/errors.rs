//! Error types for the wire format.

use thiserror::Error;

/// Structured error types for decoding wire-format data.
///
/// Every variant carries the byte offset of the inconsistency. Decoding
/// never reports a kind mismatch — that condition belongs to the accessor
/// protocol, not the codec — and a failed decode yields no partial tree.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended in the middle of an encoded element.
    #[error("unexpected end of wire data at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// A kind marker outside the known set.
    #[error("unknown kind marker {marker:#04x} at offset {offset}")]
    UnknownMarker { marker: u8, offset: usize },

    /// A boolean payload byte other than 0x00 or 0x01.
    #[error("invalid boolean byte {value:#04x} at offset {offset}")]
    InvalidBool { value: u8, offset: usize },

    /// String data that is not valid UTF-8.
    #[error("invalid UTF-8 in string data at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A declared count or length that cannot fit in the remaining bytes.
    #[error("declared count {count} exceeds available data at offset {offset}")]
    InvalidCount { count: u32, offset: usize },

    /// Bytes left over after the top-level element.
    #[error("trailing bytes after element at offset {offset}")]
    TrailingBytes { offset: usize },

    /// Composite nesting beyond the decoder's depth limit.
    #[error("nesting deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}

impl DecodeError {
    /// The byte offset of the inconsistency.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::UnexpectedEnd { offset }
            | DecodeError::UnknownMarker { offset, .. }
            | DecodeError::InvalidBool { offset, .. }
            | DecodeError::InvalidUtf8 { offset }
            | DecodeError::InvalidCount { offset, .. }
            | DecodeError::TrailingBytes { offset }
            | DecodeError::TooDeep { offset, .. } => *offset,
        }
    }
}

// Conversion from DecodeError to the main Error type
impl From<DecodeError> for crate::Error {
    fn from(err: DecodeError) -> Self {
        crate::Error::Decode(err)
    }
}
