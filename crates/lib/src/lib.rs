//!
//! Confdata: the data-representation and serialization layer of the control
//! channel. Cooperating processes of the suite exchange configuration and
//! command data as recursive trees of data elements; this library defines
//! that tree, its two exchange formats, and the lookup protocol over it.
//!
//! ## Core Concepts
//!
//! * **Elements (`element::Element`)**: shared handles onto nodes of a
//!   recursive tree carrying one of six kinds — integer, real, boolean,
//!   string, list, or map. Maps iterate in sorted key order.
//! * **Accessor protocol**: every operation exists in a strict form that
//!   reports a kind mismatch and an exception-free form (`as_*`, `set_*`)
//!   that folds failure into `Option`/`bool`.
//! * **Text format (`text`)**: the JSON-shaped human-facing notation, parsed
//!   with line/column error reporting and rendered via `Display`.
//! * **Wire format (`wire`)**: the compact binary transport encoding used
//!   between processes; symmetric with itself and bit-exact for reals.
//! * **Identifiers**: `/`-delimited key paths resolved recursively through
//!   nested maps by `Element::find`.
//!
//! This crate performs no network I/O and schedules no concurrent work; the
//! surrounding service layer owns sockets, timeouts, and threading.
//!
//! ```
//! use confdata::Element;
//!
//! let cfg = Element::from_text(r#"{"server": {"timeout": 30, "tcp": true}}"#)?;
//! assert_eq!(cfg.find("server/timeout")?.unwrap().int_value()?, 30);
//!
//! let bytes = cfg.to_wire();
//! let decoded = Element::from_wire(&bytes)?;
//! assert_eq!(decoded, cfg);
//! # Ok::<(), confdata::Error>(())
//! ```

pub mod element;
pub mod text;
pub mod wire;

pub use element::{Element, ElementError, Kind};
pub use text::ParseError;
pub use wire::DecodeError;

/// Result type used throughout the confdata library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the confdata library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured element-operation errors from the element module
    #[error(transparent)]
    Element(ElementError),

    /// Structured text-notation errors from the text module
    #[error(transparent)]
    Parse(ParseError),

    /// Structured wire-format errors from the wire module
    #[error(transparent)]
    Decode(DecodeError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Element(_) => "element",
            Error::Parse(_) => "text",
            Error::Decode(_) => "wire",
        }
    }

    /// Check if this error is a kind mismatch from the accessor protocol.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::Element(err) if err.is_type_mismatch())
    }

    /// Check if this error is an out-of-range list index.
    pub fn is_index_out_of_bounds(&self) -> bool {
        matches!(self, Error::Element(err) if err.is_index_out_of_bounds())
    }

    /// Check if this error came from parsing the textual notation.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Check if this error came from decoding wire-format data.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Parse(ParseError::Io(_)))
    }
}
