//! Error types for element operations.
//!
//! This module defines the structured errors raised by the strict accessor
//! and mutator surface of [`Element`](super::Element): kind mismatches and
//! out-of-range list indices. The exception-free surface (`as_*`, `set_*`,
//! `find_opt`) never produces these; it converts them into `Option`/`bool`
//! results instead.

use thiserror::Error;

use super::Kind;

/// Structured error types for operations on [`Element`](super::Element) handles.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElementError {
    /// An operation was invoked on an element of the wrong kind.
    #[error("{operation}: expected {expected} element, found {actual}")]
    TypeMismatch {
        operation: &'static str,
        expected: Kind,
        actual: Kind,
    },

    /// A list index outside `[0, len)` was passed to `get` or `set`.
    #[error("list index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl ElementError {
    pub(crate) fn mismatch(operation: &'static str, expected: Kind, actual: Kind) -> Self {
        ElementError::TypeMismatch {
            operation,
            expected,
            actual,
        }
    }

    /// Check if this error is a kind mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ElementError::TypeMismatch { .. })
    }

    /// Check if this error is an out-of-range list index.
    pub fn is_index_out_of_bounds(&self) -> bool {
        matches!(self, ElementError::IndexOutOfBounds { .. })
    }

    /// The operation that was rejected, if this is a kind mismatch.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            ElementError::TypeMismatch { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

// Conversion from ElementError to the main Error type
impl From<ElementError> for crate::Error {
    fn from(err: ElementError) -> Self {
        crate::Error::Element(err)
    }
}
