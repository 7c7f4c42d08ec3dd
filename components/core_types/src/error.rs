//! Runtime error types for the Rill VM.
//!
//! Every fallible core operation reports failure as a [`RuntimeError`]:
//! a human-readable message plus a coarse [`ErrorKind`]. The interpreter
//! pushes the error into the failing fiber's error slot and unwinds; the
//! message text is the contract observed by scripts and embedders.

use std::fmt;

/// The kind of runtime error.
///
/// These correspond to the error taxonomy of the Rill core: they
/// classify a failure without changing the reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operand or argument of the wrong type
    Type,
    /// Index outside a container's bounds
    Range,
    /// Missing attribute or map key
    Lookup,
    /// Write to an immutable attribute or object
    Immutability,
    /// Operand types an operator does not support
    Operator,
    /// A failed `assert(...)` call
    Assertion,
}

/// A runtime error with message and kind.
///
/// This struct represents a failure raised by the value layer. It is
/// what the interpreter stores in a fiber's error slot.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, RuntimeError};
///
/// let error = RuntimeError::type_error("Right operand must be a numeric value.");
///
/// assert_eq!(error.kind, ErrorKind::Type);
/// assert_eq!(error.message, "Right operand must be a numeric value.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    /// The classification of this error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl RuntimeError {
    /// Create an error with an explicit kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
        }
    }

    /// Create a type error.
    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::new(ErrorKind::Type, message)
    }

    /// Create an out-of-range error.
    pub fn range_error(message: impl Into<String>) -> Self {
        RuntimeError::new(ErrorKind::Range, message)
    }

    /// Create a missing-attribute or missing-key error.
    pub fn lookup_error(message: impl Into<String>) -> Self {
        RuntimeError::new(ErrorKind::Lookup, message)
    }

    /// Create an immutability error.
    pub fn immutability_error(message: impl Into<String>) -> Self {
        RuntimeError::new(ErrorKind::Immutability, message)
    }

    /// Create an unsupported-operand error.
    pub fn operator_error(message: impl Into<String>) -> Self {
        RuntimeError::new(ErrorKind::Operator, message)
    }

    /// Create an assertion failure.
    pub fn assertion_error(message: impl Into<String>) -> Self {
        RuntimeError::new(ErrorKind::Assertion, message)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for fallible core operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
