//! Core error types for JSON decoding and path evaluation.

use std::error::Error as StdError;
use std::fmt;

/// Failure categories surfaced by the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Byte that no legal JSON production can start with or continue
    UnexpectedToken,
    /// Input ended before the current production was complete
    UnexpectedEof,
    /// Container nesting exceeded the hard limit
    NestingTooDeep,
    /// Malformed numeric literal (empty, stray characters, bad exponent)
    InvalidNumber,
    /// Numeric literal exceeds the representable range
    Overflow,
    /// String literal that cannot be unescaped to valid UTF-8
    MalformedString,
    /// Accessor called on a node of the wrong kind
    TypeMismatch,
    /// Object member lookup failed
    KeyNotFound,
    /// Array index lookup failed
    IndexOutOfRange,
    /// JSONPath expression could not be parsed or evaluated
    InvalidPath,
    /// Node has neither source bytes nor a modified value to emit
    NotSerializable,
    /// Mutation would make a node its own ancestor
    CycleDetected,
}

/// Error carried by every fallible operation in the crate.
///
/// Messages are human-readable and include the offending byte offset where
/// one exists. There are no stable numeric codes; match on [`ErrorKind`]
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[must_use]
    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    #[must_use]
    pub fn unexpected_token(index: usize) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken,
            format!("unexpected token at index {index}"),
        )
    }

    #[must_use]
    pub fn eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof, "unexpected end of input".into())
    }

    #[must_use]
    pub fn nesting_too_deep(index: usize) -> Self {
        Self::new(
            ErrorKind::NestingTooDeep,
            format!("maximum nesting depth exceeded at index {index}"),
        )
    }

    pub fn invalid_number(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidNumber, msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Overflow, msg.into())
    }

    pub fn malformed_string(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedString, msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, msg.into())
    }

    pub fn key_not_found(key: &str) -> Self {
        Self::new(ErrorKind::KeyNotFound, format!("key not found: {key}"))
    }

    pub fn index_out_of_range(idx: isize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfRange,
            format!("array index out of range: {idx}"),
        )
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPath, msg.into())
    }

    pub fn not_serializable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotSerializable, msg.into())
    }

    #[must_use]
    pub fn cycle_detected() -> Self {
        Self::new(
            ErrorKind::CycleDetected,
            "can't adopt a node into itself or one of its descendants".into(),
        )
    }
}
