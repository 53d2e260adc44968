//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Field-level failures are raised
//! underneath an [`ErrorKind::InvalidRecord`] frame carrying the position of
//! the offending record.

use derive_more::{Display, Error};

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the index from disk or stdin failed.
    #[display("I/O error")]
    Io,
    /// The payload looked compressed but could not be decompressed.
    #[display("invalid or corrupted compressed data")]
    Decompress,
    /// The payload is not text (not valid UTF-8).
    #[display("malformed document: {_0}")]
    MalformedDocument(#[error(not(source))] String),
    /// The assigned value is not valid JSON.
    #[display("malformed JSON: {_0}")]
    MalformedJson(#[error(not(source))] String),
    /// The JSON is valid but is not a search index (no `docs` array).
    #[display("invalid search index: missing required structure")]
    InvalidDocument,
    /// A record at the given position could not be read.
    #[display("invalid record at position {_0}")]
    InvalidRecord(#[error(not(source))] usize),
    /// A required field could not be found (or was `null`).
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// Details about the parsing failure.
        value: String,
    },
    /// Writing the index back out failed.
    #[display("failed to serialize search index")]
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Only reading can fail transiently; a broken index stays broken.
        matches!(self, Self::Io)
    }
}
