//! Error types for mesh reading.

use thiserror::Error;

/// Errors that can occur while parsing an STL stream.
#[derive(Error, Debug)]
pub enum StlError {
    /// The stream is too short or malformed before the facet records.
    #[error("malformed STL header: {0}")]
    BadHeader(String),

    /// A facet record is truncated or carries an unparsable value.
    #[error("malformed facet record: {0}")]
    BadRecord(String),

    /// The ASCII token stream deviated from the grammar.
    #[error("found {found:?}, expected {expected}")]
    UnexpectedToken {
        /// The literal that was read.
        found: String,
        /// What the grammar required at this position.
        expected: &'static str,
    },

    /// The underlying reader failed.
    #[error("I/O error reading mesh: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mesh reading.
pub type Result<T> = std::result::Result<T, StlError>;
