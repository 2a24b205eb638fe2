//! Error types for G-code generation.

use thiserror::Error;

/// Errors that can occur while emitting commands.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// Invalid printer configuration.
    #[error("invalid printer configuration: {0}")]
    InvalidConfig(String),

    /// The command sink rejected a write. Fatal; the stream is
    /// unusable after a partial command.
    #[error("write to command sink failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for G-code operations.
pub type Result<T> = std::result::Result<T, GcodeError>;
