//! Error types for protocol parsing.
//!
//! Parse failures are recoverable by design: the dispatcher drops a
//! malformed line at the point of detection and carries on. Nothing here
//! terminates the client.

use thiserror::Error;

/// Errors from parsing one protocol line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The line was empty.
    #[error("empty line")]
    Empty,

    /// A sender prefix was present but no command token followed it.
    #[error("missing command token")]
    MissingCommand,
}
