//! Wire-level protocol support for petirc.
//!
//! This crate owns the two leaf concerns of the client's receive path and
//! performs no I/O of its own:
//!
//! - [`LineFramer`]: accumulates raw transport bytes into discrete
//!   terminated lines, carrying partial lines across reads and enforcing
//!   the protocol's line-length cap.
//! - [`Message`]: a zero-copy parsed view over one complete line (optional
//!   sender prefix, command token, parameters, trailing free text).
//!
//! Framing and parsing are deliberately separate: the framer never looks
//! inside a line, and the parser only ever sees complete lines.

mod errors;
mod framer;
mod message;

pub use errors::ParseError;
pub use framer::{LineFramer, MAX_LINE_LEN, RawLine};
pub use message::{Message, is_channel};
