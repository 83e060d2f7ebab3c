//! Application layer for petirc
//!
//! Pure state machines for the chat client, completely decoupled from I/O:
//! handlers consume parsed input and produce [`Action`] instructions for the
//! runtime to execute, so every dispatch path is testable in isolation.
//!
//! # Components
//!
//! - [`protocol`]: table-driven dispatch of incoming server lines
//! - [`command`]: table-driven dispatch of user slash-commands
//! - [`DisplayModel`]: bounded scrollback ring and status row over a fixed
//!   character grid
//! - [`SessionState`]: connection phase, nick, channel, latency, flags
//! - [`theme`]: immutable color-attribute tables keyed by display role

pub mod action;
pub mod command;
pub mod display;
pub mod protocol;
pub mod session;
pub mod theme;

pub use action::Action;
pub use display::{DisplayLine, DisplayModel, Role, Screen};
pub use session::{Phase, SessionState};
pub use theme::{Attr, Theme};
