//! Side-effects produced by the dispatchers.
//!
//! Handlers are pure functions from input and session state to a list of
//! [`Action`]s; the runtime executes them. Nothing ever calls back into a
//! dispatcher from an action.

use crate::display::DisplayLine;

/// Instructions for the runtime, produced by protocol and command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Queue one line for the transport. The terminator is appended by the
    /// transport, never included here.
    Send(String),

    /// Append one line to the scrollback display.
    Emit(DisplayLine),

    /// Terminate the main loop.
    Quit,
}
