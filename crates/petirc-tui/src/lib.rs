//! Terminal front end for petirc
//!
//! A thin shell over the pure state machines in [`petirc_app`]: this crate
//! owns the TCP transport, keyboard input, the fixed 40x25 character grid,
//! and the cooperative main loop. All dispatch and display logic lives in
//! `petirc-app`; this crate only moves bytes and paints cells.

pub mod input;
pub mod runtime;
pub mod screen;
pub mod transport;
pub mod ui;

pub use input::{InputState, KeyInput};
pub use runtime::{Runtime, RuntimeError};
pub use screen::CharGrid;
pub use transport::{DEFAULT_PORT, Transport, TransportError};
