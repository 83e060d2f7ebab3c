//! Observable session state.
//!
//! [`SessionState`] is the single explicitly-owned context threaded through
//! every dispatcher call. Handlers mutate it; the display model reads it for
//! status-bar rendering. There are no ambient globals.

/// Connection phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No connection to a server.
    Disconnected,
    /// TCP established, registration handshake in flight.
    Connecting,
    /// Registration complete; channel operations are permitted.
    Registered,
}

/// An in-flight latency probe awaiting its PONG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Token echoed back by the server, derived from the send time.
    pub token: u64,
    /// Millisecond timestamp the probe was sent.
    pub sent_ms: u64,
}

/// Process-lifetime session state.
///
/// Mutated only by dispatcher handlers, read by the display model. Dispatch
/// errors never leave this partially updated: a handler either completes or
/// touches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Current connection phase.
    pub phase: Phase,
    /// Own nickname (server-confirmed once registered).
    pub nick: String,
    /// Channel currently joined, if any.
    pub channel: Option<String>,
    /// Last measured round-trip latency in milliseconds.
    pub latency_ms: Option<u32>,
    /// Connect automatically at startup.
    pub autoconnect: bool,
    /// Show the clock and timestamp message lines.
    pub timestamps: bool,
    /// Selected theme id (1-based; lookup falls back to the first theme).
    pub theme_id: u8,
    /// Last rendered clock as (hour, minute); gates status redraws to
    /// minute granularity.
    pub last_clock: Option<(u8, u8)>,
    /// Latency probe awaiting its reply, if one is in flight.
    pub probe: Option<Probe>,
    /// Millisecond timestamp of the most recent probe send.
    pub last_probe_ms: u64,
}

impl SessionState {
    /// Create a disconnected session for the given nick.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            phase: Phase::Disconnected,
            nick: nick.into(),
            channel: None,
            latency_ms: None,
            autoconnect: true,
            timestamps: false,
            theme_id: 1,
            last_clock: None,
            probe: None,
            last_probe_ms: 0,
        }
    }

    /// Whether channel operations are permitted.
    pub fn is_registered(&self) -> bool {
        self.phase == Phase::Registered
    }
}
