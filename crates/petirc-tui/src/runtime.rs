//! Async runtime.
//!
//! The single cooperative loop that drives the client: one `tokio::select!`
//! over server bytes, terminal events, and a periodic tick, on a
//! current-thread runtime. Each arm handles one unit of work (one read
//! chunk, one key, one tick) and returns to the select, so no path can
//! starve the others.
//!
//! All protocol and command dispatch is delegated to the pure state
//! machines in `petirc_app`; this loop only feeds them and applies the
//! actions they return.

use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use chrono::Timelike;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use petirc_app::display::{COLS, INPUT_ROW};
use petirc_app::{
    Action, DisplayLine, DisplayModel, Phase, Role, Screen, SessionState, command, protocol, theme,
};
use petirc_proto::LineFramer;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{
    input::{InputState, KeyInput},
    screen::CharGrid,
    transport::{Transport, TransportError},
    ui,
};

/// Read buffer size for one transport chunk.
const READ_CHUNK: usize = 1024;

/// Tick period driving the keepalive probe and clock refresh.
const TICK_MS: u64 = 250;

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Startup options, straight from the command line.
#[derive(Debug, Clone)]
pub struct Options {
    /// Nickname to register with.
    pub nick: String,
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connect at startup.
    pub autoconnect: bool,
    /// Show timestamps (gutter and status clock).
    pub timestamps: bool,
    /// Initial theme id (1-based).
    pub theme_id: u8,
}

/// The TUI runtime.
///
/// Owns terminal setup/teardown, the transport, and the display state;
/// coordinates the session and display state machines.
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    session: SessionState,
    model: DisplayModel,
    grid: CharGrid,
    input: InputState,
    framer: LineFramer,
    transport: Option<Transport>,
    host: String,
    port: u16,
    started: Instant,
    dirty: bool,
}

impl Runtime {
    /// Create the runtime and take over the terminal.
    pub fn new(options: Options) -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        let mut session = SessionState::new(&options.nick);
        session.autoconnect = options.autoconnect;
        session.timestamps = options.timestamps;
        session.theme_id = options.theme_id;

        Ok(Self {
            terminal,
            session,
            model: DisplayModel::new(),
            grid: CharGrid::new(),
            input: InputState::new(),
            framer: LineFramer::new(),
            transport: None,
            host: options.host,
            port: options.port,
            started: Instant::now(),
            dirty: true,
        })
    }

    /// Run the main event loop until quit.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        self.emit(DisplayLine::new(
            Role::Status,
            concat!("petirc ", env!("CARGO_PKG_VERSION")).to_string(),
        ));
        if self.session.autoconnect {
            self.connect().await;
        } else {
            self.emit(DisplayLine::new(
                Role::Status,
                "autoconnect is off; restart with --autoconnect on".to_string(),
            ));
        }
        self.redraw()?;

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS));

        loop {
            let mut buf = [0u8; READ_CHUNK];
            let connected = self.transport.is_some();

            let quit = tokio::select! {
                // Terminal events
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event).await,
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        None => true,
                    }
                }

                // Bytes from the server
                result = Self::next_chunk(&mut self.transport, &mut buf), if connected => {
                    match result {
                        Ok(n) => self.handle_server_bytes(&buf[..n]).await,
                        Err(e) => {
                            tracing::warn!(error = %e, "connection lost");
                            self.drop_connection();
                            false
                        }
                    }
                }

                // Periodic tick
                _ = ticker.tick() => self.handle_tick().await,
            };

            if self.dirty {
                self.redraw()?;
                self.dirty = false;
            }
            if quit {
                break;
            }
        }

        Ok(())
    }

    /// Await the next read chunk, or never when disconnected.
    async fn next_chunk(
        transport: &mut Option<Transport>,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        match transport {
            Some(transport) => transport.read_chunk(buf).await,
            None => std::future::pending().await,
        }
    }

    /// Handle a terminal event. Returns true to quit.
    async fn handle_terminal_event(&mut self, event: Event) -> bool {
        let key = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(..) => {
                self.dirty = true;
                return false;
            }
            _ => return false,
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        let Some(key_input) = Self::convert_key(key.code) else {
            return false;
        };

        self.dirty = true;
        if let Some(line) = self.input.handle_key(key_input) {
            let actions = command::handle(&line, &mut self.session);
            return self.apply(actions).await;
        }
        false
    }

    /// Frame one chunk of server bytes and dispatch each complete line.
    async fn handle_server_bytes(&mut self, bytes: &[u8]) -> bool {
        let now = self.now_ms();
        let lines = self.framer.feed(bytes);
        let mut quit = false;
        for line in lines {
            let actions = protocol::handle(&line, &mut self.session, now);
            quit = self.apply(actions).await || quit;
        }
        quit
    }

    /// Periodic work: keepalive probe and minute-gated clock refresh.
    async fn handle_tick(&mut self) -> bool {
        let now = self.now_ms();
        let actions = protocol::tick(&mut self.session, now);
        let quit = self.apply(actions).await;

        let clock = wall_clock();
        if self.session.last_clock != Some(clock) {
            self.session.last_clock = Some(clock);
            self.dirty = true;
        }
        quit
    }

    /// Apply dispatcher actions. Returns true to quit.
    async fn apply(&mut self, actions: Vec<Action>) -> bool {
        let mut quit = false;
        for action in actions {
            match action {
                Action::Send(line) => self.send(&line).await,
                Action::Emit(line) => self.emit(line),
                Action::Quit => quit = true,
            }
        }
        quit
    }

    /// Send one line, tearing the connection down on failure.
    async fn send(&mut self, line: &str) {
        let Some(transport) = self.transport.as_mut() else {
            tracing::warn!(line, "dropping outbound line while disconnected");
            return;
        };
        if let Err(e) = transport.send_line(line).await {
            tracing::warn!(error = %e, "send failed");
            self.drop_connection();
        }
    }

    /// Append a line to the scrollback and mark the screen dirty.
    fn emit(&mut self, line: DisplayLine) {
        let theme = theme::get(self.session.theme_id);
        let clock = self.session.timestamps.then(wall_clock);
        self.model.render(&line, clock, theme, &mut self.grid);
        self.dirty = true;
    }

    /// Open the transport and start registration.
    async fn connect(&mut self) {
        self.session.phase = Phase::Connecting;
        self.emit(DisplayLine::new(
            Role::Status,
            format!("connecting to {}:{} ...", self.host, self.port),
        ));

        match Transport::connect(&self.host, self.port, &self.session.nick).await {
            Ok(transport) => self.transport = Some(transport),
            Err(e) => {
                tracing::warn!(error = %e, "connect failed");
                self.emit(DisplayLine::new(Role::Error, format!("connect failed: {e}")));
                self.session.phase = Phase::Disconnected;
            }
        }
        self.dirty = true;
    }

    /// Drop the transport and reset session and framer state.
    fn drop_connection(&mut self) {
        self.transport = None;
        self.framer.reset();
        for action in protocol::connection_lost(&mut self.session) {
            if let Action::Emit(line) = action {
                self.emit(line);
            }
        }
        self.dirty = true;
    }

    /// Repaint every owned row and draw the frame.
    fn redraw(&mut self) -> Result<(), RuntimeError> {
        let theme = theme::get(self.session.theme_id);
        let clock = wall_clock();

        self.model.render_banner("petirc", theme, &mut self.grid);
        self.model.repaint_viewport(theme, &mut self.grid);
        self.model.render_status(&self.session, Some(clock), theme, &mut self.grid);
        let cursor_col = self.paint_input_row();

        self.terminal.draw(|frame| {
            ui::render(frame, &self.grid, cursor_col, theme);
        })?;
        Ok(())
    }

    /// Paint the input row (prompt plus visible window of the buffer) and
    /// return the cursor column.
    fn paint_input_row(&mut self) -> usize {
        let theme = theme::get(self.session.theme_id);
        for col in 0..COLS {
            self.grid.put(INPUT_ROW, col, ' ', theme.input);
        }
        self.grid.put(INPUT_ROW, 0, '>', theme.input);

        // Scroll the window so the cursor stays visible.
        let avail = COLS - 2;
        let cursor = self.input.cursor();
        let start = cursor.saturating_sub(avail - 1);
        for (i, ch) in self.input.buffer().chars().skip(start).take(avail).enumerate() {
            self.grid.put(INPUT_ROW, 2 + i, ch, theme.input);
        }
        2 + (cursor - start)
    }

    /// Milliseconds since startup, the dispatcher's monotonic clock.
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Local wall-clock hour and minute for the status bar and gutter.
fn wall_clock() -> (u8, u8) {
    let now = chrono::Local::now();
    (now.hour() as u8, now.minute() as u8)
}
