//! Bounded display model: scrollback ring and status row.
//!
//! The model renders an unbounded stream of [`DisplayLine`]s into a fixed
//! 40x25 character grid. All cell writes go through the [`Screen`] trait and
//! are clipped to the grid extents, so no input text, however long, can
//! write outside the fixed rows and columns.
//!
//! Geometry: row 0 is the banner, rows 1..=22 the scrollback viewport,
//! row 23 the status bar, row 24 the input line (painted by the front end).
//!
//! The scrollback is an arena-with-index ring: a flat array plus head index
//! and count, with wraparound arithmetic. No growth, no allocation past the
//! fixed capacity; the oldest row is overwritten when full. The view is
//! always pinned to the most recent content.

use crate::session::{Phase, SessionState};
use crate::theme::{Attr, Theme};

/// Screen width in character cells.
pub const COLS: usize = 40;
/// Screen height in character rows.
pub const ROWS: usize = 25;
/// Banner row index.
pub const BANNER_ROW: usize = 0;
/// First scrollback viewport row.
pub const SCROLL_TOP: usize = 1;
/// Number of scrollback viewport rows.
pub const SCROLL_ROWS: usize = 22;
/// Status bar row index.
pub const STATUS_ROW: usize = 23;
/// Input row index (owned by the front end).
pub const INPUT_ROW: usize = 24;
/// Ring capacity in wrapped rows.
pub const SCROLLBACK_CAP: usize = 64;

/// Semantic category of a display line; selects its color attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Title banner.
    Banner,
    /// Local status feedback (`/theme`, `/time`, `/help`).
    Status,
    /// Channel message from another user.
    Channel,
    /// Own echoed message.
    SelfMsg,
    /// Private message.
    Private,
    /// Server notice, including unrecognized protocol lines.
    Notice,
    /// Join, part, or quit notice.
    JoinPart,
    /// Nick-change notice.
    NickChange,
    /// Timestamp gutter.
    Timestamp,
    /// Channel topic.
    Topic,
    /// MOTD and welcome text.
    Motd,
    /// Error line, local or from the server.
    Error,
}

/// One logical line of output with its semantic role.
///
/// Produced by handlers, consumed immediately by the display model; never
/// persisted beyond the visible ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Semantic role selecting the color attribute.
    pub role: Role,
    /// Line text; wrapped to the grid width at render time.
    pub text: String,
}

impl DisplayLine {
    /// Create a display line.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }
}

/// Cell sink provided by the front end.
///
/// Implementations paint one character cell; they may ignore writes, but the
/// model guarantees `row < ROWS` and `col < COLS` for every call.
pub trait Screen {
    /// Paint one cell.
    fn put(&mut self, row: usize, col: usize, ch: char, attr: Attr);
}

/// One wrapped row in the ring. Text is at most [`COLS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Role inherited from the logical line (continuations keep it).
    pub role: Role,
    /// Row text, pre-wrapped to the grid width.
    pub text: String,
}

/// Fixed-capacity ring of the most recent wrapped rows.
#[derive(Debug)]
pub struct Scrollback {
    slots: Vec<Row>,
    head: usize,
    cap: usize,
}

impl Scrollback {
    /// Create an empty ring with the given capacity.
    pub fn new(cap: usize) -> Self {
        Self { slots: Vec::with_capacity(cap), head: 0, cap }
    }

    /// Number of rows currently held. Never exceeds the capacity.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the ring holds no rows.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Push a logical line, wrapping it into as many rows as it needs.
    ///
    /// A line longer than [`COLS`] continues on following rows under the
    /// same role; it is never merged with the next logical line.
    pub fn push(&mut self, line: &DisplayLine) {
        let chars: Vec<char> = line.text.chars().collect();
        if chars.is_empty() {
            self.push_row(Row { role: line.role, text: String::new() });
            return;
        }
        for chunk in chars.chunks(COLS) {
            self.push_row(Row { role: line.role, text: chunk.iter().collect() });
        }
    }

    fn push_row(&mut self, row: Row) {
        if self.slots.len() < self.cap {
            self.slots.push(row);
        } else if let Some(slot) = self.slots.get_mut(self.head) {
            // Overwrite the oldest slot and advance the head.
            *slot = row;
            self.head = (self.head + 1) % self.cap;
        }
    }

    /// The most recent `n` rows, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Row> {
        let total = self.slots.len();
        let skip = total.saturating_sub(n);
        (skip..total).filter_map(move |i| self.slots.get((self.head + i) % total.max(1)))
    }
}

/// Scrollback plus status-bar rendering over a [`Screen`].
#[derive(Debug)]
pub struct DisplayModel {
    scroll: Scrollback,
}

impl Default for DisplayModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayModel {
    /// Create a model with the default ring capacity.
    pub fn new() -> Self {
        Self { scroll: Scrollback::new(SCROLLBACK_CAP) }
    }

    /// Read access to the ring, for tests and the front end.
    pub fn scrollback(&self) -> &Scrollback {
        &self.scroll
    }

    /// Append a line and repaint the viewport.
    ///
    /// When `clock` is set (timestamps enabled), message lines get an
    /// `HH:MM ` gutter in the timestamp attribute's text form.
    pub fn render(
        &mut self,
        line: &DisplayLine,
        clock: Option<(u8, u8)>,
        theme: &Theme,
        screen: &mut impl Screen,
    ) {
        match clock {
            Some((hour, minute)) if stamped(line.role) => {
                let gutter =
                    DisplayLine::new(line.role, format!("{hour:02}:{minute:02} {}", line.text));
                self.scroll.push(&gutter);
            },
            _ => self.scroll.push(line),
        }
        self.repaint_viewport(theme, screen);
    }

    /// Repaint every viewport row from the ring, pinned to the newest rows.
    pub fn repaint_viewport(&self, theme: &Theme, screen: &mut impl Screen) {
        let blank = theme.role_attr(Role::Channel);
        let rows: Vec<&Row> = self.scroll.recent(SCROLL_ROWS).collect();

        for offset in 0..SCROLL_ROWS {
            let row = SCROLL_TOP + offset;
            match rows.get(offset) {
                Some(line) => {
                    put_line(screen, row, &line.text, theme.role_attr(line.role), blank);
                },
                None => fill_row(screen, row, blank),
            }
        }
    }

    /// Paint the banner row with a centered title.
    pub fn render_banner(&self, title: &str, theme: &Theme, screen: &mut impl Screen) {
        fill_row(screen, BANNER_ROW, theme.banner);
        let width = title.chars().count().min(COLS);
        let start = (COLS - width) / 2;
        put_str(screen, BANNER_ROW, start, title, theme.banner);
    }

    /// Recompute and repaint the status row from session state.
    ///
    /// Layout: connection indicator cell, nick and channel, latency figure,
    /// and a right-aligned clock shown only when timestamps are enabled.
    /// The runtime gates clock-driven repaints to minute changes via
    /// [`SessionState::last_clock`].
    pub fn render_status(
        &self,
        session: &SessionState,
        clock: Option<(u8, u8)>,
        theme: &Theme,
        screen: &mut impl Screen,
    ) {
        fill_row(screen, STATUS_ROW, theme.status);

        let ind = match session.phase {
            Phase::Disconnected => theme.ind_off,
            Phase::Connecting => theme.ind_mid,
            Phase::Registered => theme.ind_on,
        };
        screen.put(STATUS_ROW, 0, '*', ind);

        let mut text = format!(" {}", session.nick);
        if let Some(channel) = &session.channel {
            text.push(' ');
            text.push_str(channel);
        }
        if let Some(latency) = session.latency_ms {
            text.push_str(&format!(" {latency}ms"));
        }
        // Leave the clock corner alone.
        let text: String = text.chars().take(COLS - 7).collect();
        put_str(screen, STATUS_ROW, 1, &text, theme.status);

        if session.timestamps
            && let Some((hour, minute)) = clock
        {
            let clock_text = format!("{hour:02}:{minute:02}");
            put_str(screen, STATUS_ROW, COLS - 5, &clock_text, theme.status);
        }
    }
}

/// Roles that receive a timestamp gutter when the flag is on.
fn stamped(role: Role) -> bool {
    matches!(role, Role::Channel | Role::SelfMsg | Role::Private)
}

/// Write a string starting at `col`, clipped to the grid width.
fn put_str(screen: &mut impl Screen, row: usize, col: usize, text: &str, attr: Attr) {
    if row >= ROWS {
        return;
    }
    for (i, ch) in text.chars().enumerate() {
        let col = col + i;
        if col >= COLS {
            break;
        }
        screen.put(row, col, ch, attr);
    }
}

/// Write a row's text then pad the remainder with blanks.
fn put_line(screen: &mut impl Screen, row: usize, text: &str, attr: Attr, blank: Attr) {
    if row >= ROWS {
        return;
    }
    let mut col = 0;
    for ch in text.chars() {
        if col >= COLS {
            break;
        }
        screen.put(row, col, ch, attr);
        col += 1;
    }
    while col < COLS {
        screen.put(row, col, ' ', blank);
        col += 1;
    }
}

/// Blank an entire row in one attribute.
fn fill_row(screen: &mut impl Screen, row: usize, attr: Attr) {
    if row >= ROWS {
        return;
    }
    for col in 0..COLS {
        screen.put(row, col, ' ', attr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    /// Fake screen recording the last write per cell.
    struct Grid {
        cells: Vec<Vec<(char, Attr)>>,
    }

    impl Grid {
        fn new() -> Self {
            Self { cells: vec![vec![(' ', Attr(0)); COLS]; ROWS] }
        }

        fn row_text(&self, row: usize) -> String {
            self.cells[row].iter().map(|(ch, _)| *ch).collect()
        }
    }

    impl Screen for Grid {
        fn put(&mut self, row: usize, col: usize, ch: char, attr: Attr) {
            assert!(row < ROWS, "write outside rows: {row}");
            assert!(col < COLS, "write outside cols: {col}");
            self.cells[row][col] = (ch, attr);
        }
    }

    #[test]
    fn ring_never_exceeds_capacity() {
        let mut ring = Scrollback::new(4);
        for i in 0..10 {
            ring.push(&DisplayLine::new(Role::Channel, format!("line {i}")));
        }

        assert_eq!(ring.len(), 4);
        let texts: Vec<&str> = ring.recent(4).map(|row| row.text.as_str()).collect();
        assert_eq!(texts, vec!["line 6", "line 7", "line 8", "line 9"]);
    }

    #[test]
    fn oldest_row_evicted_at_capacity() {
        let mut ring = Scrollback::new(3);
        for text in ["a", "b", "c", "d"] {
            ring.push(&DisplayLine::new(Role::Channel, text));
        }

        let texts: Vec<&str> = ring.recent(10).map(|row| row.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "d"]);
    }

    #[test]
    fn long_line_wraps_with_same_role() {
        let mut ring = Scrollback::new(8);
        let long = "x".repeat(COLS + 5);
        ring.push(&DisplayLine::new(Role::Motd, long));

        let rows: Vec<&Row> = ring.recent(8).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text.chars().count(), COLS);
        assert_eq!(rows[1].text.chars().count(), 5);
        assert_eq!(rows[0].role, Role::Motd);
        assert_eq!(rows[1].role, Role::Motd);
    }

    #[test]
    fn render_clips_to_grid() {
        let mut model = DisplayModel::new();
        let mut grid = Grid::new();
        let theme = theme::get(1);

        // Way longer than a full screen; the Grid asserts on any
        // out-of-bounds write.
        let huge = "y".repeat(COLS * ROWS * 2);
        model.render(&DisplayLine::new(Role::Channel, huge), None, theme, &mut grid);
    }

    #[test]
    fn viewport_pins_to_most_recent() {
        let mut model = DisplayModel::new();
        let mut grid = Grid::new();
        let theme = theme::get(1);

        for i in 0..30 {
            model.render(&DisplayLine::new(Role::Channel, format!("m{i}")), None, theme, &mut grid);
        }

        // 30 one-row lines into 22 viewport rows: rows 8..=29 visible.
        assert!(grid.row_text(SCROLL_TOP).starts_with("m8"));
        assert!(grid.row_text(SCROLL_TOP + SCROLL_ROWS - 1).starts_with("m29"));
    }

    #[test]
    fn timestamp_gutter_applies_to_messages_only() {
        let mut model = DisplayModel::new();
        let mut grid = Grid::new();
        let theme = theme::get(1);

        model.render(&DisplayLine::new(Role::Channel, "hi"), Some((9, 5)), theme, &mut grid);
        model.render(&DisplayLine::new(Role::Notice, "motd"), Some((9, 5)), theme, &mut grid);

        let rows: Vec<&Row> = model.scrollback().recent(4).collect();
        assert_eq!(rows[0].text, "09:05 hi");
        assert_eq!(rows[1].text, "motd");
    }

    #[test]
    fn status_row_shows_indicator_nick_and_latency() {
        let model = DisplayModel::new();
        let mut grid = Grid::new();
        let theme = theme::get(1);

        let mut session = SessionState::new("dot");
        session.phase = Phase::Registered;
        session.channel = Some("#pet".to_string());
        session.latency_ms = Some(120);

        model.render_status(&session, None, theme, &mut grid);

        let text = grid.row_text(STATUS_ROW);
        assert!(text.starts_with("* dot #pet 120ms"));
        assert_eq!(grid.cells[STATUS_ROW][0].1, theme.ind_on);
    }

    #[test]
    fn clock_renders_only_with_timestamps_flag() {
        let model = DisplayModel::new();
        let theme = theme::get(1);
        let mut session = SessionState::new("dot");

        let mut grid = Grid::new();
        model.render_status(&session, Some((12, 34)), theme, &mut grid);
        assert!(!grid.row_text(STATUS_ROW).contains("12:34"));

        session.timestamps = true;
        let mut grid = Grid::new();
        model.render_status(&session, Some((12, 34)), theme, &mut grid);
        assert!(grid.row_text(STATUS_ROW).ends_with("12:34"));
    }

    #[test]
    fn banner_is_centered() {
        let model = DisplayModel::new();
        let mut grid = Grid::new();
        let theme = theme::get(1);

        model.render_banner("petirc", theme, &mut grid);

        let text = grid.row_text(BANNER_ROW);
        assert_eq!(text.trim(), "petirc");
        let start = text.find("petirc").unwrap();
        assert_eq!(start, (COLS - 6) / 2);
    }
}
