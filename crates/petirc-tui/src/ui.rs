//! UI rendering.
//!
//! Converts the character grid into ratatui widgets. Pure functions (no
//! I/O): the grid holds all screen content, this module only translates
//! cells into styled spans and centers the fixed frame in the terminal.

use petirc_app::Attr;
use petirc_app::display::{COLS, INPUT_ROW, ROWS};
use petirc_app::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
};

use crate::screen::CharGrid;

/// Render the grid into the frame, centered, with a themed border.
///
/// `cursor_col` positions the hardware cursor on the input row.
pub fn render(frame: &mut Frame, grid: &CharGrid, cursor_col: usize, theme: &Theme) {
    let area = centered(frame.area());
    let block = Block::bordered().border_style(style(theme.border));
    let inner = block.inner(area);

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(grid_text(grid)), inner);

    let x = inner.x.saturating_add(cursor_col.min(COLS.saturating_sub(1)) as u16);
    let y = inner.y.saturating_add(INPUT_ROW as u16);
    frame.set_cursor_position((x, y));
}

/// Build styled text from the grid, merging runs of equal attributes.
fn grid_text(grid: &CharGrid) -> Text<'static> {
    let mut lines = Vec::with_capacity(ROWS);

    for row in 0..ROWS {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_attr: Option<Attr> = None;

        for col in 0..COLS {
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            match run_attr {
                Some(attr) if attr == cell.attr => run.push(cell.ch),
                Some(attr) => {
                    spans.push(Span::styled(std::mem::take(&mut run), style(attr)));
                    run.push(cell.ch);
                    run_attr = Some(cell.attr);
                }
                None => {
                    run.push(cell.ch);
                    run_attr = Some(cell.attr);
                }
            }
        }
        if let Some(attr) = run_attr {
            spans.push(Span::styled(run, style(attr)));
        }
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

/// Fixed frame (grid plus border) centered in the terminal area.
fn centered(area: Rect) -> Rect {
    let width = (COLS as u16 + 2).min(area.width);
    let height = (ROWS as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect { x, y, width, height }
}

/// Translate a packed attribute into a ratatui style.
fn style(attr: Attr) -> Style {
    Style::default().fg(color(attr.fg())).bg(color(attr.bg()))
}

/// Palette nibble to terminal color.
fn color(n: u8) -> Color {
    match n {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        7 => Color::Gray,
        8 => Color::DarkGray,
        9 => Color::LightRed,
        10 => Color::LightGreen,
        11 => Color::LightYellow,
        12 => Color::LightBlue,
        13 => Color::LightMagenta,
        14 => Color::LightCyan,
        _ => Color::White,
    }
}
