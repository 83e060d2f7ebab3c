//! Input state and key handling.
//!
//! Owns the text input buffer and cursor. Character-level editing happens
//! here; command parsing happens in `petirc_app::command` when a line is
//! submitted on Enter.

use petirc_proto::MAX_LINE_LEN;

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key (clears the buffer).
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Text input state: buffer and cursor position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    ///
    /// Returns the submitted line on Enter (empty lines included; the
    /// dispatcher ignores them), `None` for editing keys.
    pub fn handle_key(&mut self, key: KeyInput) -> Option<String> {
        match key {
            KeyInput::Char(c) => {
                if self.buffer.chars().count() < MAX_LINE_LEN {
                    let at = self.byte_index(self.cursor);
                    self.buffer.insert(at, c);
                    self.cursor = self.cursor.saturating_add(1);
                }
                None
            }
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
                None
            }
            KeyInput::Delete => {
                if self.cursor < self.buffer.chars().count() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
                None
            }
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyInput::Right => {
                if self.cursor < self.buffer.chars().count() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                None
            }
            KeyInput::Home => {
                self.cursor = 0;
                None
            }
            KeyInput::End => {
                self.cursor = self.buffer.chars().count();
                None
            }
            KeyInput::Esc => {
                self.buffer.clear();
                self.cursor = 0;
                None
            }
            KeyInput::Enter => {
                self.cursor = 0;
                Some(std::mem::take(&mut self.buffer))
            }
        }
    }

    /// Byte index of the `n`th character, for `String` edits.
    fn byte_index(&self, n: usize) -> usize {
        self.buffer.char_indices().nth(n).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('h'));
        input.handle_key(KeyInput::Char('i'));

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('a'));
        input.handle_key(KeyInput::Char('b'));
        input.handle_key(KeyInput::Backspace);

        assert_eq!(input.buffer(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('h'));
        input.handle_key(KeyInput::Char('e'));
        input.handle_key(KeyInput::Char('y'));
        let submitted = input.handle_key(KeyInput::Enter);

        assert_eq!(submitted.as_deref(), Some("hey"));
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn cursor_movement_and_mid_buffer_edit() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('a'));
        input.handle_key(KeyInput::Char('c'));
        input.handle_key(KeyInput::Left);
        input.handle_key(KeyInput::Char('b'));

        assert_eq!(input.buffer(), "abc");
        assert_eq!(input.cursor(), 2);

        input.handle_key(KeyInput::Home);
        assert_eq!(input.cursor(), 0);
        input.handle_key(KeyInput::End);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn esc_clears_buffer() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('x'));
        input.handle_key(KeyInput::Esc);

        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn buffer_is_capped_at_line_limit() {
        let mut input = InputState::new();

        for _ in 0..MAX_LINE_LEN + 10 {
            input.handle_key(KeyInput::Char('x'));
        }

        assert_eq!(input.buffer().len(), MAX_LINE_LEN);
        assert_eq!(input.cursor(), MAX_LINE_LEN);
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('p'));
        input.handle_key(KeyInput::Char('é'));
        input.handle_key(KeyInput::Char('t'));
        input.handle_key(KeyInput::Left);
        input.handle_key(KeyInput::Backspace);

        assert_eq!(input.buffer(), "pt");
        assert_eq!(input.cursor(), 1);
    }
}
