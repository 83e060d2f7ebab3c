//! Incremental line framing over a raw byte stream.
//!
//! The transport hands the framer whatever bytes happen to be available;
//! the framer splits them on the protocol's line terminator and carries any
//! trailing partial line until a later read completes it. Lines that exceed
//! [`MAX_LINE_LEN`] are dropped whole: the framer discards bytes until the
//! next terminator rather than yielding a truncated line.
//!
//! # Invariants
//!
//! - Chunk-boundary independence: feeding a byte sequence in arbitrary
//!   splits yields exactly the lines produced by feeding it at once.
//! - The carry buffer never holds more than [`MAX_LINE_LEN`] bytes, so
//!   memory use is bounded regardless of what the server sends.
//! - No handler runs inside the framer; it only yields complete lines.

/// One complete line as yielded by the framer, terminator stripped.
///
/// Transient by design: a raw line lives for a single dispatch cycle and is
/// consumed exactly once by the protocol dispatcher.
pub type RawLine = Vec<u8>;

/// Maximum accepted line length in bytes, excluding the terminator.
pub const MAX_LINE_LEN: usize = 512;

/// Splits an incoming byte stream into terminated lines.
///
/// Lines end at `\n`; `\r` bytes are discarded wherever they appear, which
/// accepts both `\r\n` and bare-`\n` terminators (the protocol forbids
/// carriage returns inside a message).
#[derive(Debug, Default)]
pub struct LineFramer {
    /// Partial line carried across `feed` calls.
    carry: Vec<u8>,
    /// When set, the current line overran the cap and is being swallowed
    /// up to its terminator.
    discarding: bool,
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume newly arrived bytes, yielding every line they complete.
    ///
    /// Empty lines are not yielded. A line longer than [`MAX_LINE_LEN`] is
    /// dropped silently together with the rest of its bytes up to the next
    /// terminator.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RawLine> {
        let mut lines = Vec::new();

        for &byte in chunk {
            match byte {
                b'\r' => {},
                b'\n' => {
                    if self.discarding {
                        self.discarding = false;
                    } else if !self.carry.is_empty() {
                        lines.push(std::mem::take(&mut self.carry));
                    }
                },
                _ if self.discarding => {},
                _ => {
                    if self.carry.len() == MAX_LINE_LEN {
                        self.discarding = true;
                        self.carry.clear();
                    } else {
                        self.carry.push(byte);
                    }
                },
            }
        }

        lines
    }

    /// Drop any carried partial line, e.g. when the connection ends.
    pub fn reset(&mut self) {
        self.carry.clear();
        self.discarding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_complete_lines() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"PING :abc\r\nNOTICE x :hi\r\n");

        assert_eq!(lines, vec![b"PING :abc".to_vec(), b"NOTICE x :hi".to_vec()]);
    }

    #[test]
    fn carries_partial_line_across_feeds() {
        let mut framer = LineFramer::new();

        assert!(framer.feed(b"PRIVMSG #pet").is_empty());
        let lines = framer.feed(b" :hello\r\n");

        assert_eq!(lines, vec![b"PRIVMSG #pet :hello".to_vec()]);
    }

    #[test]
    fn accepts_bare_newline_terminator() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"PING :x\n");

        assert_eq!(lines, vec![b"PING :x".to_vec()]);
    }

    #[test]
    fn skips_empty_lines() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"\r\n\r\nPING :x\r\n\r\n");

        assert_eq!(lines, vec![b"PING :x".to_vec()]);
    }

    #[test]
    fn drops_overlong_line_until_terminator() {
        let mut framer = LineFramer::new();
        let long = vec![b'a'; MAX_LINE_LEN + 1];

        assert!(framer.feed(&long).is_empty());
        // Remainder of the oversized line is swallowed too.
        assert!(framer.feed(b"still the same line").is_empty());

        let lines = framer.feed(b"\r\nPING :ok\r\n");
        assert_eq!(lines, vec![b"PING :ok".to_vec()]);
    }

    #[test]
    fn line_of_exactly_max_length_is_kept() {
        let mut framer = LineFramer::new();
        let mut input = vec![b'a'; MAX_LINE_LEN];
        input.extend_from_slice(b"\r\n");

        let lines = framer.feed(&input);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
    }

    #[test]
    fn reset_clears_carry() {
        let mut framer = LineFramer::new();
        let _ = framer.feed(b"partial");
        framer.reset();

        let lines = framer.feed(b"PING :x\r\n");
        assert_eq!(lines, vec![b"PING :x".to_vec()]);
    }
}
