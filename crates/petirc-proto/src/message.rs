//! Zero-copy parsing of one protocol line.
//!
//! A [`Message`] is a borrowed view over its source line: parsing produces
//! slices, never owned copies, so a message is only valid for the dispatch
//! cycle of the line it came from. Layout on the wire:
//!
//! `[:prefix ]COMMAND[ param ...][ :trailing]`
//!
//! The trailing parameter begins with `:` and extends verbatim, spaces
//! included, to the end of the line. It is folded into [`Message::params`]
//! as the final entry.

use crate::errors::ParseError;

/// A parsed view over one complete protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    /// Sender identity from a leading `:prefix`, if present.
    pub prefix: Option<&'a str>,
    /// Command token: an uppercase name (`PRIVMSG`) or a numeric reply
    /// (`001`). Matched case-sensitively by the dispatcher.
    pub command: &'a str,
    /// Ordered parameters; the trailing parameter, if any, is last.
    pub params: Vec<&'a str>,
}

impl<'a> Message<'a> {
    /// Parse a line into its prefix, command, and parameters.
    ///
    /// # Errors
    ///
    /// [`ParseError::Empty`] for an empty line, [`ParseError::MissingCommand`]
    /// when a prefix is present but nothing follows it. Both are dropped by
    /// the dispatcher without rendering.
    pub fn parse(line: &'a str) -> Result<Self, ParseError> {
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut rest = line;
        let mut prefix = None;

        if let Some(after) = rest.strip_prefix(':') {
            let (p, r) = after.split_once(' ').ok_or(ParseError::MissingCommand)?;
            prefix = Some(p);
            rest = r.trim_start_matches(' ');
        }

        if rest.is_empty() {
            return Err(ParseError::MissingCommand);
        }

        let (command, after_command) = match rest.split_once(' ') {
            Some((c, r)) => (c, r),
            None => (rest, ""),
        };

        let mut params = Vec::new();
        let mut rest = after_command;
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing);
                break;
            }
            match rest.split_once(' ') {
                Some((param, r)) => {
                    params.push(param);
                    rest = r;
                },
                None => {
                    params.push(rest);
                    break;
                },
            }
        }

        Ok(Self { prefix, command, params })
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).copied()
    }

    /// Nick portion of a `nick!user@host` prefix.
    pub fn sender_nick(&self) -> Option<&'a str> {
        self.prefix.map(|p| p.split(['!', '@']).next().unwrap_or(p))
    }
}

/// Whether `target` names a channel rather than a user.
pub fn is_channel(target: &str) -> bool {
    target.starts_with('#') || target.starts_with('&')
}
