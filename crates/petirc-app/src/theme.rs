//! Immutable color themes.
//!
//! A [`Theme`] maps every display [`Role`] plus the structural UI elements
//! (banner, status, input, border) and the three connection-indicator levels
//! to a device [`Attr`]. Themes are static data selected once by
//! configuration; rendering code only ever reads them.

use crate::display::Role;

/// A packed color attribute: background nibble high, foreground nibble low.
///
/// Nibble values index the standard 16-color terminal palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr(pub u8);

impl Attr {
    /// Pack a background and foreground palette index.
    pub const fn new(bg: u8, fg: u8) -> Self {
        Self((bg << 4) | (fg & 0x0f))
    }

    /// Foreground palette index.
    pub const fn fg(self) -> u8 {
        self.0 & 0x0f
    }

    /// Background palette index.
    pub const fn bg(self) -> u8 {
        self.0 >> 4
    }
}

/// One complete attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Theme name shown by `/theme`.
    pub name: &'static str,
    /// Banner row.
    pub banner: Attr,
    /// Status row background and default text.
    pub status: Attr,
    /// Input row.
    pub input: Attr,
    /// Window border.
    pub border: Attr,
    /// Channel messages from others.
    pub channel: Attr,
    /// Own echoed messages.
    pub self_msg: Attr,
    /// Private messages.
    pub private: Attr,
    /// Server notices (including unknown protocol lines).
    pub notice: Attr,
    /// Join/part/quit notices.
    pub join_part: Attr,
    /// Nick-change notices.
    pub nick_change: Attr,
    /// Timestamp gutters.
    pub timestamp: Attr,
    /// Topic lines.
    pub topic: Attr,
    /// MOTD and welcome text.
    pub motd: Attr,
    /// Local and server error lines.
    pub error: Attr,
    /// Indicator: disconnected.
    pub ind_off: Attr,
    /// Indicator: connecting.
    pub ind_mid: Attr,
    /// Indicator: connected and registered.
    pub ind_on: Attr,
}

impl Theme {
    /// Attribute for a display role.
    pub fn role_attr(&self, role: Role) -> Attr {
        match role {
            Role::Banner => self.banner,
            Role::Status => self.status,
            Role::Channel => self.channel,
            Role::SelfMsg => self.self_msg,
            Role::Private => self.private,
            Role::Notice => self.notice,
            Role::JoinPart => self.join_part,
            Role::NickChange => self.nick_change,
            Role::Timestamp => self.timestamp,
            Role::Topic => self.topic,
            Role::Motd => self.motd,
            Role::Error => self.error,
        }
    }
}

/// Blue-on-blue, in the spirit of the machines this display models.
const MIDNIGHT: Theme = Theme {
    name: "midnight",
    banner: Attr::new(14, 4),
    status: Attr::new(6, 15),
    input: Attr::new(4, 15),
    border: Attr::new(4, 14),
    channel: Attr::new(4, 15),
    self_msg: Attr::new(4, 11),
    private: Attr::new(4, 13),
    notice: Attr::new(4, 14),
    join_part: Attr::new(4, 6),
    nick_change: Attr::new(4, 6),
    timestamp: Attr::new(4, 8),
    topic: Attr::new(4, 14),
    motd: Attr::new(4, 7),
    error: Attr::new(4, 9),
    ind_off: Attr::new(6, 9),
    ind_mid: Attr::new(6, 11),
    ind_on: Attr::new(6, 10),
};

/// Green phosphor on black.
const PHOSPHOR: Theme = Theme {
    name: "phosphor",
    banner: Attr::new(2, 0),
    status: Attr::new(2, 0),
    input: Attr::new(0, 10),
    border: Attr::new(0, 2),
    channel: Attr::new(0, 10),
    self_msg: Attr::new(0, 2),
    private: Attr::new(0, 10),
    notice: Attr::new(0, 2),
    join_part: Attr::new(0, 2),
    nick_change: Attr::new(0, 2),
    timestamp: Attr::new(0, 2),
    topic: Attr::new(0, 10),
    motd: Attr::new(0, 2),
    error: Attr::new(0, 11),
    ind_off: Attr::new(2, 0),
    ind_mid: Attr::new(2, 11),
    ind_on: Attr::new(2, 10),
};

/// Dark on light, for bright rooms.
const PAPER: Theme = Theme {
    name: "paper",
    banner: Attr::new(0, 15),
    status: Attr::new(8, 15),
    input: Attr::new(7, 0),
    border: Attr::new(7, 8),
    channel: Attr::new(7, 0),
    self_msg: Attr::new(7, 4),
    private: Attr::new(7, 5),
    notice: Attr::new(7, 8),
    join_part: Attr::new(7, 8),
    nick_change: Attr::new(7, 8),
    timestamp: Attr::new(7, 8),
    topic: Attr::new(7, 4),
    motd: Attr::new(7, 8),
    error: Attr::new(7, 1),
    ind_off: Attr::new(8, 1),
    ind_mid: Attr::new(8, 3),
    ind_on: Attr::new(8, 2),
};

/// All built-in themes, in id order.
const THEMES: &[Theme] = &[MIDNIGHT, PHOSPHOR, PAPER];

/// Look up a theme by 1-based id.
///
/// Id 0 and out-of-range ids fall back to the first theme.
pub fn get(id: u8) -> &'static Theme {
    let index = (id as usize).saturating_sub(1);
    THEMES.get(index).unwrap_or(&THEMES[0])
}

/// Name of the theme `id` resolves to, fallback included.
pub fn name(id: u8) -> &'static str {
    get(id).name
}

/// Number of built-in themes.
pub fn count() -> u8 {
    THEMES.len() as u8
}
