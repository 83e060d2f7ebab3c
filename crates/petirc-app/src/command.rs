//! Table-driven dispatch of user input lines.
//!
//! A line starting with `/` names a slash-command, matched
//! case-insensitively against a static sorted table; everything after the
//! command name is handed to the handler verbatim, and each handler splits
//! its own arguments. A line without the marker is an outgoing message to
//! the current channel, queued for the transport and echoed locally.
//!
//! Unknown commands and failed preconditions produce local error lines
//! only; nothing malformed ever reaches the transport.

use std::cmp::Ordering;

use crate::action::Action;
use crate::display::{DisplayLine, Role};
use crate::session::{Phase, SessionState};
use crate::theme;

/// Marker byte that introduces a slash-command.
pub const COMMAND_MARKER: char = '/';

type Handler = fn(&str, &mut SessionState) -> Vec<Action>;

/// Sorted, unique, lowercase command table.
static TABLE: &[(&str, Handler)] = &[
    ("help", help),
    ("join", join),
    ("me", me),
    ("msg", msg),
    ("nick", nick),
    ("part", part),
    ("quit", quit),
    ("theme", theme_select),
    ("time", time),
    ("topic", topic),
];

/// Dispatch one submitted input line.
pub fn handle(input: &str, session: &mut SessionState) -> Vec<Action> {
    let Some(rest) = input.strip_prefix(COMMAND_MARKER) else {
        return send_text(input, session);
    };

    let (name, args) = match rest.split_once(' ') {
        Some((name, args)) => (name, args),
        None => (rest, ""),
    };

    match TABLE.binary_search_by(|(key, _)| cmp_ignore_case(key, name)) {
        Ok(index) => (TABLE[index].1)(args, session),
        Err(_) => {
            tracing::debug!(command = name, "unknown user command");
            local_error(format!("unknown command: /{name}"))
        },
    }
}

/// Compare a lowercase table key against user input, ignoring input case.
fn cmp_ignore_case(key: &str, probe: &str) -> Ordering {
    let mut key = key.bytes();
    let mut probe = probe.bytes().map(|b| b.to_ascii_lowercase());
    loop {
        match (key.next(), probe.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => match a.cmp(&b) {
                Ordering::Equal => {},
                other => return other,
            },
        }
    }
}

/// Free text: send to the current channel and echo locally.
fn send_text(text: &str, session: &mut SessionState) -> Vec<Action> {
    if text.is_empty() {
        return Vec::new();
    }
    let Some(channel) = session.channel.clone() else {
        return local_error("no channel joined");
    };
    vec![
        Action::Send(format!("PRIVMSG {channel} :{text}")),
        Action::Emit(DisplayLine::new(Role::SelfMsg, format!("<{}> {text}", session.nick))),
    ]
}

fn local_error(text: impl Into<String>) -> Vec<Action> {
    vec![Action::Emit(DisplayLine::new(Role::Error, text))]
}

fn not_connected() -> Vec<Action> {
    local_error("not connected")
}

fn help(_args: &str, _session: &mut SessionState) -> Vec<Action> {
    vec![Action::Emit(DisplayLine::new(
        Role::Status,
        "commands: /help /join /me /msg /nick /part /quit /theme /time /topic",
    ))]
}

fn join(args: &str, session: &mut SessionState) -> Vec<Action> {
    if !session.is_registered() {
        return not_connected();
    }
    let Some(channel) = first_word(args) else {
        return local_error("usage: /join <channel>");
    };
    session.channel = Some(channel.to_string());
    vec![Action::Send(format!("JOIN {channel}"))]
}

fn me(args: &str, session: &mut SessionState) -> Vec<Action> {
    if !session.is_registered() {
        return not_connected();
    }
    let Some(channel) = session.channel.clone() else {
        return local_error("no channel joined");
    };
    if args.is_empty() {
        return local_error("usage: /me <action>");
    }
    vec![
        Action::Send(format!("PRIVMSG {channel} :\u{1}ACTION {args}\u{1}")),
        Action::Emit(DisplayLine::new(Role::SelfMsg, format!("* {} {args}", session.nick))),
    ]
}

fn msg(args: &str, session: &mut SessionState) -> Vec<Action> {
    if !session.is_registered() {
        return not_connected();
    }
    let Some((target, text)) = args.split_once(' ').filter(|(_, text)| !text.is_empty()) else {
        return local_error("usage: /msg <nick> <text>");
    };
    vec![
        Action::Send(format!("PRIVMSG {target} :{text}")),
        Action::Emit(DisplayLine::new(Role::Private, format!("-> *{target}* {text}"))),
    ]
}

fn nick(args: &str, session: &mut SessionState) -> Vec<Action> {
    let Some(new) = first_word(args) else {
        return local_error("usage: /nick <nickname>");
    };
    if session.phase == Phase::Disconnected {
        // Offline: just remember it for the next connect.
        session.nick = new.to_string();
        return vec![Action::Emit(DisplayLine::new(Role::Status, format!("nick set to {new}")))];
    }
    // Connected: the server confirms via a NICK echo.
    vec![Action::Send(format!("NICK {new}"))]
}

fn part(args: &str, session: &mut SessionState) -> Vec<Action> {
    if !session.is_registered() {
        return not_connected();
    }
    let target = first_word(args).map(str::to_string).or_else(|| session.channel.clone());
    let Some(channel) = target else {
        return local_error("no channel joined");
    };
    vec![Action::Send(format!("PART {channel}"))]
}

fn quit(args: &str, session: &mut SessionState) -> Vec<Action> {
    if session.phase == Phase::Disconnected {
        return vec![Action::Quit];
    }
    let reason = if args.is_empty() { "leaving" } else { args };
    vec![Action::Send(format!("QUIT :{reason}")), Action::Quit]
}

fn theme_select(args: &str, session: &mut SessionState) -> Vec<Action> {
    let Some(id) = first_word(args).and_then(|word| word.parse::<u8>().ok()) else {
        return local_error(format!("usage: /theme <1-{}>", theme::count()));
    };
    session.theme_id = id;
    vec![Action::Emit(DisplayLine::new(Role::Status, format!("theme: {}", theme::name(id))))]
}

fn time(_args: &str, session: &mut SessionState) -> Vec<Action> {
    session.timestamps = !session.timestamps;
    let state = if session.timestamps { "on" } else { "off" };
    vec![Action::Emit(DisplayLine::new(Role::Status, format!("timestamps {state}")))]
}

fn topic(args: &str, session: &mut SessionState) -> Vec<Action> {
    if !session.is_registered() {
        return not_connected();
    }
    let Some(channel) = session.channel.clone() else {
        return local_error("no channel joined");
    };
    if args.is_empty() {
        vec![Action::Send(format!("TOPIC {channel}"))]
    } else {
        vec![Action::Send(format!("TOPIC {channel} :{args}"))]
    }
}

fn first_word(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}
