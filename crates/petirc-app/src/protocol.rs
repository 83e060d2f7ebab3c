//! Table-driven dispatch of incoming protocol lines.
//!
//! [`handle`] parses one framed line and binary-searches a static sorted
//! table of `(command token, handler)` entries. Named commands and numeric
//! replies share the table; tokens are compared case-sensitively against
//! their canonical uppercase or numeric form. An unrecognized token is
//! rendered as a server notice through a default handler, never silently
//! discarded; a malformed line is dropped without dispatch.
//!
//! Handlers mutate [`SessionState`] and emit [`Action`]s; nothing here
//! performs I/O, and no error escapes a `handle` call.

use petirc_proto::{Message, is_channel};

use crate::action::Action;
use crate::display::{DisplayLine, Role};
use crate::session::{Phase, Probe, SessionState};

/// Keepalive probe interval while registered.
pub const PROBE_INTERVAL_MS: u64 = 30_000;
/// After this long an unanswered probe is abandoned.
pub const PROBE_TIMEOUT_MS: u64 = 60_000;

/// CTCP delimiter byte as a char.
const CTCP_MARK: char = '\u{1}';

type Handler = fn(&Message<'_>, &mut SessionState, u64) -> Vec<Action>;

/// Sorted, unique dispatch table. Numeric replies use their token as key.
static TABLE: &[(&str, Handler)] = &[
    ("001", rpl_welcome),
    ("332", rpl_topic),
    ("372", rpl_motd),
    ("375", rpl_motd),
    ("376", rpl_motd),
    ("433", err_nick_in_use),
    ("ERROR", server_error),
    ("JOIN", join),
    ("NICK", nick),
    ("NOTICE", notice),
    ("PART", part),
    ("PING", ping),
    ("PONG", pong),
    ("PRIVMSG", privmsg),
    ("QUIT", quit),
    ("TOPIC", topic),
];

/// Dispatch one complete line from the framer.
///
/// `now_ms` is the runtime's millisecond clock, used for latency samples.
pub fn handle(raw: &[u8], session: &mut SessionState, now_ms: u64) -> Vec<Action> {
    let line = String::from_utf8_lossy(raw);

    let msg = match Message::parse(&line) {
        Ok(msg) => msg,
        Err(error) => {
            tracing::debug!(%error, "dropping malformed line");
            return Vec::new();
        },
    };

    match TABLE.binary_search_by(|(key, _)| (*key).cmp(msg.command)) {
        Ok(index) => (TABLE[index].1)(&msg, session, now_ms),
        Err(_) => {
            tracing::debug!(command = msg.command, "unknown protocol command");
            vec![Action::Emit(DisplayLine::new(Role::Notice, line.as_ref()))]
        },
    }
}

/// Drive the keepalive probe schedule; call once per runtime tick.
///
/// Sends `PING :<token>` every [`PROBE_INTERVAL_MS`] while registered, one
/// probe in flight at a time. A probe unanswered for [`PROBE_TIMEOUT_MS`]
/// is abandoned without a user-visible error.
pub fn tick(session: &mut SessionState, now_ms: u64) -> Vec<Action> {
    if session.phase != Phase::Registered {
        return Vec::new();
    }

    if let Some(probe) = session.probe {
        if now_ms.saturating_sub(probe.sent_ms) < PROBE_TIMEOUT_MS {
            return Vec::new();
        }
        session.probe = None;
    }

    if session.last_probe_ms == 0 || now_ms.saturating_sub(session.last_probe_ms) >= PROBE_INTERVAL_MS
    {
        session.probe = Some(Probe { token: now_ms, sent_ms: now_ms });
        session.last_probe_ms = now_ms;
        return vec![Action::Send(format!("PING :{now_ms}"))];
    }

    Vec::new()
}

/// Transition to disconnected after the transport drops.
///
/// Connection loss is a state transition, not an abort.
pub fn connection_lost(session: &mut SessionState) -> Vec<Action> {
    session.phase = Phase::Disconnected;
    session.channel = None;
    session.latency_ms = None;
    session.probe = None;
    vec![Action::Emit(DisplayLine::new(Role::Error, "disconnected from server"))]
}

fn rpl_welcome(msg: &Message<'_>, session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    session.phase = Phase::Registered;
    if let Some(confirmed) = msg.param(0) {
        session.nick = confirmed.to_string();
    }
    let text = msg.params.last().copied().unwrap_or("welcome");
    vec![Action::Emit(DisplayLine::new(Role::Motd, text))]
}

fn rpl_motd(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let text = msg.params.last().copied().unwrap_or("");
    vec![Action::Emit(DisplayLine::new(Role::Motd, text))]
}

fn rpl_topic(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let channel = msg.param(1).unwrap_or("?");
    let text = msg.params.last().copied().unwrap_or("");
    vec![Action::Emit(DisplayLine::new(Role::Topic, format!("topic for {channel}: {text}")))]
}

fn err_nick_in_use(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let taken = msg.param(1).unwrap_or("?");
    vec![Action::Emit(DisplayLine::new(Role::Error, format!("nickname {taken} already in use")))]
}

fn server_error(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let text = msg.params.last().copied().unwrap_or("server error");
    vec![Action::Emit(DisplayLine::new(Role::Error, text))]
}

fn join(msg: &Message<'_>, session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let who = msg.sender_nick().unwrap_or("?");
    let channel = msg.params.first().copied().unwrap_or("?");

    if who == session.nick {
        session.channel = Some(channel.to_string());
        vec![Action::Emit(DisplayLine::new(Role::JoinPart, format!("* now talking in {channel}")))]
    } else {
        vec![Action::Emit(DisplayLine::new(Role::JoinPart, format!("* {who} joined {channel}")))]
    }
}

fn part(msg: &Message<'_>, session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let who = msg.sender_nick().unwrap_or("?");
    let channel = msg.params.first().copied().unwrap_or("?");

    if who == session.nick {
        if session.channel.as_deref() == Some(channel) {
            session.channel = None;
        }
        vec![Action::Emit(DisplayLine::new(Role::JoinPart, format!("* left {channel}")))]
    } else {
        vec![Action::Emit(DisplayLine::new(Role::JoinPart, format!("* {who} left {channel}")))]
    }
}

fn quit(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let who = msg.sender_nick().unwrap_or("?");
    let reason = msg.params.last().copied().unwrap_or("");
    let text = if reason.is_empty() {
        format!("* {who} quit")
    } else {
        format!("* {who} quit ({reason})")
    };
    vec![Action::Emit(DisplayLine::new(Role::JoinPart, text))]
}

fn nick(msg: &Message<'_>, session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let old = msg.sender_nick().unwrap_or("?");
    let new = msg.params.last().copied().unwrap_or("?");

    if old == session.nick {
        session.nick = new.to_string();
    }
    vec![Action::Emit(DisplayLine::new(Role::NickChange, format!("* {old} is now {new}")))]
}

fn notice(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let text = msg.params.last().copied().unwrap_or("");
    let line = match msg.sender_nick() {
        Some(sender) => format!("-{sender}- {text}"),
        None => text.to_string(),
    };
    vec![Action::Emit(DisplayLine::new(Role::Notice, line))]
}

fn ping(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    // Keepalive from the server; answer, render nothing.
    match msg.params.last() {
        Some(token) => vec![Action::Send(format!("PONG :{token}"))],
        None => vec![Action::Send("PONG".to_string())],
    }
}

fn pong(msg: &Message<'_>, session: &mut SessionState, now_ms: u64) -> Vec<Action> {
    if let Some(probe) = session.probe
        && msg.params.last().is_some_and(|token| *token == probe.token.to_string())
    {
        let rtt = now_ms.saturating_sub(probe.sent_ms);
        session.latency_ms = Some(u32::try_from(rtt).unwrap_or(u32::MAX));
        session.probe = None;
    }
    Vec::new()
}

fn privmsg(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let who = msg.sender_nick().unwrap_or("?");
    let target = msg.params.first().copied().unwrap_or("");
    let text = msg.params.last().copied().unwrap_or("");

    // CTCP ACTION renders as an emote; other CTCP queries are ignored.
    if let Some(inner) = text.strip_prefix(CTCP_MARK) {
        let inner = inner.strip_suffix(CTCP_MARK).unwrap_or(inner);
        if let Some(emote) = inner.strip_prefix("ACTION ") {
            return vec![Action::Emit(DisplayLine::new(Role::Channel, format!("* {who} {emote}")))];
        }
        tracing::debug!(from = who, "ignoring CTCP query");
        return Vec::new();
    }

    if is_channel(target) {
        vec![Action::Emit(DisplayLine::new(Role::Channel, format!("<{who}> {text}")))]
    } else {
        vec![Action::Emit(DisplayLine::new(Role::Private, format!("*{who}* {text}")))]
    }
}

fn topic(msg: &Message<'_>, _session: &mut SessionState, _now_ms: u64) -> Vec<Action> {
    let who = msg.sender_nick().unwrap_or("?");
    let text = msg.params.last().copied().unwrap_or("");
    vec![Action::Emit(DisplayLine::new(Role::Topic, format!("* {who} set topic: {text}")))]
}
