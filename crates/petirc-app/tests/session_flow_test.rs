//! End-to-end dispatch scenarios: framed server bytes and user input
//! driving one session, as the runtime would.

use petirc_app::display::{DisplayLine, Role};
use petirc_app::{Action, Phase, SessionState, command, protocol};
use petirc_proto::LineFramer;

/// Run a chunk of server bytes through framer and dispatcher.
fn feed(
    framer: &mut LineFramer,
    session: &mut SessionState,
    bytes: &[u8],
    now_ms: u64,
) -> Vec<Action> {
    let mut actions = Vec::new();
    for line in framer.feed(bytes) {
        actions.extend(protocol::handle(&line, session, now_ms));
    }
    actions
}

#[test]
fn registration_then_join_then_chat() {
    let mut framer = LineFramer::new();
    let mut session = SessionState::new("dot");
    session.phase = Phase::Connecting;

    // Server completes registration; welcome renders as MOTD.
    let actions =
        feed(&mut framer, &mut session, b":pet.example 001 dot :Welcome to PETnet\r\n", 0);
    assert_eq!(session.phase, Phase::Registered);
    assert!(matches!(
        actions.as_slice(),
        [Action::Emit(DisplayLine { role: Role::Motd, text })] if text == "Welcome to PETnet"
    ));

    // User joins; the wire line goes out and the channel is current.
    let actions = command::handle("/join #pet", &mut session);
    assert!(matches!(
        actions.as_slice(),
        [Action::Send(line)] if line == "JOIN #pet"
    ));
    assert_eq!(session.channel.as_deref(), Some("#pet"));

    // Server echoes our join, split awkwardly across reads.
    let mut actions = feed(&mut framer, &mut session, b":dot!u@h JO", 0);
    actions.extend(feed(&mut framer, &mut session, b"IN #pet\r\n:ada!u@h PRIVMSG #pet :hi dot\r\n", 0));
    assert!(matches!(
        actions.as_slice(),
        [
            Action::Emit(DisplayLine { role: Role::JoinPart, .. }),
            Action::Emit(DisplayLine { role: Role::Channel, text }),
        ] if text == "<ada> hi dot"
    ));

    // User replies; send and echo carry the same text.
    let actions = command::handle("hi ada", &mut session);
    assert!(matches!(
        actions.as_slice(),
        [Action::Send(wire), Action::Emit(DisplayLine { role: Role::SelfMsg, text })]
            if wire == "PRIVMSG #pet :hi ada" && text == "<dot> hi ada"
    ));
}

#[test]
fn join_before_registration_is_rejected_locally() {
    let mut session = SessionState::new("dot");
    session.phase = Phase::Connecting;

    let actions = command::handle("/join #test", &mut session);

    assert!(session.channel.is_none());
    assert!(matches!(
        actions.as_slice(),
        [Action::Emit(DisplayLine { role: Role::Error, text })] if text == "not connected"
    ));
}

#[test]
fn keepalive_probe_survives_interleaved_traffic() {
    let mut framer = LineFramer::new();
    let mut session = SessionState::new("dot");
    session.phase = Phase::Registered;

    let actions = protocol::tick(&mut session, 10_000);
    assert!(matches!(
        actions.as_slice(),
        [Action::Send(line)] if line == "PING :10000"
    ));

    // Unrelated traffic does not consume the probe.
    let _ = feed(&mut framer, &mut session, b":ada!u@h PRIVMSG #pet :still here?\r\n", 10_050);
    assert!(session.probe.is_some());

    let _ = feed(&mut framer, &mut session, b":pet.example PONG pet.example :10000\r\n", 10_200);
    assert_eq!(session.latency_ms, Some(200));
    assert!(session.probe.is_none());
}

#[test]
fn disconnect_mid_line_discards_the_partial() {
    let mut framer = LineFramer::new();
    let mut session = SessionState::new("dot");
    session.phase = Phase::Registered;
    session.channel = Some("#pet".to_string());

    let actions = feed(&mut framer, &mut session, b":ada!u@h PRIVMSG #pet :half a mess", 0);
    assert!(actions.is_empty());

    // Connection drops: partial line is gone, session transitions.
    framer.reset();
    let actions = protocol::connection_lost(&mut session);

    assert_eq!(session.phase, Phase::Disconnected);
    assert!(session.channel.is_none());
    assert!(matches!(
        actions.as_slice(),
        [Action::Emit(DisplayLine { role: Role::Error, .. })]
    ));

    // Reconnect traffic starts clean.
    let actions = feed(&mut framer, &mut session, b":pet.example 001 dot :Welcome back\r\n", 0);
    assert_eq!(session.phase, Phase::Registered);
    assert_eq!(actions.len(), 1);
}
