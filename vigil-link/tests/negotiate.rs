use vigil_core::{
    AlarmKind, Channel, Command, DangerLevel, NodeIdentity, PingRecord, PowerLevel, RadioId,
};
use vigil_link::{Negotiator, NegotiatorPhase, Outcome};

fn node_identity(id: u8) -> NodeIdentity {
    NodeIdentity::new(RadioId(id), Channel(81), PowerLevel::High)
}

fn ping(target: u8, command: Command) -> PingRecord {
    PingRecord {
        channel: Channel(81),
        target_id: RadioId(target),
        command,
        alarm_kind: AlarmKind::None,
        danger_level: DangerLevel::None,
    }
}

#[test]
fn addressed_node_applies_sibling_ignores() {
    let ping = ping(5, Command::ChangePower {
        power: PowerLevel::Max,
    });

    let mut addressed = node_identity(5);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(&ping, &mut addressed, &mut target);
    assert!(matches!(outcome, Outcome::Applied { .. }));
    assert_eq!(addressed.power, PowerLevel::Max);

    let mut sibling = node_identity(3);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(&ping, &mut sibling, &mut target);
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(sibling.power, PowerLevel::High, "sibling left untouched");
}

#[test]
fn channel_mismatch_is_ignored() {
    let mut ping = ping(5, Command::ChangeChannel);
    ping.channel = Channel(90);

    let mut identity = node_identity(5);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(&ping, &mut identity, &mut target);
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(identity.channel, Channel(81));
}

#[test]
fn none_command_changes_nothing() {
    let mut identity = node_identity(2);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(&ping(2, Command::None), &mut identity, &mut target);
    match outcome {
        Outcome::Applied {
            identity_changed,
            reply,
        } => {
            assert!(!identity_changed);
            assert_eq!(reply.command, Command::Acknowledge);
        }
        other => panic!("expected Applied, got {other:?}"),
    }
    assert_eq!(identity, node_identity(2));
}

#[test]
fn change_channel_adopts_addressed_channel() {
    let mut identity = node_identity(1);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(
        &ping(1, Command::ChangeChannel),
        &mut identity,
        &mut target,
    );
    match outcome {
        Outcome::Applied {
            identity_changed, ..
        } => assert!(identity_changed),
        other => panic!("expected Applied, got {other:?}"),
    }
    assert_eq!(identity.channel, Channel(81));
}

#[test]
fn change_radio_id_renumbers_node() {
    let mut identity = node_identity(1);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(
        &ping(1, Command::ChangeRadioId {
            radio_id: RadioId(4),
        }),
        &mut identity,
        &mut target,
    );
    assert!(matches!(
        outcome,
        Outcome::Applied {
            identity_changed: true,
            ..
        }
    ));
    assert_eq!(identity.radio_id, RadioId(4));
}

#[test]
fn change_all_adopts_every_parameter() {
    let mut identity = node_identity(2);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(
        &ping(2, Command::ChangeAll {
            radio_id: RadioId(5),
            power: PowerLevel::Min,
        }),
        &mut identity,
        &mut target,
    );
    assert!(matches!(
        outcome,
        Outcome::Applied {
            identity_changed: true,
            ..
        }
    ));
    assert_eq!(identity.radio_id, RadioId(5));
    assert_eq!(identity.channel, Channel(81));
    assert_eq!(identity.power, PowerLevel::Min);
}

#[test]
fn change_target_only_touches_outgoing_addressing() {
    let mut identity = node_identity(3);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(
        &ping(3, Command::ChangeTarget),
        &mut identity,
        &mut target,
    );
    match outcome {
        Outcome::Applied {
            identity_changed,
            reply,
        } => {
            assert!(!identity_changed, "no radio parameter change");
            assert_eq!(reply.target_id, RadioId(3));
        }
        other => panic!("expected Applied, got {other:?}"),
    }
    assert_eq!(target, RadioId(3));
    assert_eq!(identity, node_identity(3));
}

#[test]
fn reply_is_acknowledge_on_current_channel() {
    let mut identity = node_identity(1);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(
        &ping(1, Command::ChangePower {
            power: PowerLevel::Low,
        }),
        &mut identity,
        &mut target,
    );
    let Outcome::Applied { reply, .. } = outcome else {
        panic!("expected Applied");
    };
    assert_eq!(reply.command, Command::Acknowledge);
    assert_eq!(reply.channel, identity.channel);
    assert_eq!(reply.alarm_kind, AlarmKind::None);
    assert_eq!(reply.danger_level, DangerLevel::None);
}

#[test]
fn reply_names_the_replying_node() {
    let mut identity = node_identity(3);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(
        &ping(3, Command::ChangePower {
            power: PowerLevel::Max,
        }),
        &mut identity,
        &mut target,
    );
    let Outcome::Applied { reply, .. } = outcome else {
        panic!("expected Applied");
    };
    assert_eq!(reply.target_id, RadioId(3), "ack identifies its sender");

    // After a renumbering the ack carries the node's new id.
    let mut identity = node_identity(2);
    let mut target = RadioId::MASTER;
    let outcome = Negotiator::new().handle(
        &ping(2, Command::ChangeRadioId {
            radio_id: RadioId(5),
        }),
        &mut identity,
        &mut target,
    );
    let Outcome::Applied { reply, .. } = outcome else {
        panic!("expected Applied");
    };
    assert_eq!(reply.target_id, RadioId(5));
}

#[test]
fn negotiator_returns_to_idle() {
    let mut negotiator = Negotiator::new();
    assert_eq!(negotiator.phase(), NegotiatorPhase::Idle);

    let mut identity = node_identity(1);
    let mut target = RadioId::MASTER;
    let _ = negotiator.handle(&ping(1, Command::None), &mut identity, &mut target);
    assert_eq!(negotiator.phase(), NegotiatorPhase::Idle);

    let _ = negotiator.handle(&ping(2, Command::None), &mut identity, &mut target);
    assert_eq!(negotiator.phase(), NegotiatorPhase::Idle);
}
