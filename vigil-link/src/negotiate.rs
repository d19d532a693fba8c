use vigil_core::{AlarmKind, Command, DangerLevel, NodeIdentity, PingRecord, RadioId};

/// Phases of the configuration negotiation run on a TX node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiatorPhase {
    Idle,
    Matching,
    Applying,
}

/// What a received ping did to this unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Guard failed: the ping was addressed to a sibling on the same
    /// broadcast channel. Silently ignored, not a fault.
    Ignored,
    Applied {
        /// The session controller must reinit the radio before any further
        /// transmit when this is set.
        identity_changed: bool,
        /// Acknowledge reply to send back once the radio is consistent.
        reply: PingRecord,
    },
}

/// Command negotiation state machine, TX role.
///
/// Runs `Idle → Matching → Applying → Idle` per received ping. The
/// address+channel guard in `Matching` is what keeps a node from acting on
/// commands meant for a sibling sharing the channel.
#[derive(Debug, Default)]
pub struct Negotiator {
    phase: NegotiatorPhase,
}

impl Default for NegotiatorPhase {
    fn default() -> Self {
        NegotiatorPhase::Idle
    }
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> NegotiatorPhase {
        self.phase
    }

    /// Run one ping through the state machine.
    ///
    /// `identity` is the node's active radio parameters; `outgoing_target`
    /// is the target id stamped on the node's outgoing pings.
    pub fn handle(
        &mut self,
        ping: &PingRecord,
        identity: &mut NodeIdentity,
        outgoing_target: &mut RadioId,
    ) -> Outcome {
        self.phase = NegotiatorPhase::Matching;

        if ping.channel != identity.channel || ping.target_id != identity.radio_id {
            tracing::trace!(
                ping_channel = ping.channel.0,
                ping_target = ping.target_id.0,
                our_channel = identity.channel.0,
                our_id = identity.radio_id.0,
                "ping addressed elsewhere, ignoring"
            );
            self.phase = NegotiatorPhase::Idle;
            return Outcome::Ignored;
        }

        self.phase = NegotiatorPhase::Applying;
        let mut identity_changed = false;

        match ping.command {
            // Link re-validation only; the session controller runs the
            // diagnostic check.
            Command::None => {}
            Command::ChangeChannel => {
                identity.channel = ping.channel;
                identity_changed = true;
            }
            Command::ChangeRadioId { radio_id } => {
                identity.radio_id = radio_id;
                identity_changed = true;
            }
            Command::ChangePower { power } => {
                identity.power = power;
                identity_changed = true;
            }
            Command::ChangeAll { radio_id, power } => {
                identity.channel = ping.channel;
                identity.radio_id = radio_id;
                identity.power = power;
                identity_changed = true;
            }
            Command::ChangeTarget | Command::Acknowledge => {
                // Addressing metadata only, no radio parameter change.
                *outgoing_target = ping.target_id;
            }
        }

        if identity_changed {
            tracing::info!(
                radio_id = identity.radio_id.0,
                channel = identity.channel.0,
                power = ?identity.power,
                "applied configuration command"
            );
        }

        // The ack names its sender in `target_id` so the Master can credit
        // the right node. With a renumbering command this is the new id.
        let reply = PingRecord {
            channel: identity.channel,
            target_id: identity.radio_id,
            command: Command::Acknowledge,
            alarm_kind: AlarmKind::None,
            danger_level: DangerLevel::None,
        };

        self.phase = NegotiatorPhase::Idle;
        Outcome::Applied {
            identity_changed,
            reply,
        }
    }
}
