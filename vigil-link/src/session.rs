use std::time::Duration;

use tokio::time::Instant;
use vigil_core::{
    ClassifierProfile, Frame, NodeIdentity, PIPE_ADDRESSES, PingRecord, PipeAddress, RadioId,
    ReadingRecord, Triage, classify,
};

use crate::negotiate::{Negotiator, Outcome};
use crate::radio::{Radio, RadioError};
use crate::signal::{SignalFlags, SignalKind};

/// Which half of the network a session controller is running for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Node,
    Master,
}

impl Role {
    pub fn profile(self) -> ClassifierProfile {
        match self {
            Role::Node => ClassifierProfile::Node,
            Role::Master => ClassifierProfile::Master,
        }
    }
}

/// Why a send cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleReason {
    Heartbeat,
    Motion,
    Audio,
    Operator,
}

/// Settle windows applied by the session controller. These are deadlines
/// checked by the scheduling loop, not in-line sleeps, so tests can drive
/// them with a paused clock.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimings {
    pub motion_settle: Duration,
    pub audio_settle: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            motion_settle: SignalKind::Motion.default_settle(),
            audio_settle: SignalKind::Audio.default_settle(),
        }
    }
}

impl SessionTimings {
    fn settle(&self, kind: SignalKind) -> Duration {
        match kind {
            SignalKind::Motion => self.motion_settle,
            SignalKind::Audio => self.audio_settle,
        }
    }
}

/// Last-sampled sensor state, handed to the controller each cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSample {
    pub co2_ppm: i16,
    pub humidity: f32,
    pub temp_c: f32,
    pub temp_f: f32,
    pub motion_detected: bool,
    pub audio_gate_open: bool,
}

/// Result of handing an inbound ping to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    Ignored,
    Applied { identity_changed: bool },
}

/// Link session controller: sole owner of the radio's half-duplex mode and
/// of the send/triage/reply cycle.
///
/// There is exactly one controller per unit and it is the only code that
/// flips transmit/listen, which is what enforces the at-most-one-in-flight
/// transmit guarantee.
pub struct LinkSession<R: Radio> {
    radio: R,
    identity: NodeIdentity,
    role: Role,
    flags: SignalFlags,
    negotiator: Negotiator,
    /// Target id stamped on outgoing pings; defaults to the Master.
    outgoing_target: RadioId,
    timings: SessionTimings,
    motion_settle_until: Option<Instant>,
    audio_settle_until: Option<Instant>,
}

impl<R: Radio> LinkSession<R> {
    pub fn new(
        mut radio: R,
        identity: NodeIdentity,
        role: Role,
        flags: SignalFlags,
        timings: SessionTimings,
    ) -> Result<Self, RadioError> {
        radio.reinit(&identity)?;
        let mut session = Self {
            radio,
            identity,
            role,
            flags,
            negotiator: Negotiator::new(),
            outgoing_target: RadioId::MASTER,
            timings,
            motion_settle_until: None,
            audio_settle_until: None,
        };
        session.enter_listen()?;
        Ok(session)
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn flags(&self) -> &SignalFlags {
        &self.flags
    }

    /// The pipe this unit writes to: the Master uses the fixed broadcast
    /// address, nodes the address keyed by their radio id.
    fn tx_address(&self) -> PipeAddress {
        match self.role {
            Role::Master => PIPE_ADDRESSES[0],
            Role::Node => {
                let idx = usize::from(self.identity.radio_id.0.min(RadioId::MAX_NODE));
                PIPE_ADDRESSES[idx]
            }
        }
    }

    /// Return to listen mode, addressed to receive from the counterpart:
    /// nodes hear the Master's broadcast pipe, the Master hears every node
    /// pipe.
    fn enter_listen(&mut self) -> Result<(), RadioError> {
        match self.role {
            Role::Node => self.radio.listen(&PIPE_ADDRESSES[..1]),
            Role::Master => self.radio.listen(&PIPE_ADDRESSES[1..]),
        }
    }

    /// One complete sense → classify → transmit → listen unit of work.
    pub fn send_cycle(
        &mut self,
        reason: CycleReason,
        sample: &SensorSample,
    ) -> Result<Triage, RadioError> {
        let mut record = ReadingRecord {
            source_channel: self.identity.channel,
            source_radio: self.identity.radio_id,
            co2_ppm: sample.co2_ppm,
            humidity: sample.humidity,
            temp_c: sample.temp_c,
            temp_f: sample.temp_f,
            motion_detected: sample.motion_detected,
            audio_gate_open: sample.audio_gate_open,
            command: PingRecord::quiet(self.identity.channel, self.outgoing_target),
        };

        let triage = classify(&record, self.role.profile());
        record.command.alarm_kind = triage.alarm;
        record.command.danger_level = triage.danger;

        self.radio.transmit(self.tx_address())?;
        if let Err(e) = self.radio.send(&record.encode()) {
            // Best effort: a lost record waits for the next cycle.
            tracing::warn!(error = %e, ?reason, "send failed, dropping record");
        }
        self.enter_listen()?;

        tracing::info!(
            ?reason,
            radio_id = self.identity.radio_id.0,
            alarm = ?triage.alarm,
            danger = ?triage.danger,
            "send cycle complete"
        );

        // The triggering flag is only cleared after the transmit, then held
        // closed for the signal's settle window.
        match reason {
            CycleReason::Motion => {
                self.flags.take(SignalKind::Motion);
                self.motion_settle_until =
                    Some(Instant::now() + self.timings.settle(SignalKind::Motion));
            }
            CycleReason::Audio => {
                self.flags.take(SignalKind::Audio);
                self.audio_settle_until =
                    Some(Instant::now() + self.timings.settle(SignalKind::Audio));
            }
            CycleReason::Heartbeat | CycleReason::Operator => {}
        }

        Ok(triage)
    }

    /// Whether a raised signal is allowed to start a cycle now.
    pub fn signal_ready(&self, kind: SignalKind) -> bool {
        if !self.flags.is_raised(kind) {
            return false;
        }
        let settle_until = match kind {
            SignalKind::Motion => self.motion_settle_until,
            SignalKind::Audio => self.audio_settle_until,
        };
        match settle_until {
            Some(deadline) => Instant::now() >= deadline,
            None => true,
        }
    }

    /// Send a standalone ping (Master configuration push, node ack reply).
    pub fn send_ping(&mut self, ping: &PingRecord) -> Result<(), RadioError> {
        self.radio.transmit(self.tx_address())?;
        if let Err(e) = self.radio.send(&ping.encode()) {
            tracing::warn!(error = %e, "ping send failed");
        }
        self.enter_listen()
    }

    /// Run an inbound ping through the negotiator (TX role).
    ///
    /// On an applied identity change the radio is re-initialised before the
    /// acknowledge reply goes out; transmitting on stale parameters first
    /// would be a protocol violation.
    pub fn handle_ping(&mut self, ping: &PingRecord) -> Result<PingOutcome, RadioError> {
        if self.role == Role::Master {
            tracing::debug!("master ignores inbound configuration pings");
            return Ok(PingOutcome::Ignored);
        }

        match self
            .negotiator
            .handle(ping, &mut self.identity, &mut self.outgoing_target)
        {
            Outcome::Ignored => Ok(PingOutcome::Ignored),
            Outcome::Applied {
                identity_changed,
                reply,
            } => {
                if identity_changed {
                    self.radio.reinit(&self.identity)?;
                    self.enter_listen()?;
                } else {
                    self.check_link();
                }
                self.send_ping(&reply)?;
                Ok(PingOutcome::Applied { identity_changed })
            }
        }
    }

    /// Operator override of the local radio parameters (Master console).
    pub fn apply_operator(&mut self, identity: NodeIdentity) -> Result<(), RadioError> {
        self.identity = identity;
        self.radio.reinit(&self.identity)?;
        self.enter_listen()
    }

    /// Pop one inbound frame, length-keyed into reading or ping.
    pub fn poll_frame(&mut self) -> Option<Frame> {
        self.radio
            .try_recv()
            .map(|payload| Frame::from_payload(&payload))
    }

    /// Diagnostic link check; degraded hardware is reported, never fatal.
    pub fn check_link(&self) -> bool {
        let ok = self.radio.link_ok();
        if !ok {
            tracing::warn!(
                radio_id = self.identity.radio_id.0,
                "radio link not responding, continuing best-effort"
            );
        }
        ok
    }
}
