use serde::{Deserialize, Serialize};

use super::{PING_WIRE_LEN, READING_WIRE_LEN};
use crate::classify::{AlarmKind, DangerLevel};
use crate::{Channel, PowerLevel, RadioId};

// Wire layout is fixed-size and field-order stable so that encode/decode is
// a plain reinterpretation, never a parser. Decode is total: undersized
// input zero-extends, unknown enum bytes fall back to their None/Min value.

/// Configuration command carried by a [`PingRecord`].
///
/// On the wire every slot is always present (fixed layout); the variant
/// payloads only surface the slots each command actually consumes.
/// `ChangeChannel` and the addressing-only commands take their value from
/// the record's own `channel`/`target_id` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// No parameter change; the receiver re-validates its radio link.
    None,
    /// Adopt the channel this record was addressed on.
    ChangeChannel,
    /// Adopt a new logical radio id.
    ChangeRadioId { radio_id: RadioId },
    /// Adopt a new transmit power step.
    ChangePower { power: PowerLevel },
    /// Adopt channel, radio id and power together.
    ChangeAll { radio_id: RadioId, power: PowerLevel },
    /// Copy the record's target id into the outgoing ping (addressing
    /// metadata only, no radio parameter change).
    ChangeTarget,
    /// Acknowledgement flag; addressing metadata only.
    Acknowledge,
}

impl Command {
    fn kind_byte(&self) -> u8 {
        match self {
            Command::None => 0,
            Command::ChangeChannel => 1,
            Command::ChangeRadioId { .. } => 2,
            Command::ChangePower { .. } => 3,
            Command::ChangeAll { .. } => 4,
            Command::ChangeTarget => 5,
            Command::Acknowledge => 6,
        }
    }
}

/// Bidirectional control payload: embedded in every reading and also sent
/// standalone by the Master to push configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PingRecord {
    /// Channel this record is addressed on; the negotiator guard compares
    /// it against the receiver's active channel.
    pub channel: Channel,
    /// Addressed node id; guard compares it against the receiver's id.
    pub target_id: RadioId,
    pub command: Command,
    /// Classifier output. Write-once per cycle; only ever hand-set to None.
    pub alarm_kind: AlarmKind,
    pub danger_level: DangerLevel,
}

impl PingRecord {
    /// A quiet ping addressed to `target_id` on `channel`.
    pub fn quiet(channel: Channel, target_id: RadioId) -> Self {
        Self {
            channel,
            target_id,
            command: Command::None,
            alarm_kind: AlarmKind::None,
            danger_level: DangerLevel::None,
        }
    }

    pub fn encode(&self) -> [u8; PING_WIRE_LEN] {
        let mut bytes = [0u8; PING_WIRE_LEN];
        bytes[0] = self.command.kind_byte();
        bytes[1] = self.channel.0;
        match self.command {
            Command::ChangeRadioId { radio_id } => bytes[2] = radio_id.0,
            Command::ChangePower { power } => bytes[3] = power.to_byte(),
            Command::ChangeAll { radio_id, power } => {
                bytes[2] = radio_id.0;
                bytes[3] = power.to_byte();
            }
            _ => {}
        }
        bytes[4] = self.target_id.0;
        bytes[5] = self.alarm_kind.to_byte();
        bytes[6] = self.danger_level.to_byte();
        bytes
    }

    /// Total decode; undersized input reads as zeroes past its end.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut buf = [0u8; PING_WIRE_LEN];
        let n = bytes.len().min(PING_WIRE_LEN);
        buf[..n].copy_from_slice(&bytes[..n]);

        let command = match buf[0] {
            1 => Command::ChangeChannel,
            2 => Command::ChangeRadioId {
                radio_id: RadioId(buf[2]),
            },
            3 => Command::ChangePower {
                power: PowerLevel::from_byte(buf[3]),
            },
            4 => Command::ChangeAll {
                radio_id: RadioId(buf[2]),
                power: PowerLevel::from_byte(buf[3]),
            },
            5 => Command::ChangeTarget,
            6 => Command::Acknowledge,
            _ => Command::None,
        };

        Self {
            channel: Channel(buf[1]),
            target_id: RadioId(buf[4]),
            command,
            alarm_kind: AlarmKind::from_byte(buf[5]),
            danger_level: DangerLevel::from_byte(buf[6]),
        }
    }
}

/// One node's sensor snapshot plus the embedded control sub-record. Created
/// fresh each transmit cycle; sensor fields are last-sampled values, never
/// smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub source_channel: Channel,
    pub source_radio: RadioId,
    pub co2_ppm: i16,
    pub humidity: f32,
    pub temp_c: f32,
    pub temp_f: f32,
    pub motion_detected: bool,
    pub audio_gate_open: bool,
    pub command: PingRecord,
}

impl ReadingRecord {
    pub fn encode(&self) -> [u8; READING_WIRE_LEN] {
        let mut bytes = [0u8; READING_WIRE_LEN];
        bytes[0] = self.source_channel.0;
        bytes[1] = self.source_radio.0;
        bytes[2..4].copy_from_slice(&self.co2_ppm.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.humidity.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.temp_c.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.temp_f.to_le_bytes());
        bytes[16] = self.motion_detected as u8;
        bytes[17] = self.audio_gate_open as u8;
        bytes[18..].copy_from_slice(&self.command.encode());
        bytes
    }

    /// Total decode; undersized input reads as zeroes past its end.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut buf = [0u8; READING_WIRE_LEN];
        let n = bytes.len().min(READING_WIRE_LEN);
        buf[..n].copy_from_slice(&bytes[..n]);

        Self {
            source_channel: Channel(buf[0]),
            source_radio: RadioId(buf[1]),
            co2_ppm: i16::from_le_bytes([buf[2], buf[3]]),
            humidity: f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            temp_c: f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            temp_f: f32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
            motion_detected: buf[16] != 0,
            audio_gate_open: buf[17] != 0,
            command: PingRecord::decode(&buf[18..]),
        }
    }
}

/// Inbound payload, keyed by length: the wire format carries no tag, so a
/// payload of exactly [`PING_WIRE_LEN`] bytes is a standalone ping and
/// everything else decodes as a reading.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Reading(ReadingRecord),
    Ping(PingRecord),
}

impl Frame {
    pub fn from_payload(payload: &[u8]) -> Self {
        if payload.len() == PING_WIRE_LEN {
            Frame::Ping(PingRecord::decode(payload))
        } else {
            Frame::Reading(ReadingRecord::decode(payload))
        }
    }
}
