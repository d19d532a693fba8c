pub mod classify;
pub mod protocol;

pub use classify::{AlarmKind, ClassifierProfile, DangerLevel, Triage, classify};
pub use protocol::{
    Command, Frame, PING_WIRE_LEN, PIPE_ADDRESSES, PipeAddress, PingRecord, READING_WIRE_LEN,
    ReadingRecord,
};

use serde::{Deserialize, Serialize};

/// Logical id of a radio unit. Id 0 is reserved for the Master; ids 1-5
/// address the TX sensor nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RadioId(pub u8);

impl RadioId {
    pub const MASTER: RadioId = RadioId(0);

    /// Highest addressable node id (the address table has six entries).
    pub const MAX_NODE: u8 = 5;

    pub fn is_master(&self) -> bool {
        self.0 == 0
    }

    /// True when the id falls inside the TX node range 1-5.
    pub fn is_node(&self) -> bool {
        (1..=Self::MAX_NODE).contains(&self.0)
    }
}

/// Radio frequency channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel(pub u8);

/// Transmit power step of the radio frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerLevel {
    Min,
    Low,
    High,
    Max,
}

impl PowerLevel {
    pub fn to_byte(self) -> u8 {
        match self {
            PowerLevel::Min => 0,
            PowerLevel::Low => 1,
            PowerLevel::High => 2,
            PowerLevel::Max => 3,
        }
    }

    /// Total decoding: bytes outside the known range fall back to `Min`.
    pub fn from_byte(value: u8) -> Self {
        match value {
            1 => PowerLevel::Low,
            2 => PowerLevel::High,
            3 => PowerLevel::Max,
            _ => PowerLevel::Min,
        }
    }

    /// Next power step, wrapping from `Max` back to `Min`.
    pub fn next(self) -> Self {
        match self {
            PowerLevel::Min => PowerLevel::Low,
            PowerLevel::Low => PowerLevel::High,
            PowerLevel::High => PowerLevel::Max,
            PowerLevel::Max => PowerLevel::Min,
        }
    }
}

/// The currently-active radio parameters of a unit.
///
/// Owned by the link session controller; mutated only by the command
/// negotiator (TX role) or by an operator command (Master role). The radio
/// must be re-initialised from this value before any transmit that follows
/// a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub radio_id: RadioId,
    pub channel: Channel,
    pub power: PowerLevel,
}

impl NodeIdentity {
    pub fn new(radio_id: RadioId, channel: Channel, power: PowerLevel) -> Self {
        Self {
            radio_id,
            channel,
            power,
        }
    }
}
