mod record;

pub use record::{Command, Frame, PingRecord, ReadingRecord};

/// Radio pipe address: a fixed-length label, nRF24-style.
pub type PipeAddress = [u8; 5];

/// Address table shared by every unit. Index 0 is the Master's
/// receive/broadcast address; indices 1-5 are the per-node write addresses.
pub const PIPE_ADDRESSES: [PipeAddress; 6] = [
    *b"MASTR", *b"NODE1", *b"NODE2", *b"NODE3", *b"NODE4", *b"NODE5",
];

/// Wire size of a standalone [`PingRecord`].
pub const PING_WIRE_LEN: usize = 7;

/// Wire size of a full [`ReadingRecord`] (sensor fields + embedded ping).
pub const READING_WIRE_LEN: usize = 18 + PING_WIRE_LEN;
