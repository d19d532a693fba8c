use thiserror::Error;
use vigil_core::{NodeIdentity, PipeAddress};

/// Hard payload cap of the transceiver frame.
pub const MAX_PAYLOAD_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioMode {
    Listen,
    Transmit,
}

#[derive(Debug, Error)]
pub enum RadioError {
    #[error("payload exceeds radio frame size: {size} > {max}")]
    PayloadTooLarge { size: usize, max: usize },
    #[error("send attempted while not in transmit mode")]
    NotTransmitting,
}

/// Half-duplex packet radio seen at driver level.
///
/// Delivery is unacknowledged and best-effort: `send` returning `Ok` means
/// the frame left this unit, nothing more. The link session controller is
/// the sole caller that flips modes, which is what makes the
/// one-in-flight-transmit guarantee hold.
pub trait Radio: Send {
    /// Re-program the frontend from the given identity. Must be called
    /// before any transmit that follows an identity change; transmitting on
    /// stale parameters is a protocol violation.
    fn reinit(&mut self, identity: &NodeIdentity) -> Result<(), RadioError>;

    /// Enter listen mode, receiving on the given pipe addresses.
    fn listen(&mut self, addresses: &[PipeAddress]) -> Result<(), RadioError>;

    /// Enter transmit mode, addressed to the given pipe.
    fn transmit(&mut self, address: PipeAddress) -> Result<(), RadioError>;

    /// Send one frame to the currently-addressed pipe. Silent loss is not
    /// an error.
    fn send(&mut self, payload: &[u8]) -> Result<(), RadioError>;

    /// Pop one pending inbound frame, if any.
    fn try_recv(&mut self) -> Option<Vec<u8>>;

    /// Diagnostic check of the hardware link. Never fatal; a unit keeps
    /// polling and transmitting into an absent link.
    fn link_ok(&self) -> bool;
}
