use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Interrupt-driven trigger sources that can start a send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Motion,
    Audio,
}

impl SignalKind {
    /// Settle window after a triggered cycle before the same signal may
    /// fire again. Motion gets a long window to avoid re-trigger chatter;
    /// the audio gate recovers quickly.
    pub fn default_settle(self) -> Duration {
        match self {
            SignalKind::Motion => Duration::from_secs(30),
            SignalKind::Audio => Duration::from_secs(2),
        }
    }
}

/// One atomic flag per interrupt source.
///
/// Interrupt-style tasks only ever `raise`; the main loop is the single
/// consumer and drains with `take` once per iteration. A flag raised
/// mid-cycle may be observed one cycle late but is never corrupted
/// (last-writer-wins on a single scalar).
#[derive(Clone, Default)]
pub struct SignalFlags {
    inner: Arc<Flags>,
}

#[derive(Default)]
struct Flags {
    motion: AtomicBool,
    audio: AtomicBool,
    radio_ready: AtomicBool,
}

impl SignalFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: SignalKind) -> &AtomicBool {
        match kind {
            SignalKind::Motion => &self.inner.motion,
            SignalKind::Audio => &self.inner.audio,
        }
    }

    pub fn raise(&self, kind: SignalKind) {
        self.slot(kind).store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self, kind: SignalKind) -> bool {
        self.slot(kind).load(Ordering::Relaxed)
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self, kind: SignalKind) -> bool {
        self.slot(kind).swap(false, Ordering::Relaxed)
    }

    pub fn raise_radio_ready(&self) {
        self.inner.radio_ready.store(true, Ordering::Relaxed);
    }

    pub fn take_radio_ready(&self) -> bool {
        self.inner.radio_ready.swap(false, Ordering::Relaxed)
    }
}
