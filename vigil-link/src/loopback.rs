use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use vigil_core::{NodeIdentity, PipeAddress};

use crate::radio::{MAX_PAYLOAD_LEN, Radio, RadioError, RadioMode};

/// In-memory broadcast medium standing in for the RF path.
///
/// Every endpoint created from the same medium shares one "air": a frame
/// sent on channel `c` to pipe address `a` is delivered to each listening
/// endpoint tuned to `c` with `a` among its open pipes. Mismatched channel
/// or address is silent loss, exactly like the real thing.
#[derive(Clone, Default)]
pub struct LoopbackMedium {
    inner: Arc<Mutex<MediumInner>>,
}

#[derive(Default)]
struct MediumInner {
    endpoints: Vec<EndpointState>,
}

struct EndpointState {
    channel: u8,
    mode: RadioMode,
    rx_pipes: Vec<PipeAddress>,
    tx_pipe: Option<PipeAddress>,
    queue: VecDeque<Vec<u8>>,
    link_present: bool,
}

impl LoopbackMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new endpoint to this medium.
    pub fn endpoint(&self) -> LoopbackRadio {
        let mut inner = self.inner.lock().unwrap();
        inner.endpoints.push(EndpointState {
            channel: 0,
            mode: RadioMode::Listen,
            rx_pipes: Vec::new(),
            tx_pipe: None,
            queue: VecDeque::new(),
            link_present: true,
        });
        LoopbackRadio {
            medium: Arc::clone(&self.inner),
            id: inner.endpoints.len() - 1,
        }
    }
}

/// One endpoint on a [`LoopbackMedium`].
pub struct LoopbackRadio {
    medium: Arc<Mutex<MediumInner>>,
    id: usize,
}

impl LoopbackRadio {
    /// Simulate the transceiver module being absent or wedged. Sends are
    /// dropped and `link_ok` reports false until re-attached.
    pub fn set_link_present(&mut self, present: bool) {
        let mut inner = self.medium.lock().unwrap();
        inner.endpoints[self.id].link_present = present;
    }
}

impl Radio for LoopbackRadio {
    fn reinit(&mut self, identity: &NodeIdentity) -> Result<(), RadioError> {
        let mut inner = self.medium.lock().unwrap();
        let ep = &mut inner.endpoints[self.id];
        ep.channel = identity.channel.0;
        ep.mode = RadioMode::Listen;
        ep.tx_pipe = None;
        Ok(())
    }

    fn listen(&mut self, addresses: &[PipeAddress]) -> Result<(), RadioError> {
        let mut inner = self.medium.lock().unwrap();
        let ep = &mut inner.endpoints[self.id];
        ep.mode = RadioMode::Listen;
        ep.rx_pipes = addresses.to_vec();
        ep.tx_pipe = None;
        Ok(())
    }

    fn transmit(&mut self, address: PipeAddress) -> Result<(), RadioError> {
        let mut inner = self.medium.lock().unwrap();
        let ep = &mut inner.endpoints[self.id];
        ep.mode = RadioMode::Transmit;
        ep.tx_pipe = Some(address);
        Ok(())
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(RadioError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }

        let mut inner = self.medium.lock().unwrap();
        let (channel, pipe, link_present) = {
            let ep = &inner.endpoints[self.id];
            if ep.mode != RadioMode::Transmit {
                return Err(RadioError::NotTransmitting);
            }
            (ep.channel, ep.tx_pipe, ep.link_present)
        };

        // A detached module swallows the frame; best-effort by design.
        if !link_present {
            return Ok(());
        }
        let Some(pipe) = pipe else {
            return Err(RadioError::NotTransmitting);
        };

        let sender = self.id;
        for (idx, ep) in inner.endpoints.iter_mut().enumerate() {
            if idx == sender
                || !ep.link_present
                || ep.mode != RadioMode::Listen
                || ep.channel != channel
                || !ep.rx_pipes.contains(&pipe)
            {
                continue;
            }
            ep.queue.push_back(payload.to_vec());
        }

        Ok(())
    }

    fn try_recv(&mut self) -> Option<Vec<u8>> {
        let mut inner = self.medium.lock().unwrap();
        inner.endpoints[self.id].queue.pop_front()
    }

    fn link_ok(&self) -> bool {
        let inner = self.medium.lock().unwrap();
        inner.endpoints[self.id].link_present
    }
}
