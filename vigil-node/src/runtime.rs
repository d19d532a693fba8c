use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};
use vigil_core::Frame;
use vigil_link::{CycleReason, LinkSession, Radio, SensorSample, SignalKind};

use crate::sensor::SensorSuite;

/// Single cooperative control loop of a TX node.
///
/// All shared state except the interrupt flags is mutated here and only
/// here; the session controller owns the radio, so no concurrent transmits
/// are possible.
pub async fn run_node<R, S>(
    mut session: LinkSession<R>,
    mut suite: S,
    heartbeat: Duration,
    poll: Duration,
    cancel: CancellationToken,
) where
    R: Radio,
    S: SensorSuite,
{
    let flags = session.flags().clone();
    let mut heartbeat_timer = tokio::time::interval(heartbeat);
    let mut poll_timer = tokio::time::interval(poll);

    info!(
        radio_id = session.identity().radio_id.0,
        channel = session.identity().channel.0,
        "node control loop started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("node control loop shutting down");
                break;
            }
            _ = heartbeat_timer.tick() => {
                let sample = refresh(&mut suite, &flags).await;
                if let Err(e) = session.send_cycle(CycleReason::Heartbeat, &sample) {
                    error!(error = %e, "heartbeat cycle failed");
                }
            }
            _ = poll_timer.tick() => {
                // Inbound first: a pending configuration ping may change the
                // parameters the next cycle transmits on.
                while let Some(frame) = session.poll_frame() {
                    match frame {
                        Frame::Ping(ping) => {
                            if let Err(e) = session.handle_ping(&ping) {
                                error!(error = %e, "failed to apply configuration ping");
                            }
                        }
                        Frame::Reading(_) => {
                            trace!("node ignores reading traffic");
                        }
                    }
                }

                for (kind, reason) in [
                    (SignalKind::Motion, CycleReason::Motion),
                    (SignalKind::Audio, CycleReason::Audio),
                ] {
                    if session.signal_ready(kind) {
                        let sample = refresh(&mut suite, &flags).await;
                        if let Err(e) = session.send_cycle(reason, &sample) {
                            error!(error = %e, ?reason, "triggered cycle failed");
                        }
                    }
                }

                if flags.take_radio_ready() {
                    session.check_link();
                }
            }
        }
    }
}

/// Pull a fresh sample and fold the interrupt flags into it; the flags
/// themselves are only cleared by the session after the transmit completes.
async fn refresh<S: SensorSuite>(
    suite: &mut S,
    flags: &vigil_link::SignalFlags,
) -> SensorSample {
    let mut sample = suite.sample().await;
    sample.motion_detected = flags.is_raised(SignalKind::Motion);
    sample.audio_gate_open = flags.is_raised(SignalKind::Audio);
    sample
}
