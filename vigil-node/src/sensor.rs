use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use vigil_link::{SensorSample, SignalFlags, SignalKind};

/// Source of last-sampled environmental values. The session controller
/// reads one sample per cycle; no smoothing or history is kept.
#[async_trait]
pub trait SensorSuite: Send {
    async fn sample(&mut self) -> SensorSample;
}

/// Simulated sensor suite producing plausible drifting values.
pub struct MockSensorSuite {
    co2_ppm: i16,
    humidity: f32,
    temp_c: f32,
}

impl MockSensorSuite {
    pub fn new() -> Self {
        Self {
            co2_ppm: 600,
            humidity: 45.0,
            temp_c: 22.0,
        }
    }
}

impl Default for MockSensorSuite {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorSuite for MockSensorSuite {
    async fn sample(&mut self) -> SensorSample {
        let mut rng = rand::rng();

        self.co2_ppm = (self.co2_ppm + rng.random_range(-40..=40)).clamp(350, 5000);
        self.humidity = (self.humidity + rng.random_range(-1.5..=1.5)).clamp(0.0, 100.0);
        self.temp_c = (self.temp_c + rng.random_range(-0.4..=0.4)).clamp(-20.0, 120.0);

        SensorSample {
            co2_ppm: self.co2_ppm,
            humidity: self.humidity,
            temp_c: self.temp_c,
            temp_f: self.temp_c * 9.0 / 5.0 + 32.0,
            // The trigger flags are owned by the interrupt side; the
            // runtime folds them in before each cycle.
            motion_detected: false,
            audio_gate_open: false,
        }
    }
}

/// Spawn an interrupt-style task that randomly raises the motion and audio
/// flags. It only ever writes the flags, never touches the radio or the
/// records, matching what a real pin handler is allowed to do.
pub fn spawn_mock_interrupts(
    flags: SignalFlags,
    interval: Duration,
    motion_chance: f64,
    audio_chance: f64,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let (motion, audio) = {
                        let mut rng = rand::rng();
                        (
                            rng.random_bool(motion_chance.clamp(0.0, 1.0)),
                            rng.random_bool(audio_chance.clamp(0.0, 1.0)),
                        )
                    };
                    if motion {
                        tracing::debug!("motion pin fired");
                        flags.raise(SignalKind::Motion);
                    }
                    if audio {
                        tracing::debug!("audio gate opened");
                        flags.raise(SignalKind::Audio);
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_suite_stays_in_physical_ranges() {
        let mut suite = MockSensorSuite::new();
        for _ in 0..200 {
            let sample = suite.sample().await;
            assert!((350..=5000).contains(&sample.co2_ppm));
            assert!((0.0..=100.0).contains(&sample.humidity));
            assert!((-20.0..=120.0).contains(&sample.temp_c));
            assert!(!sample.motion_detected);
            assert!(!sample.audio_gate_open);
        }
    }
}
