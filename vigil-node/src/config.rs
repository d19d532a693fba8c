use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use vigil_core::{Channel, NodeIdentity, PowerLevel, RadioId};
use vigil_link::SessionTimings;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub node: NodeConfig,
    pub timings: TimingsConfig,
    pub sensors: SensorsConfig,
}

#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    /// Logical radio id, 1-5 (0 is reserved for the Master)
    pub radio_id: u8,
    /// RF channel shared with the Master
    pub channel: u8,
    /// Transmit power step
    pub power: PowerLevel,
}

#[derive(Debug, Deserialize)]
pub struct TimingsConfig {
    /// Interval in seconds between unconditional heartbeat cycles
    pub heartbeat_secs: u64,
    /// Interval in milliseconds between signal/inbound polls
    pub poll_millis: u64,
    /// Settle window in seconds after a motion-triggered cycle
    pub motion_settle_secs: u64,
    /// Settle window in seconds after an audio-triggered cycle
    pub audio_settle_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct SensorsConfig {
    /// Interval in seconds between simulated interrupt opportunities
    pub trigger_interval_secs: u64,
    /// Probability per opportunity that the motion pin fires
    pub motion_chance: f64,
    /// Probability per opportunity that the audio gate opens
    pub audio_chance: f64,
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// The node id range is enforced here, at the edge; the wire codec
    /// itself stays total.
    fn validate(&self) -> color_eyre::Result<()> {
        if !RadioId(self.node.radio_id).is_node() {
            return Err(color_eyre::eyre::eyre!(
                "node radio_id must be 1-{}, got {}",
                RadioId::MAX_NODE,
                self.node.radio_id
            ));
        }
        Ok(())
    }

    pub fn identity(&self) -> NodeIdentity {
        NodeIdentity::new(
            RadioId(self.node.radio_id),
            Channel(self.node.channel),
            self.node.power,
        )
    }

    pub fn session_timings(&self) -> SessionTimings {
        SessionTimings {
            motion_settle: Duration::from_secs(self.timings.motion_settle_secs),
            audio_settle: Duration::from_secs(self.timings.audio_settle_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node: NodeConfig {
                radio_id: 1,
                channel: 81,
                power: PowerLevel::High,
            },
            timings: TimingsConfig {
                heartbeat_secs: 30,
                poll_millis: 50,
                motion_settle_secs: 30,
                audio_settle_secs: 2,
            },
            sensors: SensorsConfig {
                trigger_interval_secs: 5,
                motion_chance: 0.05,
                audio_chance: 0.1,
            },
        }
    }
}
