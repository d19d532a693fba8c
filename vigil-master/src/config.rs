use std::path::Path;

use serde::Deserialize;
use vigil_core::{Channel, NodeIdentity, PowerLevel, RadioId};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub master: MasterConfig,
    pub timings: TimingsConfig,
    pub sim: SimConfig,
}

#[derive(Debug, Deserialize)]
pub struct MasterConfig {
    /// RF channel the network operates on
    pub channel: u8,
    /// Transmit power step
    pub power: PowerLevel,
}

#[derive(Debug, Deserialize)]
pub struct TimingsConfig {
    /// Interval in milliseconds between inbound polls
    pub poll_millis: u64,
    /// Interval in seconds between status summaries
    pub status_secs: u64,
}

/// Where node traffic comes from. `Loopback` spawns in-process simulated
/// nodes on the shared medium; `Off` waits for a hardware radio driver.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimConfig {
    Off,
    Loopback {
        /// Number of simulated TX nodes (1-5)
        node_count: usize,
        /// Heartbeat interval of the simulated nodes, in seconds
        heartbeat_secs: u64,
    },
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> color_eyre::Result<()> {
        if let SimConfig::Loopback { node_count, .. } = self.sim {
            if node_count == 0 || node_count > usize::from(RadioId::MAX_NODE) {
                return Err(color_eyre::eyre::eyre!(
                    "sim node_count must be 1-{}, got {}",
                    RadioId::MAX_NODE,
                    node_count
                ));
            }
        }
        Ok(())
    }

    pub fn identity(&self) -> NodeIdentity {
        NodeIdentity::new(
            RadioId::MASTER,
            Channel(self.master.channel),
            self.master.power,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master: MasterConfig {
                channel: 81,
                power: PowerLevel::Max,
            },
            timings: TimingsConfig {
                poll_millis: 50,
                status_secs: 60,
            },
            sim: SimConfig::Loopback {
                node_count: 3,
                heartbeat_secs: 10,
            },
        }
    }
}
