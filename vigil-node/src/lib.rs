pub mod config;
pub mod runtime;
pub mod sensor;

pub use config::{Config, NodeConfig, SensorsConfig, TimingsConfig};
pub use runtime::run_node;
pub use sensor::{MockSensorSuite, SensorSuite, spawn_mock_interrupts};
