pub mod aggregate;
pub mod config;
pub mod console;
pub mod display;

pub use aggregate::{Aggregator, NodeStatus};
pub use config::{Config, MasterConfig, SimConfig, TimingsConfig};
pub use console::{ConsoleAction, ConsoleState, parse_command};
pub use display::{NodeView, Panel, TermPanel};
