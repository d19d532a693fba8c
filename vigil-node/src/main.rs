use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use vigil_link::{LinkSession, LoopbackMedium, Role, SignalFlags};
use vigil_node::{Config, MockSensorSuite, run_node, sensor::spawn_mock_interrupts};

#[derive(Parser)]
#[command(name = "vigil-node")]
#[command(about = "Vigil TX sensor node (standalone demo mode)")]
#[command(
    long_about = "Vigil TX sensor node.\n\nRuns standalone against an isolated in-process loopback \
radio, so its frames reach no Master and no configuration pings arrive. For a connected network \
run vigil-master with sim mode enabled, which hosts the nodes on a shared medium."
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "vigil-node.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracing=info,vigil_node=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    let identity = config.identity();
    info!(
        radio_id = identity.radio_id.0,
        channel = identity.channel.0,
        power = ?identity.power,
        "Starting vigil-node"
    );

    // Standalone binaries run against the loopback medium; a hardware
    // deployment swaps in a driver implementing the same Radio trait.
    let medium = LoopbackMedium::new();
    let radio = medium.endpoint();
    tracing::warn!(
        "demo mode: isolated loopback radio, no Master will hear this node; \
         use vigil-master's sim mode for a connected network"
    );

    let flags = SignalFlags::new();
    let cancel = CancellationToken::new();

    let interrupts = spawn_mock_interrupts(
        flags.clone(),
        Duration::from_secs(config.sensors.trigger_interval_secs),
        config.sensors.motion_chance,
        config.sensors.audio_chance,
        cancel.clone(),
    );

    let session = LinkSession::new(
        radio,
        identity,
        Role::Node,
        flags,
        config.session_timings(),
    )?;

    let heartbeat = Duration::from_secs(config.timings.heartbeat_secs);
    let poll = Duration::from_millis(config.timings.poll_millis);
    let loop_cancel = cancel.clone();
    let node = tokio::spawn(async move {
        run_node(session, MockSensorSuite::new(), heartbeat, poll, loop_cancel).await;
    });

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down...");
    cancel.cancel();

    let _ = node.await;
    let _ = interrupts.await;

    info!("vigil-node shut down complete");
    Ok(())
}
