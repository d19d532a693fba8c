use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use vigil_core::{Channel, Frame, NodeIdentity, PowerLevel, RadioId};
use vigil_link::{LinkSession, LoopbackMedium, Radio, Role, SessionTimings, SignalFlags};
use vigil_master::console::{self, ConsoleAction, ConsoleState};
use vigil_master::{Aggregator, Config, SimConfig, TermPanel};
use vigil_node::{MockSensorSuite, run_node, sensor::spawn_mock_interrupts};

#[derive(Parser)]
#[command(name = "vigil-master")]
#[command(about = "Vigil RX master")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "vigil-master.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracing=info,vigil_master=info".to_owned());
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
        channel = identity.channel.0,
        power = ?identity.power,
        "Starting vigil-master"
    );

    let medium = LoopbackMedium::new();
    let cancel = CancellationToken::new();
    let mut sim_handles = Vec::new();

    match config.sim {
        SimConfig::Off => {
            info!("No simulated nodes; waiting for radio traffic");
        }
        SimConfig::Loopback {
            node_count,
            heartbeat_secs,
        } => {
            info!(node_count, heartbeat_secs, "Spawning simulated TX nodes");
            for id in 1..=node_count as u8 {
                sim_handles.push(spawn_sim_node(
                    &medium,
                    NodeIdentity::new(RadioId(id), identity.channel, PowerLevel::High),
                    Duration::from_secs(heartbeat_secs),
                    cancel.clone(),
                )?);
            }
        }
    }

    let session = LinkSession::new(
        medium.endpoint(),
        identity,
        Role::Master,
        SignalFlags::new(),
        SessionTimings::default(),
    )?;

    let aggregator = Aggregator::new(TermPanel);
    let poll = Duration::from_millis(config.timings.poll_millis);
    let status_every = Duration::from_secs(config.timings.status_secs);

    let master_cancel = cancel.clone();
    let master = tokio::spawn(async move {
        run_master(session, aggregator, poll, status_every, master_cancel).await;
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            cancel.cancel();
        }
        _ = cancel.cancelled() => {}
    }

    let _ = master.await;
    for handle in sim_handles {
        let _ = handle.await;
    }

    info!("vigil-master shut down complete");
    Ok(())
}

/// Spawn one in-process simulated TX node on the shared loopback medium.
fn spawn_sim_node(
    medium: &LoopbackMedium,
    identity: NodeIdentity,
    heartbeat: Duration,
    cancel: CancellationToken,
) -> color_eyre::Result<tokio::task::JoinHandle<()>> {
    let flags = SignalFlags::new();
    spawn_mock_interrupts(
        flags.clone(),
        Duration::from_secs(5),
        0.05,
        0.1,
        cancel.clone(),
    );

    let session = LinkSession::new(
        medium.endpoint(),
        identity,
        Role::Node,
        flags,
        SessionTimings::default(),
    )?;

    Ok(tokio::spawn(async move {
        run_node(
            session,
            MockSensorSuite::new(),
            heartbeat,
            Duration::from_millis(50),
            cancel,
        )
        .await;
    }))
}

/// Master control loop: inbound dispatch, console surface, status summary.
async fn run_master<R: Radio>(
    mut session: LinkSession<R>,
    mut aggregator: Aggregator<TermPanel>,
    poll: Duration,
    status_every: Duration,
    cancel: CancellationToken,
) {
    let mut poll_timer = tokio::time::interval(poll);
    let mut status_timer = tokio::time::interval(status_every);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut state = ConsoleState::default();

    println!("{}", console::HELP_TEXT);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("master control loop shutting down");
                break;
            }
            _ = poll_timer.tick() => {
                while let Some(frame) = session.poll_frame() {
                    match frame {
                        Frame::Reading(reading) => {
                            aggregator.ingest(reading);
                        }
                        Frame::Ping(ping) => aggregator.ingest_ack(&ping),
                    }
                }
            }
            _ = status_timer.tick() => {
                for (id, status) in aggregator.statuses() {
                    info!(
                        node = id.0,
                        readings = status.readings,
                        acks = status.acks,
                        alarm = ?status.triage.alarm,
                        danger = ?status.triage.danger,
                        seen_at = %status.seen_at,
                        "node status"
                    );
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if let Some(action) = console::parse_command(&line, &mut state) {
                            handle_action(action, &mut session, &aggregator, &state, &cancel);
                        }
                    }
                    Ok(None) => {
                        info!("console closed");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!(error = %e, "console read failed");
                        stdin_open = false;
                    }
                }
            }
        }
    }
}

fn handle_action<R: Radio>(
    action: ConsoleAction,
    session: &mut LinkSession<R>,
    aggregator: &Aggregator<TermPanel>,
    state: &ConsoleState,
    cancel: &CancellationToken,
) {
    let identity = *session.identity();
    let result = match action {
        ConsoleAction::ChannelUp => session.apply_operator(NodeIdentity {
            channel: Channel(identity.channel.0.wrapping_add(1)),
            ..identity
        }),
        ConsoleAction::ChannelDown => session.apply_operator(NodeIdentity {
            channel: Channel(identity.channel.0.wrapping_sub(1)),
            ..identity
        }),
        ConsoleAction::CyclePower => session.apply_operator(NodeIdentity {
            power: state.power,
            ..identity
        }),
        ConsoleAction::Push(command) => {
            let ping = console::build_push(identity.channel, state, command);
            info!(node = ping.target_id.0, command = ?command, "pushing configuration ping");
            session.send_ping(&ping)
        }
        ConsoleAction::Status => {
            for (id, status) in aggregator.statuses() {
                println!(
                    "node {}: {} readings, {} acks, alarm {:?}/{:?}, last seen {}",
                    id.0,
                    status.readings,
                    status.acks,
                    status.triage.alarm,
                    status.triage.danger,
                    status.seen_at
                );
            }
            Ok(())
        }
        ConsoleAction::Help => {
            println!("{}", console::HELP_TEXT);
            Ok(())
        }
        ConsoleAction::Quit => {
            cancel.cancel();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(error = %e, "console action failed");
    }
}
