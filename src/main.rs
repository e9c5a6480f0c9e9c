//! Parking Flow - Entry Point
//!
//! Loads the run configuration, optionally connects to the power-management
//! peer, runs the simulation to its horizon and prints the outcome.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use parking_flow::core::config::{PeerConfig, SimulationConfig};
use parking_flow::core::error::{ParkError, Result};
use parking_flow::simulation::{SimulationDriver, SimulationOutput};
use parking_flow::sync::{NullChannel, PeerChannel, SyncChannel};

/// City parking simulation with neighbour dispersal
#[derive(Parser, Debug)]
#[command(name = "parking-flow")]
#[command(about = "Simulate vehicle flow across four parking zones")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Power-management peer as host:port
    #[arg(long)]
    peer: Option<String>,

    /// Real-time pause per tick when a peer is attached (ms)
    #[arg(long)]
    pace_ms: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the JSON output to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log every allocation and departure decision
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// How the run outcome is printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Full output as pretty JSON
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose { "parking_flow=debug" } else { "parking_flow=info" })
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;
    tracing::info!("Parking Flow starting (seed {}, {} ticks)", config.seed, config.tick_count()?);

    let output = match config.peer.clone() {
        Some(peer) => run(config, PeerChannel::connect(&peer)?)?,
        None => run(config, NullChannel)?,
    };

    match args.format {
        OutputFormat::Json => println!("{}", output.to_json()),
        OutputFormat::Text => println!("{}", output.summary()),
    }

    if let Some(path) = &args.output {
        std::fs::write(path, output.to_json())?;
        tracing::info!("Full output written to {}", path.display());
    }

    Ok(())
}

fn run<C: SyncChannel>(config: SimulationConfig, channel: C) -> Result<SimulationOutput> {
    let (output, _) = SimulationDriver::new(config, channel)?.run()?;
    Ok(output)
}

/// Config file first, then command-line overrides
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    if let Some(addr) = &args.peer {
        let (host, port) = addr
            .rsplit_once(':')
            .and_then(|(host, port)| Some((host, port.parse::<u16>().ok()?)))
            .ok_or_else(|| {
                ParkError::InvalidConfig(format!("peer address {:?} is not host:port", addr))
            })?;
        let peer = config.peer.get_or_insert_with(PeerConfig::default);
        peer.host = host.to_string();
        peer.port = port;
    }

    if let (Some(pace_ms), Some(peer)) = (args.pace_ms, config.peer.as_mut()) {
        peer.pace_ms = pace_ms;
    }

    config.validate()?;
    Ok(config)
}
