//! ADR closed-loop simulator
//!
//! Runs one simulated device against the LabSCim handler over a seeded
//! channel random walk and reports how the device was steered.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use labscim_adr::{AdrConfig, AdrHandler, LabScimHandler};
use labscim_adr_sim::device::{summarize, DeviceProfile, SimDevice};
use labscim_adr_sim::scenario::{ChannelScenario, ChannelScenarioConfig};

/// Drive a simulated device with the LabSCim ADR handler.
#[derive(Parser, Debug)]
#[command(name = "adr_sim", about = "LabSCim ADR closed-loop simulator")]
struct Cli {
    /// Scenario seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of uplinks to simulate.
    #[arg(long, default_value_t = 200)]
    uplinks: u32,

    /// Handler config (TOML). Defaults to the stock LabSCim settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Channel SNR (dB) at TX power index 0 at the start of the run.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    start_snr: f32,

    /// Lower bound of the channel SNR walk (dB).
    #[arg(long, default_value_t = -15.0, allow_hyphen_values = true)]
    min_snr: f32,

    /// Upper bound of the channel SNR walk (dB).
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    max_snr: f32,

    /// Random loss per transmitted copy (%).
    #[arg(long, default_value_t = 5.0)]
    loss_percent: f32,

    /// Installation margin (dB).
    #[arg(long, default_value_t = 10.0)]
    installation_margin: f32,

    /// Emit one JSON line per uplink followed by a JSON summary.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            AdrConfig::from_toml_str(&raw).with_context(|| format!("loading {}", path.display()))?
        }
        None => AdrConfig::default(),
    };
    anyhow::ensure!(cli.min_snr <= cli.max_snr, "--min-snr must not exceed --max-snr");

    let handler = LabScimHandler::new(config);
    tracing::info!(
        handler = handler.id(),
        seed = cli.seed,
        uplinks = cli.uplinks,
        "adr_sim starting"
    );

    let mut scenario = ChannelScenario::new(ChannelScenarioConfig {
        seed: cli.seed,
        uplinks: cli.uplinks,
        start_snr_db: cli.start_snr,
        min_snr_db: cli.min_snr,
        max_snr_db: cli.max_snr,
        loss_percent: cli.loss_percent,
        ..Default::default()
    });
    let frames = scenario.frames();

    let mut device = SimDevice::new(
        handler,
        DeviceProfile {
            installation_margin: cli.installation_margin,
            ..Default::default()
        },
    );
    let outcomes = device.run(&frames);
    let summary = summarize(&outcomes);

    if cli.json {
        for outcome in &outcomes {
            println!("{}", serde_json::to_string(outcome)?);
        }
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "uplinks={} delivered={} ratio={:.3} transmissions={} mean_dr={:.2} final={:?}",
            summary.uplinks,
            summary.delivered,
            summary.delivery_ratio,
            summary.transmissions,
            summary.mean_dr,
            summary.final_state,
        );
    }

    Ok(())
}
