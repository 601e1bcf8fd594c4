use anyhow::{Context, Result};
use api_client::ApiClient;
use clap::Parser;
use liquidsoap_bootstrap::{BootstrapSettings, Bootstrapper, GeneratorSettings, StreamSettingsGenerator};
use playout_config::{init_logging, Config, LoggingMode};
use std::path::PathBuf;
use tracing::info;

/// Runs Liquidsoap with the control script matching its installed version
#[derive(Parser, Debug)]
#[command(name = "playout-liquidsoap")]
#[command(about = "Start Liquidsoap with the control script for its version")]
#[command(version)]
struct Args {
    /// Run in debug mode
    #[arg(short, long)]
    debug: bool,

    /// Configuration file (default: $PLAYOUT_CONFIG_PATH or /etc/airtime/airtime.yml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingMode::from_debug_flag(args.debug))
        .context("Failed to initialize logging")?;
    info!("Airtime Liquidsoap");

    let config_path = Config::resolve_path(args.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let settings = BootstrapSettings::from_config(&config.playout)
        .context("Failed to resolve bootstrap settings")?;
    let bootstrapper = Bootstrapper::new(settings);

    let client = ApiClient::with_timeout(
        &config.general.public_url,
        config.general.api_key.clone(),
        config.api_timeout(),
    )
    .context("Failed to create API client")?;
    let generator = StreamSettingsGenerator::new(client, GeneratorSettings::from(&config.playout));

    let never = bootstrapper
        .run(&generator, args.debug)
        .context("Engine bootstrap failed")?;
    match never {}
}
