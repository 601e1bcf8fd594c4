use anyhow::Context;
use api_client::ApiClient;
use clap::Parser;
use playout_config::{init_logging, Config, LoggingMode};
use playout_notify::{Cli, Notifier, Outcome};
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LoggingMode::from_debug_flag(cli.debug)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let notifier = match build_notifier(&cli) {
        Ok(notifier) => notifier,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match notifier.run(&cli.invocation) {
        Outcome::Delivered(kind) => debug!(event = kind, "Notification delivered"),
        Outcome::Unrecognized => {}
        Outcome::Failed(kind) => debug!(event = kind, "Notification dropped"),
    }

    // Delivery failures never fail the engine's callback.
    ExitCode::SUCCESS
}

fn build_notifier(cli: &Cli) -> anyhow::Result<Notifier<ApiClient>> {
    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("Error loading config file {}", config_path.display()))?;

    let client = ApiClient::with_timeout(
        &config.general.public_url,
        config.general.api_key.clone(),
        config.api_timeout(),
    )
    .context("Failed to create API client")?;

    Ok(Notifier::new(client))
}
