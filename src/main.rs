//! Apiary - HTTP facade over third-party services
//!
#![doc = "Apiary - HTTP facade over third-party services"]
#![doc = "Main entry point for the Apiary server and CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use apiary::cli::{Cli, Commands};
use apiary::commands;
use apiary::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting server mode");
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Ask { question, session } => {
            if let Some(s) = &session {
                tracing::debug!("Continuing session: {}", s);
            }
            commands::ask::run_ask(config, question, session).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins; otherwise `apiary=info`, or `apiary=debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "apiary=debug" } else { "apiary=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
