use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agency_ops::cli::Cli;
use agency_ops::commands;
use agency_ops::config::OpsConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agency_ops=info,agency_db=info,agency_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let config = OpsConfig::from_env()?;
    tracing::debug!(
        month_policy = config.month_policy.as_str(),
        max_connections = config.max_connections,
        "Loaded ops configuration"
    );

    let code = commands::run(cli.command, &config).await?;
    std::process::exit(code);
}
