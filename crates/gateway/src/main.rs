//! LNAC gateway binary.

use anyhow::Result;
use clap::Parser;
use lnac_gateway::logging::init_logging;
use lnac_gateway::{start_server, AppState, Settings, SettingsOverrides};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "lnac-gateway")]
#[command(about = "LNAC inference gateway")]
#[command(version)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: SettingsOverrides,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply(cli.overrides);
    settings.validate()?;

    init_logging(&settings)?;
    info!(
        "Starting LNAC gateway v{} (level policy: {}, data dir: {})",
        env!("CARGO_PKG_VERSION"),
        settings.level_policy,
        settings.data_dir.display()
    );

    let addr = settings.bind_address();
    start_server(AppState::from_settings(&settings), &addr).await
}
