//! suiclub demo
//!
//! Runs the scripted scenario against a Sui network:
//! - optional faucet funding for both accounts
//! - publish (or reuse) the socialcoin package
//! - issue / buy / sell shares, then query profiles and prices
//! - post encoded club messages, read them back, delete one

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use suiclub_core::error::Result;
use suiclub_demo::{chain::Chain, config, scenario};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "scenario failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("SUICLUB_CONFIG").unwrap_or_else(|_| config::DEFAULT_PATH.into());
    let cfg = config::load_from_file(&path)?;
    tracing::info!(%path, rpc = %cfg.network.rpc_url, "config loaded");

    let chain = Chain::from_config(&cfg)?;
    let report = scenario::run(&cfg, &chain).await?;
    tracing::info!(
        package = %report.meta.package_id,
        supply = report.admin_profile.supply,
        messages = report.club.message_count,
        "done"
    );
    Ok(())
}
