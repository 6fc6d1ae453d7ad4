//! Kredits Bot Server
//!
//! Creates kredits proposals for the assignees of closed GitHub issues

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kredits_bot::{Config, GitHubClient, KreditsApi, KreditsWorkflow, RewardTiers, WalletInfo};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kredits-bot")]
#[command(version)]
#[command(about = "Kredits Bot - Propose kredits for closed GitHub issues", long_about = None)]
struct Cli {
    /// Path to config.toml
    #[arg(short, long, env = "KREDITS_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Host to bind (overrides config)
    #[arg(long, env = "BOT_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "BOT_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting Kredits Bot");

    let config = Config::load_from(&cli.config)?;

    let wallet = match WalletInfo::load(&config.kredits.wallet_path) {
        Ok(wallet) => wallet,
        Err(e) => {
            error!("[kredits] Could not load wallet: {:#}", e);
            std::process::exit(1);
        }
    };
    info!("[kredits] Wallet address: {}", wallet.address());

    let kredits = match KreditsApi::new(&config.kredits, &config.ipfs) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            error!("[kredits] Could not set up kredits: {:#}", e);
            std::process::exit(1);
        }
    };
    info!(
        "[kredits] Using provider {} (network {})",
        config.kredits.provider_url, config.kredits.network_id
    );

    let github = match GitHubClient::new(config.github.api_url.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Could not set up GitHub client: {:#}", e);
            std::process::exit(1);
        }
    };

    let workflow = Arc::new(KreditsWorkflow::new(
        RewardTiers::from_config(&config.rewards),
        kredits.clone(),
        kredits,
        github,
    ));

    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);

    kredits_bot::server::run_server(&host, port, workflow).await?;

    Ok(())
}
