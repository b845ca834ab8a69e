use anyhow::Result;
use clap::Parser;
use kindcoin_rust::chainparams::registry;
use kindcoin_rust::config::DeploymentOverride;
use kindcoin_rust::{Config, Network, NetworkRegistry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kindcoind", about = "Kindcoin node startup")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Network to run on: main, test or regtest
    #[arg(long)]
    chain: Option<Network>,

    /// Regtest deployment override, name:start:timeout
    #[arg(long = "vbparams")]
    vbparams: Vec<DeploymentOverride>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(chain) = args.chain {
        config.network = chain;
    }
    config.deployment_overrides.extend(args.vbparams);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting Kindcoin node...");
    info!("Loaded configuration for network: {}", config.network);

    // Every genesis block is checked here; a mismatch aborts startup
    let mut registry = NetworkRegistry::new()?;
    registry.select_network(config.network);
    registry.apply_overrides(&config.deployment_overrides)?;
    let registry = registry::install(registry)?;

    let params = registry.current()?;
    info!(
        "Network {} on port {}, magic {}",
        params.network_id(),
        params.default_port,
        hex::encode(params.message_start)
    );
    info!("Genesis block {}", params.genesis_hash());
    info!(
        "Dev fund {} pays to {}",
        params.devfund_address()?,
        params.devfund_payout_script()?
    );

    Ok(())
}
