// Maintainer tool: regenerate genesis constants after changing the genesis inputs
use anyhow::{Context, Result};
use bitcoin::{CompactTarget, ScriptBuf};
use clap::Parser;
use kindcoin_rust::chainparams::networks::{genesis_inputs, GenesisInputs};
use kindcoin_rust::genesis::{self, search, SearchControl, GENESIS_MESSAGE};
use kindcoin_rust::Network;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "kindcoin-genesis", about = "Search for a genesis nonce and print the constants")]
struct Args {
    /// Network whose genesis inputs to start from
    #[arg(long, default_value = "main")]
    chain: Network,

    /// Override the coinbase message
    #[arg(long)]
    message: Option<String>,

    /// Override the genesis timestamp
    #[arg(long)]
    time: Option<u32>,

    /// Override the compact target, in hex (e.g. 1e0fffff)
    #[arg(long)]
    bits: Option<String>,

    /// Pay the genesis output to the genesis public key instead of an empty script
    #[arg(long)]
    p2pk: bool,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Give up after this many hashes
    #[arg(long)]
    max_attempts: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Start from the raw inputs; the stored hashes may no longer match them
    let stored = genesis_inputs(args.chain);

    let bits = match &args.bits {
        Some(hex) => CompactTarget::from_consensus(
            u32::from_str_radix(hex.trim_start_matches("0x"), 16)
                .with_context(|| format!("invalid bits {}", hex))?,
        ),
        None => stored.bits,
    };
    let inputs = GenesisInputs {
        time: args.time.unwrap_or(stored.time),
        nonce: 0,
        bits,
        ..stored
    };
    let output_script = if args.p2pk {
        genesis::genesis_pubkey_script()?
    } else {
        ScriptBuf::new()
    };
    let message = args.message.as_deref().unwrap_or(GENESIS_MESSAGE);

    let draft = inputs
        .build(message.as_bytes(), output_script)
        .with_context(|| format!("{} genesis draft failed to build", args.chain))?;

    let mut control = SearchControl::new();
    if let Some(secs) = args.timeout {
        control = control.with_timeout(Duration::from_secs(secs));
    }
    if let Some(max) = args.max_attempts {
        control = control.with_max_attempts(max);
    }

    let cancel = control.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling search");
            cancel.cancel();
        }
    });

    info!("Calculating {} genesis block...", args.chain);
    let started = Instant::now();
    let search_draft = draft.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        search::search(search_draft.header.bits, &search_draft.header, &control)
    })
    .await??;

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        "Genesis block found after {} attempts ({:.2} H/s)",
        outcome.attempts,
        outcome.attempts as f64 / elapsed.max(f64::EPSILON)
    );

    println!("nonce: {}", outcome.nonce);
    println!("time: {}", outcome.time);
    println!("bits: 0x{:08x}", bits.to_consensus());
    println!("blockhash: {}", outcome.hash);
    println!("merklehash: {}", draft.merkle_root());

    Ok(())
}
