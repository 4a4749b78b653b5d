//! # Star Registry Node
//!
//! Serves the star ledger over a JSON-lines protocol on stdin/stdout.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Install logging (stderr)
//! 3. Bootstrap the ledger with its genesis block
//! 4. Answer one response line per request line until EOF or Ctrl-C

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use node_runtime::{init_logging, serve, NodeConfig};
use sr_star_ledger::{StarRegistryApi, WalletStarRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("failed to load configuration")?;
    init_logging(&config.logging)?;

    let ledger = Arc::new(
        WalletStarRegistry::with_wallet_verifier(config.ledger)
            .context("failed to bootstrap ledger")?,
    );

    let ledger_config = ledger.config();
    info!("===========================================");
    info!("  Star Registry Node v{}", env!("CARGO_PKG_VERSION"));
    info!("  Challenge window: {}s", ledger_config.challenge_window_secs);
    info!("  Protocol tag: {}", ledger_config.protocol_tag);
    info!("  Signature scheme: {}", ledger_config.signature_scheme);
    info!("===========================================");
    info!(height = ledger.get_height(), "[sr-node] ready, reading requests from stdin");

    tokio::select! {
        served = serve(Arc::clone(&ledger), tokio::io::stdin(), tokio::io::stdout()) => {
            served?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            info!("[sr-node] interrupted");
        }
    }

    info!("[sr-node] shutting down");
    Ok(())
}
