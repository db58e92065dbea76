//! LZ-BRIDGER entry point.
//!
//! Loads configuration and the key file, initialises structured logging,
//! connects the RPC provider once, and runs the swap-and-bridge batch.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use lz_bridger::chain::evm::EvmChain;
use lz_bridger::config::AppConfig;
use lz_bridger::engine::{BatchSequencer, ExplorerLinks, QuoteResolver, ResolverConfig, TokioDelay};
use lz_bridger::keys;
use lz_bridger::random::SeededRandom;

const BANNER: &str = r#"
 _     _____     ____  ____  ___ ____   ____ _____ ____
| |   |__  /    | __ )|  _ \|_ _|  _ \ / ___| ____|  _ \
| |     / /_____|  _ \| |_) || || | | | |  _|  _| | |_) |
| |___ / /|_____| |_) |  _ < | || |_| | |_| | |___|  _ <
|_____/____|    |____/|_| \_\___|____/ \____|_____|_| \_\

  Swap → LayerZero OFT bridge, one wallet at a time
"#;

const CONFIG_FILE: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();
    println!("{BANNER}");

    let cfg = AppConfig::load_or_default(CONFIG_FILE)?;
    cfg.validate()?;
    let contracts = cfg.contracts.addresses()?;

    info!(
        min_amount = cfg.swap.min_amount,
        max_amount = cfg.swap.max_amount,
        precision = cfg.swap.precision,
        slippage_pct = cfg.swap.slippage_pct,
        dst_chain_id = cfg.swap.dst_chain_id,
        dry_run = cfg.run.dry_run,
        "LZ-BRIDGER starting up"
    );

    // Every key is checked before the first account is touched.
    let accounts = keys::load_accounts(&cfg.run.keys_file)?;

    let chain = Arc::new(
        EvmChain::connect(&cfg.rpc_url(), contracts)?.with_confirmation(
            cfg.network.receipt_poll_interval(),
            cfg.network.receipt_timeout(),
        ),
    );

    let resolver = QuoteResolver::new(chain.clone(), ResolverConfig::from(&cfg.swap));
    let mut sequencer = BatchSequencer::new(
        resolver,
        chain,
        Arc::new(TokioDelay),
        Box::new(SeededRandom::from_entropy()),
        cfg.pacing.clone(),
    )
    .with_links(ExplorerLinks::from(&cfg.network))
    .with_dry_run(cfg.run.dry_run);

    if let Err(e) = sequencer.run(&accounts).await {
        error!(error = %e, "Batch aborted");
        return Err(e);
    }

    info!(accounts = accounts.len(), "LZ-BRIDGER finished.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lz_bridger=info"));

    if std::env::var("LZ_BRIDGER_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
