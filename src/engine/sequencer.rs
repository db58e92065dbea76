//! Batch sequencing.
//!
//! Runs resolve → submit for every account strictly in input order, one at a
//! time, with a randomised pause between accounts. The first error stops the
//! batch; transactions already mined for earlier accounts stay on-chain.

use alloy::primitives::utils::{format_ether, format_units};
use alloy::primitives::U256;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::resolver::QuoteResolver;
use crate::chain::TransactionSubmitter;
use crate::config::{NetworkConfig, PacingConfig};
use crate::random::RandomSource;
use crate::types::{Account, BridgeRequest, SubmissionReceipt};

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Suspends the batch between accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Delay: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// `tokio::time::sleep`-backed delay.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Where links to a submitted transaction point.
#[derive(Debug, Clone, Default)]
pub struct ExplorerLinks {
    pub tx_url: String,
    pub message_url: String,
}

impl From<&NetworkConfig> for ExplorerLinks {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            tx_url: network.explorer_tx_url.clone(),
            message_url: network.message_tracker_url.clone(),
        }
    }
}

pub struct BatchSequencer {
    resolver: QuoteResolver,
    submitter: Arc<dyn TransactionSubmitter>,
    delay: Arc<dyn Delay>,
    rng: Box<dyn RandomSource>,
    pacing: PacingConfig,
    links: ExplorerLinks,
    dry_run: bool,
}

impl BatchSequencer {
    pub fn new(
        resolver: QuoteResolver,
        submitter: Arc<dyn TransactionSubmitter>,
        delay: Arc<dyn Delay>,
        rng: Box<dyn RandomSource>,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            resolver,
            submitter,
            delay,
            rng,
            pacing,
            links: ExplorerLinks::default(),
            dry_run: false,
        }
    }

    pub fn with_links(mut self, links: ExplorerLinks) -> Self {
        self.links = links;
        self
    }

    /// Resolve plans without submitting or pausing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every account in order. Returns on the first failure.
    pub async fn run(&mut self, accounts: &[Account]) -> Result<()> {
        let total = accounts.len();
        info!(accounts = total, dry_run = self.dry_run, "Starting batch");

        for (index, account) in accounts.iter().enumerate() {
            let is_last = index + 1 == total;

            self.process(index, total, account).await?;

            if !is_last && !self.dry_run {
                let pause = self.next_delay();
                info!(
                    delay_secs = pause.as_secs(),
                    next = index + 2,
                    "Pausing before next account"
                );
                self.delay.pause(pause).await;
            }
        }

        info!(accounts = total, "Batch complete");
        Ok(())
    }

    async fn process(&mut self, index: usize, total: usize, account: &Account) -> Result<()> {
        let signer = account.signer()?;
        let wallet = signer.address();
        info!(account = index + 1, of = total, %wallet, "Processing wallet");

        let request = self.resolver.resolve(wallet, self.rng.as_mut()).await?;
        self.log_plan(&request);

        if self.dry_run {
            info!(%wallet, "[DRY RUN] Skipping submission");
            return Ok(());
        }

        let receipt = self.submitter.submit(&signer, &request).await?;
        self.log_receipt(&receipt);
        Ok(())
    }

    /// Uniform draw from `[delay_min_secs, delay_max_secs)`.
    fn next_delay(&mut self) -> Duration {
        let secs = self.rng.uniform(
            self.pacing.min().as_secs_f64(),
            self.pacing.max().as_secs_f64(),
        );
        Duration::from_secs_f64(secs.max(0.0))
    }

    fn log_plan(&self, request: &BridgeRequest) {
        let decimals = self.resolver.config().amount.decimals;
        info!(
            swap_in = %format_token(request.plan.input_amount, decimals),
            min_out = %format_token(request.plan.min_output_amount, decimals),
            total_value = %format_ether(request.plan.total_value),
            native_fee = %format_ether(request.fee.native_fee),
            "Swap planned (total includes bridge and swap fees)"
        );
    }

    fn log_receipt(&self, receipt: &SubmissionReceipt) {
        info!(
            tx = %format!("{}{}", self.links.tx_url, receipt.tx_hash),
            message = %format!("{}{}", self.links.message_url, receipt.tx_hash),
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Bridge transaction confirmed"
        );
    }
}

fn format_token(amount: U256, decimals: u32) -> String {
    u8::try_from(decimals)
        .ok()
        .and_then(|d| format_units(amount, d).ok())
        .unwrap_or_else(|| {
            warn!(decimals, "Cannot format amount with these decimals");
            amount.to_string()
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
