//! Quote & fee resolution.
//!
//! Turns a sender address into a complete, fee-inclusive `BridgeRequest`:
//! random amount → swap quote → slippage floor → messaging fee → total value.

use alloy::primitives::Address;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::chain::BridgeOracles;
use crate::config::SwapConfig;
use crate::random::RandomSource;
use crate::strategy::{self, AmountPolicy};
use crate::types::{BridgeRequest, SwapPlan};

/// Resolver settings, taken from `[swap]`.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub amount: AmountPolicy,
    pub slippage_pct: u64,
    pub fee_multiplier: u64,
    pub dst_chain_id: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from(&SwapConfig::default())
    }
}

impl From<&SwapConfig> for ResolverConfig {
    fn from(swap: &SwapConfig) -> Self {
        Self {
            amount: swap.amount_policy(),
            slippage_pct: swap.slippage_pct,
            fee_multiplier: swap.fee_multiplier,
            dst_chain_id: swap.dst_chain_id,
        }
    }
}

pub struct QuoteResolver {
    oracles: Arc<dyn BridgeOracles>,
    config: ResolverConfig,
    /// Bridge pool fee, read on first use and reused for the rest of the run.
    pool_fee: OnceCell<u32>,
}

impl QuoteResolver {
    pub fn new(oracles: Arc<dyn BridgeOracles>, config: ResolverConfig) -> Self {
        Self {
            oracles,
            config,
            pool_fee: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Build the swap-and-bridge request for `sender`.
    ///
    /// Oracle failures are returned as-is; nothing is retried or defaulted.
    pub async fn resolve(
        &self,
        sender: Address,
        rng: &mut dyn RandomSource,
    ) -> Result<BridgeRequest> {
        let drawn = self.config.amount.draw(rng)?;
        let input_amount = drawn.units;

        let pool_fee = *self
            .pool_fee
            .get_or_try_init(|| self.oracles.pool_fee())
            .await?;

        let quoted = self
            .oracles
            .quote_exact_input_single(input_amount, pool_fee)
            .await?;
        let min_output_amount = strategy::min_output(quoted, self.config.slippage_pct);

        // Only the native component of the fee quote is paid.
        let fee = self
            .oracles
            .estimate_send_fee(self.config.dst_chain_id, sender, input_amount)
            .await?;
        let total_value =
            strategy::total_value(input_amount, fee.native_fee, self.config.fee_multiplier);

        let plan = SwapPlan {
            input_amount,
            min_output_amount,
            total_value,
        };

        debug!(
            %sender,
            amount = %drawn.rounded,
            %quoted,
            native_fee = %fee.native_fee,
            plan = %plan,
            "Swap plan resolved"
        );

        Ok(BridgeRequest::to_self(
            sender,
            self.config.dst_chain_id,
            plan,
            fee,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
