//! Chain collaborators.
//!
//! Defines the read-only oracle and transaction submission seams used by the
//! engine, plus the alloy-backed EVM implementation of both.

pub mod contracts;
pub mod evm;

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use async_trait::async_trait;

use crate::types::{BridgeRequest, FeeQuote, SubmissionReceipt};

/// Read-only price and fee queries.
///
/// Implementors surface RPC and contract-revert failures as errors; callers
/// do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BridgeOracles: Send + Sync {
    /// Fee tier of the pool the bridge swaps through.
    async fn pool_fee(&self) -> Result<u32>;

    /// Expected output of an exact-input single-hop swap.
    async fn quote_exact_input_single(&self, amount_in: U256, pool_fee: u32) -> Result<U256>;

    /// Messaging fee to deliver `amount` to `recipient` on `dst_chain_id`.
    async fn estimate_send_fee(
        &self,
        dst_chain_id: u16,
        recipient: Address,
        amount: U256,
    ) -> Result<FeeQuote>;
}

/// Signs, broadcasts and waits for a swap-and-bridge transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        request: &BridgeRequest,
    ) -> Result<SubmissionReceipt>;
}
