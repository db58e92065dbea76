//! Alloy-backed EVM implementation of the chain collaborators.
//!
//! One `EvmChain` is created at startup and shared by reference for the whole
//! run. Oracle queries go through `eth_call`; submissions are signed locally
//! with the account's key and broadcast as raw EIP-1559 envelopes.

use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::network::TxSigner;
use alloy::primitives::aliases::{U160, U24};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use super::contracts::{IOFT, IQuoter, ISwappableBridge};
use super::{BridgeOracles, TransactionSubmitter};
use crate::config::ContractAddresses;
use crate::types::{BridgeError, BridgeRequest, FeeQuote, SubmissionReceipt};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Provider handle plus the contract addresses it talks to.
#[derive(Clone)]
pub struct EvmChain {
    provider: DynProvider,
    contracts: ContractAddresses,
    poll_interval: Duration,
    receipt_timeout: Duration,
}

impl EvmChain {
    /// Connect an HTTP provider to `rpc_url`.
    pub fn connect(rpc_url: &str, contracts: ContractAddresses) -> Result<Self> {
        let url = rpc_url
            .parse()
            .with_context(|| format!("Invalid RPC URL: {rpc_url}"))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        info!(rpc_url, bridge = %contracts.bridge, "EVM provider ready");

        Ok(Self::with_provider(provider, contracts))
    }

    pub fn with_provider(provider: DynProvider, contracts: ContractAddresses) -> Self {
        Self {
            provider,
            contracts,
            poll_interval: DEFAULT_POLL_INTERVAL,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }

    /// Receipt polling cadence and the overall wait limit after broadcast.
    pub fn with_confirmation(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.receipt_timeout = timeout;
        self
    }

    /// Poll for the receipt of `tx_hash` until it is mined or the wait times out.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        let started = Instant::now();
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .context("Failed to fetch receipt")?;
            if let Some(receipt) = receipt {
                return Ok(receipt);
            }
            if started.elapsed() >= self.receipt_timeout {
                bail!(
                    "Timed out after {}s waiting for {tx_hash}",
                    self.receipt_timeout.as_secs()
                );
            }
            debug!(%tx_hash, "Not mined yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// The OFT expects the destination address as raw bytes, not ABI-padded.
pub fn recipient_bytes(recipient: Address) -> Bytes {
    Bytes::copy_from_slice(recipient.as_slice())
}

/// Map a mined receipt to the submission outcome; a failed status is a revert.
pub fn settle(receipt: &TransactionReceipt) -> Result<SubmissionReceipt, BridgeError> {
    if !receipt.status() {
        return Err(BridgeError::Reverted {
            tx_hash: receipt.transaction_hash,
        });
    }
    Ok(SubmissionReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}

/// ABI-encoded `swapAndBridge` calldata for a request.
pub fn encode_swap_and_bridge(request: &BridgeRequest) -> Bytes {
    ISwappableBridge::swapAndBridgeCall {
        amountIn: request.plan.input_amount,
        amountOutMin: request.plan.min_output_amount,
        dstChainId: request.dst_chain_id,
        to: request.recipient,
        refundAddress: request.refund_address,
        zroPaymentAddress: request.zro_payment_address,
        adapterParams: request.adapter_params.clone(),
    }
    .abi_encode()
    .into()
}

#[async_trait]
impl BridgeOracles for EvmChain {
    async fn pool_fee(&self) -> Result<u32> {
        let bridge = ISwappableBridge::new(self.contracts.bridge, self.provider.clone());
        let fee = bridge
            .poolFee()
            .call()
            .await
            .context("poolFee() call failed")?;
        Ok(fee.to::<u32>())
    }

    async fn quote_exact_input_single(&self, amount_in: U256, pool_fee: u32) -> Result<U256> {
        let quoter = IQuoter::new(self.contracts.quoter, self.provider.clone());
        let amount_out = quoter
            .quoteExactInputSingle(
                self.contracts.token_in,
                self.contracts.token_out,
                U24::from(pool_fee),
                amount_in,
                U160::ZERO,
            )
            .call()
            .await
            .context("quoteExactInputSingle() call failed")?;

        debug!(%amount_in, %amount_out, pool_fee, "Swap quoted");
        Ok(amount_out)
    }

    async fn estimate_send_fee(
        &self,
        dst_chain_id: u16,
        recipient: Address,
        amount: U256,
    ) -> Result<FeeQuote> {
        let oft = IOFT::new(self.contracts.oft, self.provider.clone());
        let fees = oft
            .estimateSendFee(
                dst_chain_id,
                recipient_bytes(recipient),
                amount,
                false,
                Bytes::new(),
            )
            .call()
            .await
            .context("estimateSendFee() call failed")?;

        debug!(native_fee = %fees.nativeFee, zro_fee = %fees.zroFee, "Messaging fee estimated");
        Ok(FeeQuote {
            native_fee: fees.nativeFee,
            zro_fee: fees.zroFee,
        })
    }
}

#[async_trait]
impl TransactionSubmitter for EvmChain {
    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        request: &BridgeRequest,
    ) -> Result<SubmissionReceipt> {
        let sender = signer.address();
        let to = self.contracts.bridge;
        let value = request.plan.total_value;
        let input = encode_swap_and_bridge(request);

        let gas_limit = self
            .provider
            .estimate_gas(
                TransactionRequest::default()
                    .from(sender)
                    .to(to)
                    .input(input.clone().into())
                    .value(value),
            )
            .await
            .context("Gas estimation failed")?;

        let nonce = self
            .provider
            .get_transaction_count(sender)
            .await
            .context("Failed to fetch nonce")?;
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .context("Failed to fetch chain id")?;
        let fees = self
            .provider
            .estimate_eip1559_fees()
            .await
            .context("Failed to fetch fee data")?;

        let mut tx = TxEip1559 {
            chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            to: to.into(),
            value,
            input,
            ..Default::default()
        };

        let signature = signer
            .sign_transaction(&mut tx)
            .await
            .context("Failed to sign transaction")?;
        let envelope = TxEnvelope::Eip1559(tx.into_signed(signature));

        let pending = self
            .provider
            .send_tx_envelope(envelope)
            .await
            .context("Failed to broadcast transaction")?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, nonce, gas_limit, "Transaction sent, waiting for confirmation");

        let receipt = self.wait_for_receipt(tx_hash).await?;
        Ok(settle(&receipt)?)
    }
}
