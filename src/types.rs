//! Shared types for the bridger.
//!
//! These types form the data model passed between the resolver, the
//! sequencer and the chain collaborators. They carry no behaviour beyond
//! formatting and the account → signer conversion.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// One line of the key file: an opaque private key.
///
/// The key stays wrapped in a `SecretString` so it never ends up in logs or
/// `Debug` output. It is only exposed when converted into a signer.
#[derive(Debug)]
pub struct Account {
    key: SecretString,
}

impl Account {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::new(key.into()),
        }
    }

    /// The raw key text. Only for code that has to hand the key to a signer.
    pub fn expose_key(&self) -> &str {
        self.key.expose_secret()
    }

    /// Parse the key into a local signer (accepts keys with or without `0x`).
    pub fn signer(&self) -> Result<PrivateKeySigner, BridgeError> {
        self.expose_key()
            .parse::<PrivateKeySigner>()
            .map_err(|e| BridgeError::InvalidKey(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Quotes and plans
// ---------------------------------------------------------------------------

/// Result of a cross-chain messaging fee estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// Fee payable in the source chain's native currency.
    pub native_fee: U256,
    /// Fee payable in the messaging protocol's own token. Never used.
    pub zro_fee: U256,
}

/// Amounts for a single swap-and-bridge call, all in smallest units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPlan {
    pub input_amount: U256,
    pub min_output_amount: U256,
    /// Native value attached to the call: input + multiplied messaging fee.
    pub total_value: U256,
}

impl fmt::Display for SwapPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in={} minOut={} value={}",
            self.input_amount, self.min_output_amount, self.total_value
        )
    }
}

/// Everything the submitter needs to send `swapAndBridge` for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    pub plan: SwapPlan,
    pub fee: FeeQuote,
    pub dst_chain_id: u16,
    pub recipient: Address,
    pub refund_address: Address,
    pub zro_payment_address: Address,
    pub adapter_params: Bytes,
}

impl BridgeRequest {
    /// A request that refunds to and delivers to the sender itself, with no
    /// ZRO payment and default adapter params.
    pub fn to_self(sender: Address, dst_chain_id: u16, plan: SwapPlan, fee: FeeQuote) -> Self {
        Self {
            plan,
            fee,
            dst_chain_id,
            recipient: sender,
            refund_address: sender,
            zro_payment_address: Address::ZERO,
            adapter_params: Bytes::new(),
        }
    }
}

/// A mined, successful bridge transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl fmt::Display for SubmissionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block_number {
            Some(block) => write!(f, "{} (block {block}, gas {})", self.tx_hash, self.gas_used),
            None => write!(f, "{} (gas {})", self.tx_hash, self.gas_used),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the bridger.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Malformed key file at line {line}: {reason}")]
    InputFormat { line: usize, reason: String },

    #[error("Key file contains no keys: {0}")]
    EmptyKeyFile(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("Transaction reverted: {tx_hash}")]
    Reverted { tx_hash: B256 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
