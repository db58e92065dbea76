//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! field has a default matching the Arbitrum → Goerli ETH deployment, so a
//! missing file runs with the built-in values. The RPC endpoint may be
//! overridden by an env var named in the config.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::strategy::AmountPolicy;
use crate::types::BridgeError;

/// 10^77 is the largest power of ten that fits in a `U256`.
const MAX_TOKEN_DECIMALS: u32 = 77;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
    pub swap: SwapConfig,
    pub pacing: PacingConfig,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    /// Env var that, when set, replaces `rpc_url`.
    pub rpc_url_env: Option<String>,
    /// Source-chain explorer prefix; the tx hash is appended.
    pub explorer_tx_url: String,
    /// Cross-chain message tracker prefix; the tx hash is appended.
    pub message_tracker_url: String,
    /// Interval between receipt polls after broadcast.
    pub receipt_poll_secs: u64,
    /// Give up waiting for a receipt after this long.
    pub receipt_timeout_secs: u64,
}

impl NetworkConfig {
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_secs(self.receipt_poll_secs)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://arb1.arbitrum.io/rpc".to_string(),
            rpc_url_env: None,
            explorer_tx_url: "https://arbiscan.io/tx/".to_string(),
            message_tracker_url: "https://layerzeroscan.com/tx/".to_string(),
            receipt_poll_secs: 2,
            receipt_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ContractsConfig {
    pub bridge: String,
    pub quoter: String,
    pub oft: String,
    pub token_in: String,
    pub token_out: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            bridge: "0x0A9f824C05A74F577A536A8A0c673183a872Dff4".to_string(),
            quoter: "0xb27308f9F90D607463bb33eA1BeBb41C27CE5AB6".to_string(),
            oft: "0xdD69DB25F6D620A7baD3023c5d32761D353D3De9".to_string(),
            token_in: "0x82af49447d8a07e3bd95bd0d56f35241523fbab1".to_string(),
            token_out: "0xdd69db25f6d620a7bad3023c5d32761d353d3de9".to_string(),
        }
    }
}

/// Parsed contract addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub bridge: Address,
    pub quoter: Address,
    pub oft: Address,
    pub token_in: Address,
    pub token_out: Address,
}

impl ContractsConfig {
    pub fn addresses(&self) -> Result<ContractAddresses, BridgeError> {
        Ok(ContractAddresses {
            bridge: parse_address("bridge", &self.bridge)?,
            quoter: parse_address("quoter", &self.quoter)?,
            oft: parse_address("oft", &self.oft)?,
            token_in: parse_address("token_in", &self.token_in)?,
            token_out: parse_address("token_out", &self.token_out)?,
        })
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, BridgeError> {
    value
        .parse::<Address>()
        .map_err(|e| BridgeError::Config(format!("contracts.{field} = {value:?}: {e}")))
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SwapConfig {
    pub min_amount: f64,
    pub max_amount: f64,
    /// Fractional digits kept on the drawn amount.
    pub precision: u32,
    pub token_decimals: u32,
    pub slippage_pct: u64,
    /// Multiplier on the quoted messaging fee.
    pub fee_multiplier: u64,
    /// LayerZero chain id of the destination.
    pub dst_chain_id: u16,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            min_amount: 0.0002,
            max_amount: 0.00033,
            precision: 5,
            token_decimals: 18,
            slippage_pct: 5,
            fee_multiplier: 3,
            dst_chain_id: 154,
        }
    }
}

impl SwapConfig {
    pub fn amount_policy(&self) -> AmountPolicy {
        AmountPolicy {
            min: self.min_amount,
            max: self.max_amount,
            precision: self.precision,
            decimals: self.token_decimals,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PacingConfig {
    pub delay_min_secs: u64,
    pub delay_max_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            delay_min_secs: 400,
            delay_max_secs: 700,
        }
    }
}

impl PacingConfig {
    pub fn min(&self) -> Duration {
        Duration::from_secs(self.delay_min_secs)
    }

    pub fn max(&self) -> Duration {
        Duration::from_secs(self.delay_max_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunConfig {
    pub keys_file: String,
    /// Resolve and log plans without submitting anything.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            keys_file: "keys.txt".to_string(),
            dry_run: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using built-in defaults");
            Ok(Self::default())
        }
    }

    /// Reject configurations the resolver or sequencer cannot run with.
    pub fn validate(&self) -> Result<(), BridgeError> {
        let swap = &self.swap;
        if !swap.min_amount.is_finite() || swap.min_amount <= 0.0 {
            return Err(BridgeError::Config(format!(
                "swap.min_amount must be positive, got {}",
                swap.min_amount
            )));
        }
        if !swap.max_amount.is_finite() || swap.min_amount >= swap.max_amount {
            return Err(BridgeError::Config(format!(
                "swap.min_amount ({}) must be below swap.max_amount ({})",
                swap.min_amount, swap.max_amount
            )));
        }
        if swap.token_decimals > MAX_TOKEN_DECIMALS {
            return Err(BridgeError::Config(format!(
                "swap.token_decimals must be at most {MAX_TOKEN_DECIMALS}, got {}",
                swap.token_decimals
            )));
        }
        if swap.precision > swap.token_decimals {
            return Err(BridgeError::Config(format!(
                "swap.precision ({}) exceeds swap.token_decimals ({})",
                swap.precision, swap.token_decimals
            )));
        }
        if swap.slippage_pct > 100 {
            return Err(BridgeError::Config(format!(
                "swap.slippage_pct must be at most 100, got {}",
                swap.slippage_pct
            )));
        }
        if self.network.receipt_poll_secs == 0 {
            return Err(BridgeError::Config(
                "network.receipt_poll_secs must be positive".to_string(),
            ));
        }
        if self.pacing.delay_min_secs > self.pacing.delay_max_secs {
            return Err(BridgeError::Config(format!(
                "pacing.delay_min_secs ({}) exceeds pacing.delay_max_secs ({})",
                self.pacing.delay_min_secs, self.pacing.delay_max_secs
            )));
        }
        self.contracts.addresses()?;
        Ok(())
    }

    /// The RPC endpoint, taking the env override into account.
    pub fn rpc_url(&self) -> String {
        self.network
            .rpc_url_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.network.rpc_url.clone())
    }
}
