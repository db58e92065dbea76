//! Mock chain for integration testing.
//!
//! Implements both the oracle and the submission seams in memory. Every call
//! is appended to a shared journal so tests can assert on exact ordering.

use alloy::primitives::{Address, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lz_bridger::chain::{BridgeOracles, TransactionSubmitter};
use lz_bridger::engine::Delay;
use lz_bridger::random::RandomSource;
use lz_bridger::types::{BridgeRequest, FeeQuote, SubmissionReceipt};

/// One observed interaction, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PoolFee,
    Quote { amount_in: U256, pool_fee: u32 },
    SendFee { recipient: Address, amount: U256 },
    Submit { sender: Address, request: BridgeRequest },
    Pause(Duration),
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

/// A deterministic in-memory chain.
///
/// Quotes return `amount_in * quote_ratio_bps / 10_000`; the messaging fee is
/// fixed. Submissions can be made to fail from the N-th call on.
pub struct MockChain {
    journal: Journal,
    pool_fee: u32,
    quote_ratio_bps: u64,
    native_fee: U256,
    fail_submit_at: Option<usize>,
    submits: Mutex<usize>,
}

impl MockChain {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            pool_fee: 3000,
            quote_ratio_bps: 10_000,
            native_fee: U256::from(100_000_000_000u64),
            fail_submit_at: None,
            submits: Mutex::new(0),
        }
    }

    pub fn with_quote_ratio_bps(mut self, bps: u64) -> Self {
        self.quote_ratio_bps = bps;
        self
    }

    /// Fail the `n`-th submission (0-based) and any after it.
    pub fn failing_submit_at(mut self, n: usize) -> Self {
        self.fail_submit_at = Some(n);
        self
    }

    fn record(&self, event: Event) {
        self.journal.lock().unwrap().push(event);
    }
}

#[async_trait]
impl BridgeOracles for MockChain {
    async fn pool_fee(&self) -> Result<u32> {
        self.record(Event::PoolFee);
        Ok(self.pool_fee)
    }

    async fn quote_exact_input_single(&self, amount_in: U256, pool_fee: u32) -> Result<U256> {
        self.record(Event::Quote {
            amount_in,
            pool_fee,
        });
        Ok(amount_in * U256::from(self.quote_ratio_bps) / U256::from(10_000u64))
    }

    async fn estimate_send_fee(
        &self,
        _dst_chain_id: u16,
        recipient: Address,
        amount: U256,
    ) -> Result<FeeQuote> {
        self.record(Event::SendFee { recipient, amount });
        Ok(FeeQuote {
            native_fee: self.native_fee,
            zro_fee: U256::ZERO,
        })
    }
}

#[async_trait]
impl TransactionSubmitter for MockChain {
    async fn submit(
        &self,
        signer: &PrivateKeySigner,
        request: &BridgeRequest,
    ) -> Result<SubmissionReceipt> {
        let n = {
            let mut submits = self.submits.lock().unwrap();
            let n = *submits;
            *submits += 1;
            n
        };
        if self.fail_submit_at.is_some_and(|at| n >= at) {
            return Err(anyhow!("insufficient funds for gas * price + value"));
        }

        self.record(Event::Submit {
            sender: signer.address(),
            request: request.clone(),
        });
        Ok(SubmissionReceipt {
            tx_hash: B256::with_last_byte(n as u8 + 1),
            block_number: Some(100 + n as u64),
            gas_used: 250_000,
        })
    }
}

/// Records pauses in the journal instead of sleeping.
pub struct RecordingDelay {
    pub journal: Journal,
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn pause(&self, duration: Duration) {
        self.journal.lock().unwrap().push(Event::Pause(duration));
    }
}

/// Cycles through a fixed list of draws.
pub struct Cycle {
    values: Vec<f64>,
    next: usize,
}

impl Cycle {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for Cycle {
    fn uniform(&mut self, _low: f64, _high: f64) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
