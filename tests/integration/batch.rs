use alloy::primitives::U256;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lz_bridger::config::{AppConfig, PacingConfig};
use lz_bridger::engine::{BatchSequencer, QuoteResolver, ResolverConfig};
use lz_bridger::keys::parse_keys;
use lz_bridger::random::{RandomSource, SeededRandom};
use lz_bridger::types::Account;

use crate::mock_chain::{Cycle, Event, Journal, MockChain, RecordingDelay};

const KEYS: &str = "
  0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80

0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d
   5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a  
";

fn build(chain: MockChain, journal: &Journal, rng: Box<dyn RandomSource>) -> BatchSequencer {
    let chain = Arc::new(chain);
    BatchSequencer::new(
        QuoteResolver::new(chain.clone(), ResolverConfig::default()),
        chain,
        Arc::new(RecordingDelay {
            journal: journal.clone(),
        }),
        rng,
        PacingConfig::default(),
    )
}

fn senders(accounts: &[Account]) -> Vec<alloy::primitives::Address> {
    accounts
        .iter()
        .map(|a| a.signer().unwrap().address())
        .collect()
}

#[tokio::test]
async fn test_full_batch_in_order_with_pauses_between() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let accounts = parse_keys(KEYS);
    assert_eq!(accounts.len(), 3);

    let chain = MockChain::new(journal.clone()).with_quote_ratio_bps(10_000);
    let rng = Cycle::new(&[0.00027481, 512.0]);
    let mut sequencer = build(chain, &journal, Box::new(rng));
    sequencer.run(&accounts).await.unwrap();

    let events = journal.lock().unwrap().clone();
    let expected_amount = U256::from(270_000_000_000_000u64);
    let addrs = senders(&accounts);

    // Pool fee is read once, before the first quote.
    assert_eq!(events.iter().filter(|e| **e == Event::PoolFee).count(), 1);
    assert_eq!(events[0], Event::PoolFee);

    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e {
            Event::PoolFee => "fee-tier",
            Event::Quote { .. } => "quote",
            Event::SendFee { .. } => "send-fee",
            Event::Submit { .. } => "submit",
            Event::Pause(_) => "pause",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "fee-tier", "quote", "send-fee", "submit", "pause", "quote", "send-fee", "submit",
            "pause", "quote", "send-fee", "submit",
        ]
    );

    let submits: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Submit { sender, request } => Some((*sender, request.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(submits.len(), 3);
    for ((sender, request), addr) in submits.iter().zip(&addrs) {
        assert_eq!(sender, addr);
        assert_eq!(request.recipient, *addr);
        assert_eq!(request.refund_address, *addr);
        assert_eq!(request.plan.input_amount, expected_amount);
        assert_eq!(
            request.plan.min_output_amount,
            U256::from(256_500_000_000_000u64)
        );
        assert_eq!(
            request.plan.total_value,
            U256::from(270_300_000_000_000u64)
        );
    }

    let pauses: Vec<Duration> = events
        .iter()
        .filter_map(|e| match e {
            Event::Pause(d) => Some(*d),
            _ => None,
        })
        .collect();
    assert_eq!(pauses, vec![Duration::from_secs(512); 2]);
}

#[tokio::test]
async fn test_failure_stops_remaining_accounts() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let accounts = parse_keys(KEYS);

    let chain = MockChain::new(journal.clone()).failing_submit_at(1);
    let mut sequencer = build(chain, &journal, Box::new(Cycle::new(&[0.0003, 450.0])));

    let err = sequencer.run(&accounts).await.unwrap_err();
    assert!(err.to_string().contains("insufficient funds"));

    let events = journal.lock().unwrap().clone();
    let submits = events
        .iter()
        .filter(|e| matches!(e, Event::Submit { .. }))
        .count();
    let pauses = events
        .iter()
        .filter(|e| matches!(e, Event::Pause(_)))
        .count();
    let quotes = events
        .iter()
        .filter(|e| matches!(e, Event::Quote { .. }))
        .count();
    assert_eq!(submits, 1);
    assert_eq!(pauses, 1);
    // Third account is never even quoted.
    assert_eq!(quotes, 2);
}

#[tokio::test]
async fn test_seeded_run_respects_ranges() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let accounts = parse_keys(KEYS);

    let chain = MockChain::new(journal.clone());
    let mut sequencer = build(chain, &journal, Box::new(SeededRandom::seeded(99)));
    sequencer.run(&accounts).await.unwrap();

    let cfg = AppConfig::default();
    let min = U256::from(200_000_000_000_000u64);
    let max = U256::from(330_000_000_000_000u64);
    let step = U256::from(10_000_000_000_000u64);

    for event in journal.lock().unwrap().iter() {
        match event {
            Event::Submit { request, .. } => {
                let amount = request.plan.input_amount;
                assert!(amount >= min && amount <= max, "{amount} out of range");
                assert_eq!(amount % step, U256::ZERO, "{amount} keeps noise");
                assert!(request.plan.min_output_amount <= amount);
                assert!(request.plan.total_value >= amount);
            }
            Event::Pause(d) => {
                assert!(*d >= cfg.pacing.min() && *d < cfg.pacing.max());
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_dry_run_resolves_every_account() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let accounts = parse_keys(KEYS);

    let chain = MockChain::new(journal.clone());
    let mut sequencer =
        build(chain, &journal, Box::new(Cycle::new(&[0.0003]))).with_dry_run(true);
    tokio_test::assert_ok!(sequencer.run(&accounts).await);

    let events = journal.lock().unwrap().clone();
    assert_eq!(
        events.iter().filter(|e| matches!(e, Event::SendFee { .. })).count(),
        3
    );
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::Submit { .. } | Event::Pause(_))));
}
