//! LZ-BRIDGER: sequential swap-and-bridge runner for LayerZero OFT bridges.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod chain;
pub mod config;
pub mod engine;
pub mod keys;
pub mod random;
pub mod strategy;
pub mod types;
