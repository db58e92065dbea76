//! Core engine: per-account quote resolution and the sequential batch loop.

pub mod resolver;
pub mod sequencer;

pub use resolver::{QuoteResolver, ResolverConfig};
pub use sequencer::{BatchSequencer, Delay, ExplorerLinks, TokioDelay};
