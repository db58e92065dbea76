//! End-to-end batch tests against an in-memory chain.

mod batch;
mod mock_chain;
