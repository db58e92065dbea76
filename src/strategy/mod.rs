//! Amount and fee policy for a single swap-and-bridge.
//!
//! Pure arithmetic only; the resolver feeds it oracle results.

pub mod amount;
pub mod fees;

pub use amount::{AmountPolicy, DrawnAmount};
pub use fees::{min_output, total_value};
