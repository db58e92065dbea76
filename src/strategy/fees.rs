//! Slippage and fee arithmetic on smallest-unit quantities.

use alloy::primitives::U256;

const PERCENT: u64 = 100;

/// Minimum acceptable swap output: `quoted - quoted * slippage_pct / 100`.
///
/// The deduction is truncated by integer division. Never exceeds `quoted`.
pub fn min_output(quoted: U256, slippage_pct: u64) -> U256 {
    let pct = U256::from(slippage_pct.min(PERCENT));
    let hundred = U256::from(PERCENT);
    let deduction = match quoted.checked_mul(pct) {
        Some(scaled) => scaled / hundred,
        None => quoted / hundred * pct + quoted % hundred * pct / hundred,
    };
    quoted.saturating_sub(deduction)
}

/// Native value to attach: `input + native_fee * multiplier`.
///
/// The multiplier over-provisions the messaging fee; the excess is refunded on
/// the destination side.
pub fn total_value(input: U256, native_fee: U256, multiplier: u64) -> U256 {
    input.saturating_add(native_fee.saturating_mul(U256::from(multiplier)))
}
