//! Swap amount selection.
//!
//! The input amount is drawn uniformly from a configured range, rounded to a
//! fixed number of decimal places and converted to the token's smallest unit.

use alloy::primitives::U256;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::random::RandomSource;
use crate::types::BridgeError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Amount range and rounding.
#[derive(Debug, Clone)]
pub struct AmountPolicy {
    /// Inclusive lower bound, in whole tokens.
    pub min: f64,
    /// Exclusive upper bound, in whole tokens.
    pub max: f64,
    /// Fractional digits kept after rounding.
    pub precision: u32,
    /// Token decimals used for the smallest-unit conversion.
    pub decimals: u32,
}

impl Default for AmountPolicy {
    fn default() -> Self {
        Self {
            min: 0.0002,
            max: 0.00033,
            precision: 5,
            decimals: 18,
        }
    }
}

/// A drawn amount at each stage of the conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnAmount {
    pub raw: f64,
    pub rounded: Decimal,
    pub units: U256,
}

impl AmountPolicy {
    /// Draw, round and convert one swap amount.
    pub fn draw(&self, rng: &mut dyn RandomSource) -> Result<DrawnAmount, BridgeError> {
        let raw = rng.uniform(self.min, self.max);
        let rounded = round_amount(raw, self.precision)?;
        let units = to_smallest_unit(rounded, self.decimals)?;

        debug!(raw, rounded = %rounded, units = %units, "Swap amount drawn");

        Ok(DrawnAmount {
            raw,
            rounded,
            units,
        })
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Round half away from zero to `precision` fractional digits.
///
/// Fails when the value is not finite or rounds to zero or below.
pub fn round_amount(value: f64, precision: u32) -> Result<Decimal, BridgeError> {
    let decimal = Decimal::from_f64(value).ok_or_else(|| {
        BridgeError::AmountOutOfRange(format!("{value} is not representable as a decimal"))
    })?;

    let rounded = decimal
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    if rounded <= Decimal::ZERO {
        return Err(BridgeError::AmountOutOfRange(format!(
            "{value} rounds to {rounded} at {precision} decimal places"
        )));
    }

    Ok(rounded)
}

/// Convert a positive decimal token quantity into integer smallest units.
pub fn to_smallest_unit(amount: Decimal, decimals: u32) -> Result<U256, BridgeError> {
    if amount <= Decimal::ZERO {
        return Err(BridgeError::AmountOutOfRange(format!(
            "{amount} is not a positive amount"
        )));
    }

    let scale = amount.scale();
    if scale > decimals {
        return Err(BridgeError::AmountOutOfRange(format!(
            "{amount} has more than {decimals} fractional digits"
        )));
    }

    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    U256::from(10u64)
        .checked_pow(U256::from(decimals - scale))
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| {
            BridgeError::AmountOutOfRange(format!(
                "{amount} with {decimals} decimals does not fit in 256 bits"
            ))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
