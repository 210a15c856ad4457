use crate::error::{LedgerError, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency scale: all monetary results carry exactly 2 decimal places.
const CURRENCY_SCALE: u32 = 2;

/// Quantizes a value to 2 decimal places using round-half-up (midpoint away
/// from zero). This is the single rounding point for the whole crate; every
/// other primitive rounds through here.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums two amounts, then rounds.
pub fn add_currency(a: Decimal, b: Decimal) -> Decimal {
    round_currency(a + b)
}

/// Multiplies a quantity (hours, sessions, units) by a monetary rate and
/// rounds the product exactly once. The rate must be non-negative.
pub fn multiply_currency(quantity: Decimal, rate: Decimal) -> Result<Decimal> {
    if rate < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "rate must be non-negative, got {rate}"
        )));
    }
    Ok(round_currency(quantity * rate))
}

/// Applies a percentage rate (0.10 for 10%) to an amount, rounding once.
///
/// Chained computations round per step: a bonus on top of a computed fee is
/// derived from the already-rounded fee, never from the raw product.
pub fn apply_percentage(amount: Decimal, rate: Decimal) -> Result<Decimal> {
    if rate < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "percentage rate must be non-negative, got {rate}"
        )));
    }
    Ok(round_currency(amount * rate))
}
