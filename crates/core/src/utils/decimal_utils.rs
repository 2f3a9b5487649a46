use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::CENTS_DECIMAL_PLACES;

/// Rounds a monetary amount to cents, midpoint away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTS_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
