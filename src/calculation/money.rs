//! Rounding and input clamping shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Rounds a money amount to whole Rand, halves away from zero.
pub fn round_rand(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage to two decimal places, halves away from zero.
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a negative input to zero, logging the correction.
pub(crate) fn non_negative(field: &str, value: Decimal) -> Decimal {
    if value.is_sign_negative() && !value.is_zero() {
        warn!(field, value = %value, "Negative amount clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}

/// Divides `part` by a positive `whole`, saturating at [`Decimal::MAX`] when
/// the quotient is too large to represent.
pub(crate) fn saturating_ratio(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_rand_rounds_half_up() {
        assert_eq!(round_rand(dec("69797.25")), dec("69797"));
        assert_eq!(round_rand(dec("100.5")), dec("101"));
        assert_eq!(round_rand(dec("2125.44")), dec("2125"));
    }

    #[test]
    fn test_round_rate_keeps_two_places() {
        assert_eq!(round_rate(dec("14.5411")), dec("14.54"));
        assert_eq!(round_rate(dec("0.125")), dec("0.13"));
    }

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(non_negative("gross_income", dec("-1")), Decimal::ZERO);
        assert_eq!(non_negative("gross_income", dec("0")), Decimal::ZERO);
        assert_eq!(non_negative("gross_income", dec("12.5")), dec("12.5"));
    }

    #[test]
    fn test_saturating_ratio() {
        assert_eq!(saturating_ratio(dec("150"), dec("600")), dec("0.25"));
        assert_eq!(saturating_ratio(Decimal::MAX, dec("0.01")), Decimal::MAX);
        assert_eq!(saturating_ratio(Decimal::ZERO, dec("0.01")), Decimal::ZERO);
    }
}
