//! Peer-group benchmarks by income band.
//!
//! The expected PAYE ratio is the average share of gross remuneration that
//! taxpayers in the same band have withheld as PAYE.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculation::saturating_ratio;

/// Gross remuneration band used to pick a peer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBand {
    /// Up to R300 000.
    UpTo300k,
    /// Above R300 000 up to R500 000.
    UpTo500k,
    /// Above R500 000 up to R750 000.
    UpTo750k,
    /// Above R750 000 up to R1 000 000.
    UpTo1m,
    /// Above R1 000 000.
    Above1m,
}

impl IncomeBand {
    /// Places a gross remuneration figure in its band.
    pub fn for_gross(gross_remuneration: Decimal) -> Self {
        if gross_remuneration <= dec!(300000) {
            Self::UpTo300k
        } else if gross_remuneration <= dec!(500000) {
            Self::UpTo500k
        } else if gross_remuneration <= dec!(750000) {
            Self::UpTo750k
        } else if gross_remuneration <= dec!(1000000) {
            Self::UpTo1m
        } else {
            Self::Above1m
        }
    }

    /// Average PAYE withheld as a fraction of gross for this band.
    pub fn expected_paye_ratio(&self) -> Decimal {
        match self {
            Self::UpTo300k => dec!(0.10),
            Self::UpTo500k => dec!(0.18),
            Self::UpTo750k => dec!(0.24),
            Self::UpTo1m => dec!(0.29),
            Self::Above1m => dec!(0.35),
        }
    }
}

/// Actual PAYE ratio divided by the band's expected ratio.
///
/// Returns `None` when gross remuneration is zero. Ratios too large to
/// represent saturate at [`Decimal::MAX`].
pub fn paye_ratio_to_expected(gross_remuneration: Decimal, paye_withheld: Decimal) -> Option<Decimal> {
    if gross_remuneration <= Decimal::ZERO {
        return None;
    }
    let expected = IncomeBand::for_gross(gross_remuneration).expected_paye_ratio();
    Some(saturating_ratio(
        saturating_ratio(paye_withheld, gross_remuneration),
        expected,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_inclusive() {
        assert_eq!(IncomeBand::for_gross(dec!(0)), IncomeBand::UpTo300k);
        assert_eq!(IncomeBand::for_gross(dec!(300000)), IncomeBand::UpTo300k);
        assert_eq!(IncomeBand::for_gross(dec!(300001)), IncomeBand::UpTo500k);
        assert_eq!(IncomeBand::for_gross(dec!(500000)), IncomeBand::UpTo500k);
        assert_eq!(IncomeBand::for_gross(dec!(750000)), IncomeBand::UpTo750k);
        assert_eq!(IncomeBand::for_gross(dec!(1000000)), IncomeBand::UpTo1m);
        assert_eq!(IncomeBand::for_gross(dec!(1000001)), IncomeBand::Above1m);
    }

    #[test]
    fn test_expected_ratios_increase_with_income() {
        let bands = [
            IncomeBand::UpTo300k,
            IncomeBand::UpTo500k,
            IncomeBand::UpTo750k,
            IncomeBand::UpTo1m,
            IncomeBand::Above1m,
        ];
        for pair in bands.windows(2) {
            assert!(pair[0].expected_paye_ratio() < pair[1].expected_paye_ratio());
        }
    }

    #[test]
    fn test_ratio_to_expected() {
        // 600k band expects 24%; 72k is 12%, half of expected
        assert_eq!(paye_ratio_to_expected(dec!(600000), dec!(72000)), Some(dec!(0.5)));
        assert_eq!(paye_ratio_to_expected(dec!(0), dec!(1000)), None);
    }
}
