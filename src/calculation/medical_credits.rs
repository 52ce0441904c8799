//! Medical scheme fees tax credit calculation (section 6A).
//!
//! The main member and the first dependent each earn the higher monthly
//! credit; every further dependent earns the lower one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::TaxYearConfig;

use super::money::round_rand;

/// Annual scheme contributions up to which a single member is assumed.
pub const SINGLE_MEMBER_CONTRIBUTION_CEILING: Decimal = dec!(18000);

/// Annual scheme contributions up to which one dependent is assumed.
pub const ONE_DEPENDENT_CONTRIBUTION_CEILING: Decimal = dec!(36000);

/// Calculates the medical scheme fees tax credit for a membership.
///
/// # Arguments
///
/// * `dependents` - Number of dependents on the scheme, excluding the main member
/// * `months` - Months of membership in the tax year (capped at 12)
/// * `config` - The tax year's credit rates
///
/// # Examples
///
/// ```
/// use sa_tax_engine::calculation::calculate_medical_tax_credits;
/// use sa_tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// // Main member plus one dependent for a full year: (347 + 347) x 12
/// let credits = calculate_medical_tax_credits(1, 12, loader.latest());
/// assert_eq!(credits, Decimal::from(8_328));
/// ```
pub fn calculate_medical_tax_credits(dependents: u32, months: u32, config: &TaxYearConfig) -> Decimal {
    let rates = &config.medical_credits;
    let mut monthly = rates.main_member;
    if dependents >= 1 {
        monthly += rates.first_dependent;
    }
    if dependents >= 2 {
        monthly += rates.additional_dependent * Decimal::from(dependents - 1);
    }
    round_rand(monthly * Decimal::from(months.min(12)))
}

/// Estimates the number of dependents from annual scheme contributions.
///
/// Certificates do not record family size, so the detector infers one of
/// three tiers: single member, one dependent, or two dependents.
pub fn estimate_dependents(medical_scheme: Decimal) -> u32 {
    if medical_scheme <= SINGLE_MEMBER_CONTRIBUTION_CEILING {
        0
    } else if medical_scheme <= ONE_DEPENDENT_CONTRIBUTION_CEILING {
        1
    } else {
        2
    }
}

/// Estimates the annual credit a taxpayer with these contributions would receive.
pub fn estimate_medical_tax_credits(medical_scheme: Decimal, config: &TaxYearConfig) -> Decimal {
    if medical_scheme <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    calculate_medical_tax_credits(estimate_dependents(medical_scheme), 12, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn load_config() -> TaxYearConfig {
        ConfigLoader::builtin().unwrap().latest().clone()
    }

    #[test]
    fn test_single_member_full_year() {
        assert_eq!(calculate_medical_tax_credits(0, 12, &load_config()), dec("4164"));
    }

    #[test]
    fn test_additional_dependents_use_lower_rate() {
        let config = load_config();
        // 347 + 347 + 234 = 928 a month
        assert_eq!(calculate_medical_tax_credits(2, 12, &config), dec("11136"));
        // 347 + 347 + 2 x 234 = 1162 a month
        assert_eq!(calculate_medical_tax_credits(3, 12, &config), dec("13944"));
    }

    #[test]
    fn test_partial_year_and_month_cap() {
        let config = load_config();
        assert_eq!(calculate_medical_tax_credits(0, 6, &config), dec("2082"));
        assert_eq!(calculate_medical_tax_credits(0, 15, &config), dec("4164"));
        assert_eq!(calculate_medical_tax_credits(1, 0, &config), Decimal::ZERO);
    }

    #[test]
    fn test_estimate_dependents_tiers() {
        assert_eq!(estimate_dependents(dec("5000")), 0);
        assert_eq!(estimate_dependents(dec("18000")), 0);
        assert_eq!(estimate_dependents(dec("24000")), 1);
        assert_eq!(estimate_dependents(dec("36000")), 1);
        assert_eq!(estimate_dependents(dec("48000")), 2);
    }

    #[test]
    fn test_estimate_credits_for_no_scheme_is_zero() {
        assert_eq!(estimate_medical_tax_credits(Decimal::ZERO, &load_config()), Decimal::ZERO);
    }

    #[test]
    fn test_estimate_credits_by_tier() {
        let config = load_config();
        assert_eq!(estimate_medical_tax_credits(dec("5000"), &config), dec("4164"));
        assert_eq!(estimate_medical_tax_credits(dec("24000"), &config), dec("8328"));
        assert_eq!(estimate_medical_tax_credits(dec("60000"), &config), dec("11136"));
    }
}
