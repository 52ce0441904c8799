//! UIF contribution calculation.

use rust_decimal::Decimal;

use crate::config::TaxYearConfig;

use super::money::{non_negative, round_rand};

/// Calculates the employee's annual UIF contribution.
///
/// The contribution is the configured rate (1%) of gross remuneration,
/// capped at twelve times the monthly ceiling, rounded to whole Rand.
///
/// # Examples
///
/// ```
/// use sa_tax_engine::calculation::calculate_uif;
/// use sa_tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// assert_eq!(calculate_uif(Decimal::from(120_000), loader.latest()), Decimal::from(1_200));
/// assert_eq!(calculate_uif(Decimal::from(5_000_000), loader.latest()), Decimal::from(2_125));
/// ```
pub fn calculate_uif(gross_income: Decimal, config: &TaxYearConfig) -> Decimal {
    let gross_income = non_negative("gross_income", gross_income);
    let uncapped = gross_income * config.uif.rate;
    round_rand(uncapped.min(config.uif.annual_cap()))
}

/// The highest UIF contribution that is plausible for `gross_income`,
/// before any tolerance, at full precision.
pub(crate) fn expected_uif_ceiling(gross_income: Decimal, config: &TaxYearConfig) -> Decimal {
    (gross_income * config.uif.rate).min(config.uif.annual_cap())
}
