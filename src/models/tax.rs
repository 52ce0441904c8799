//! Income tax calculation models.
//!
//! This module contains the [`TaxCalculationInput`] consumed by the
//! calculator, the [`TaxCalculationResult`] it produces, and the
//! [`RefundDetermination`] derived from comparing the result to PAYE withheld.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditStep, Irp5Data};
use crate::config::TaxBracket;

/// Age assumed when the caller does not know the taxpayer's age.
pub const DEFAULT_AGE: u32 = 35;

/// Income and deduction figures for one taxpayer and one tax year.
///
/// All money values are annual Rand amounts. Negative values are clamped
/// to zero by the calculator.
///
/// # Example
///
/// ```
/// use sa_tax_engine::models::TaxCalculationInput;
/// use rust_decimal::Decimal;
///
/// let input = TaxCalculationInput {
///     gross_income: Decimal::from(480_000),
///     retirement_contrib: Decimal::from(48_000),
///     ..Default::default()
/// };
/// assert_eq!(input.age, 35);
/// assert_eq!(input.uif_contrib, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationInput {
    /// Gross remuneration for the year.
    pub gross_income: Decimal,
    /// Retirement fund contributions made by the taxpayer.
    pub retirement_contrib: Decimal,
    /// Medical scheme contributions. Never deducted; credits apply instead.
    pub medical_contrib: Decimal,
    /// Medical scheme fees tax credits to offset against tax.
    pub medical_credits: Decimal,
    /// UIF contributions.
    #[serde(default)]
    pub uif_contrib: Decimal,
    /// Age in whole years at the end of the tax year.
    #[serde(default = "default_age")]
    pub age: u32,
}

fn default_age() -> u32 {
    DEFAULT_AGE
}

impl Default for TaxCalculationInput {
    fn default() -> Self {
        Self {
            gross_income: Decimal::ZERO,
            retirement_contrib: Decimal::ZERO,
            medical_contrib: Decimal::ZERO,
            medical_credits: Decimal::ZERO,
            uif_contrib: Decimal::ZERO,
            age: DEFAULT_AGE,
        }
    }
}

impl TaxCalculationInput {
    /// Builds calculator input from an IRP5 record.
    pub fn from_irp5(data: &Irp5Data, age: u32) -> Self {
        Self {
            gross_income: data.gross_remuneration,
            retirement_contrib: data.retirement_fund,
            medical_contrib: data.medical_scheme,
            medical_credits: data.medical_credits,
            uif_contrib: data.uif_contrib,
            age,
        }
    }
}

/// The outcome of an income tax calculation.
///
/// Money values are rounded to whole Rand and rates (percentages) to two
/// decimal places. Rounding happens once, when the result is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Tax year label, formatted as `YYYY/YY`.
    pub tax_year: String,
    /// Retirement contribution actually deducted (after the cap).
    pub retirement_deduction: Decimal,
    /// Income subject to the bracket table.
    pub taxable_income: Decimal,
    /// Tax from the bracket table before rebates and credits.
    pub income_tax: Decimal,
    /// Sum of the age-based rebates that apply.
    pub primary_rebate: Decimal,
    /// Medical scheme fees tax credits applied.
    pub medical_tax_credits: Decimal,
    /// Final tax liability, never negative.
    pub total_tax: Decimal,
    /// Total tax as a percentage of gross income.
    pub effective_rate: Decimal,
    /// Rate of the highest bracket that contributed tax, as a percentage.
    pub marginal_rate: Decimal,
    /// The bracket table used.
    pub tax_brackets: Vec<TaxBracket>,
    /// Trace of each rule applied.
    pub steps: Vec<AuditStep>,
}

/// Whether PAYE withheld covers the calculated liability.
///
/// At most one of `refund_amount` and `amount_owed` is non-zero; both are
/// zero when PAYE exactly matches the liability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundDetermination {
    /// True when PAYE withheld exceeds the liability.
    pub is_refund: bool,
    /// Amount due back to the taxpayer.
    pub refund_amount: Decimal,
    /// Amount the taxpayer must still pay.
    pub amount_owed: Decimal,
    /// How far PAYE falls short of the liability.
    pub paye_shortfall: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_input_uses_default_age() {
        let input = TaxCalculationInput::default();
        assert_eq!(input.age, 35);
        assert_eq!(input.gross_income, Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_input_with_defaults() {
        let json = r#"{
            "gross_income": "100000",
            "retirement_contrib": "10000",
            "medical_contrib": "5000",
            "medical_credits": "4368"
        }"#;

        let input: TaxCalculationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.gross_income, dec("100000"));
        assert_eq!(input.uif_contrib, Decimal::ZERO);
        assert_eq!(input.age, 35);
    }

    #[test]
    fn test_from_irp5_maps_fields() {
        let data = Irp5Data {
            gross_remuneration: dec("480000"),
            paye_withheld: dec("70000"),
            uif_contrib: dec("2125"),
            retirement_fund: dec("48000"),
            medical_scheme: dec("24000"),
            travel_allowance: dec("12000"),
            medical_credits: dec("8736"),
            ..Default::default()
        };

        let input = TaxCalculationInput::from_irp5(&data, 67);
        assert_eq!(input.gross_income, dec("480000"));
        assert_eq!(input.retirement_contrib, dec("48000"));
        assert_eq!(input.medical_contrib, dec("24000"));
        assert_eq!(input.medical_credits, dec("8736"));
        assert_eq!(input.uif_contrib, dec("2125"));
        assert_eq!(input.age, 67);
    }

    #[test]
    fn test_refund_determination_serialization() {
        let refund = RefundDetermination {
            is_refund: true,
            refund_amount: dec("1500"),
            amount_owed: Decimal::ZERO,
            paye_shortfall: Decimal::ZERO,
        };

        let json = serde_json::to_string(&refund).unwrap();
        assert!(json.contains("\"is_refund\":true"));
        assert!(json.contains("\"refund_amount\":\"1500\""));
    }
}
