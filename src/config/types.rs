//! Configuration types for tax-year tables.
//!
//! This module contains the strongly-typed structures that are deserialized
//! from the per-year YAML files under `config/sars/`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single progressive income tax bracket.
///
/// The bracket covers taxable income in `[min, max)`. A `max` of `None`
/// marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket (inclusive).
    pub min: Decimal,
    /// Upper bound of the bracket (exclusive), or `None` if unbounded.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Marginal rate as a fraction (e.g. 0.18 for 18%).
    pub rate: Decimal,
}

impl TaxBracket {
    /// Returns the portion of `taxable_income` that falls inside this bracket.
    pub fn portion_of(&self, taxable_income: Decimal) -> Decimal {
        if taxable_income <= self.min {
            return Decimal::ZERO;
        }
        let upper = match self.max {
            Some(max) => max.min(taxable_income),
            None => taxable_income,
        };
        upper - self.min
    }
}

/// Age-based tax rebates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebates {
    /// Primary rebate, available to every taxpayer.
    pub primary: Decimal,
    /// Secondary rebate for taxpayers aged `secondary_age` or older.
    pub secondary: Decimal,
    /// Tertiary rebate for taxpayers aged `tertiary_age` or older.
    pub tertiary: Decimal,
    /// Age from which the secondary rebate applies.
    pub secondary_age: u32,
    /// Age from which the tertiary rebate applies.
    pub tertiary_age: u32,
}

/// Limits on the deductible retirement fund contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementCap {
    /// Fraction of gross income that may be deducted (0.275).
    pub percentage: Decimal,
    /// Absolute annual ceiling on the deduction.
    pub annual_cap: Decimal,
}

impl RetirementCap {
    /// Returns the maximum deductible contribution for the given gross income.
    pub fn limit_for(&self, gross_income: Decimal) -> Decimal {
        (gross_income * self.percentage).min(self.annual_cap)
    }
}

/// Unemployment Insurance Fund contribution parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UifConfig {
    /// Employee contribution rate as a fraction of remuneration.
    pub rate: Decimal,
    /// Maximum employee contribution per month.
    pub monthly_cap: Decimal,
}

impl UifConfig {
    /// Maximum employee contribution for a full tax year.
    pub fn annual_cap(&self) -> Decimal {
        self.monthly_cap * Decimal::from(12)
    }
}

/// Monthly section 6A medical scheme fees tax credit rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalCreditRates {
    /// Credit for the main member.
    pub main_member: Decimal,
    /// Credit for the first dependent.
    pub first_dependent: Decimal,
    /// Credit for each additional dependent.
    pub additional_dependent: Decimal,
}

/// The complete set of tables for one tax year.
///
/// Tables are loaded once and never mutated; a new tax year is supported
/// by loading a new file rather than editing an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    /// Tax year label: the calendar year in which the tax year ends.
    pub tax_year: i32,
    /// Progressive brackets in ascending order.
    pub brackets: Vec<TaxBracket>,
    /// Age-based rebates.
    pub rebates: Rebates,
    /// Retirement contribution deduction limits.
    pub retirement: RetirementCap,
    /// UIF contribution parameters.
    pub uif: UifConfig,
    /// Medical scheme fees tax credit rates.
    pub medical_credits: MedicalCreditRates,
}

impl TaxYearConfig {
    /// Checks the structural invariants the calculator relies on.
    ///
    /// Brackets must be non-empty, start at zero, be contiguous and strictly
    /// ascending, and only the last may be unbounded. Rates must lie in `[0, 1]`.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidConfig {
            tax_year: self.tax_year,
            message,
        };

        let first = self
            .brackets
            .first()
            .ok_or_else(|| invalid("at least one bracket is required".to_string()))?;
        if !first.min.is_zero() {
            return Err(invalid(format!(
                "first bracket must start at 0, found {}",
                first.min
            )));
        }

        let last_index = self.brackets.len() - 1;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "bracket {} has rate {} outside [0, 1]",
                    index, bracket.rate
                )));
            }

            match bracket.max {
                Some(max) if max <= bracket.min => {
                    return Err(invalid(format!(
                        "bracket {} upper bound {} is not above its lower bound {}",
                        index, max, bracket.min
                    )));
                }
                Some(max) if index < last_index => {
                    let next = &self.brackets[index + 1];
                    if next.min != max {
                        return Err(invalid(format!(
                            "bracket {} ends at {} but bracket {} starts at {}",
                            index,
                            max,
                            index + 1,
                            next.min
                        )));
                    }
                }
                None if index < last_index => {
                    return Err(invalid(format!(
                        "only the last bracket may be unbounded (bracket {})",
                        index
                    )));
                }
                _ => {}
            }
        }

        if self.brackets[last_index].max.is_some() {
            return Err(invalid("the last bracket must be unbounded".to_string()));
        }

        if self.rebates.tertiary_age < self.rebates.secondary_age {
            return Err(invalid(
                "tertiary rebate age must not be below secondary rebate age".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(min: &str, max: Option<&str>, rate: &str) -> TaxBracket {
        TaxBracket {
            min: dec(min),
            max: max.map(dec),
            rate: dec(rate),
        }
    }

    fn sample_config(brackets: Vec<TaxBracket>) -> TaxYearConfig {
        TaxYearConfig {
            tax_year: 2026,
            brackets,
            rebates: Rebates {
                primary: dec("17235"),
                secondary: dec("9444"),
                tertiary: dec("3145"),
                secondary_age: 65,
                tertiary_age: 75,
            },
            retirement: RetirementCap {
                percentage: dec("0.275"),
                annual_cap: dec("350000"),
            },
            uif: UifConfig {
                rate: dec("0.01"),
                monthly_cap: dec("177.12"),
            },
            medical_credits: MedicalCreditRates {
                main_member: dec("347"),
                first_dependent: dec("347"),
                additional_dependent: dec("234"),
            },
        }
    }

    #[test]
    fn test_bracket_portion_below_min_is_zero() {
        let b = bracket("237100", Some("370500"), "0.26");
        assert_eq!(b.portion_of(dec("200000")), Decimal::ZERO);
        assert_eq!(b.portion_of(dec("237100")), Decimal::ZERO);
    }

    #[test]
    fn test_bracket_portion_inside_and_above() {
        let b = bracket("237100", Some("370500"), "0.26");
        assert_eq!(b.portion_of(dec("300000")), dec("62900"));
        assert_eq!(b.portion_of(dec("900000")), dec("133400"));
    }

    #[test]
    fn test_unbounded_bracket_portion() {
        let b = bracket("1817000", None, "0.45");
        assert_eq!(b.portion_of(dec("2000000")), dec("183000"));
    }

    #[test]
    fn test_retirement_limit_uses_lower_of_percentage_and_cap() {
        let cap = RetirementCap {
            percentage: dec("0.275"),
            annual_cap: dec("350000"),
        };
        assert_eq!(cap.limit_for(dec("600000")), dec("165000"));
        assert_eq!(cap.limit_for(dec("2000000")), dec("350000"));
    }

    #[test]
    fn test_uif_annual_cap() {
        let uif = UifConfig {
            rate: dec("0.01"),
            monthly_cap: dec("177.12"),
        };
        assert_eq!(uif.annual_cap(), dec("2125.44"));
    }

    #[test]
    fn test_validate_accepts_contiguous_brackets() {
        let config = sample_config(vec![
            bracket("0", Some("100"), "0.1"),
            bracket("100", None, "0.2"),
        ]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_brackets() {
        let config = sample_config(vec![]);
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig { tax_year: 2026, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_gap_between_brackets() {
        let config = sample_config(vec![
            bracket("0", Some("100"), "0.1"),
            bracket("150", None, "0.2"),
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ends at 100"));
    }

    #[test]
    fn test_validate_rejects_unbounded_middle_bracket() {
        let config = sample_config(vec![
            bracket("0", None, "0.1"),
            bracket("100", None, "0.2"),
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("only the last bracket"));
    }

    #[test]
    fn test_validate_rejects_bounded_top_bracket() {
        let config = sample_config(vec![bracket("0", Some("100"), "0.1")]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be unbounded"));
    }

    #[test]
    fn test_validate_rejects_rate_above_one() {
        let config = sample_config(vec![bracket("0", None, "1.5")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nonzero_start() {
        let config = sample_config(vec![bracket("10", None, "0.1")]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must start at 0"));
    }
}
