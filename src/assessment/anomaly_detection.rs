//! Rule-based anomaly detection for IRP5 records.
//!
//! Each check is an [`AnomalyRule`]: a stable code, the field it concerns,
//! the flag type and severity it raises, and a predicate that returns the
//! message when the rule fires. Rules are evaluated in table order and the
//! flags come back in that order, so output is deterministic.
//!
//! ## Checks
//!
//! 1. PAYE withheld below 80% of the peer ratio for the income band
//! 2. Medical credits above 5% of gross
//! 3. Retirement contributions above the deductible limit
//! 4. UIF missing on a salary above R50 000, or above the statutory maximum
//! 5. Travel allowance above 10% of gross
//! 6. Medical credits more than 30% away from the estimate for the scheme contribution
//! 7. Round thousands above R10 000 for gross, PAYE or retirement
//! 8. Retirement, medical and UIF together above 40% of gross

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculation::{
    estimate_medical_tax_credits, expected_uif_ceiling, round_rate, saturating_ratio,
};
use crate::config::TaxYearConfig;
use crate::models::{AnomalyFlag, FlagType, Irp5Data, Severity};

use super::peer_benchmarks::{IncomeBand, paye_ratio_to_expected};

const PAYE_UNDER_DEDUCTION_TOLERANCE: Decimal = dec!(0.8);
const MEDICAL_CREDITS_MAX_SHARE: Decimal = dec!(0.05);
const UIF_MISSING_GROSS_THRESHOLD: Decimal = dec!(50000);
const UIF_EXCESS_TOLERANCE: Decimal = dec!(1.1);
const TRAVEL_ALLOWANCE_MAX_SHARE: Decimal = dec!(0.10);
const MEDICAL_CREDITS_MAX_DEVIATION: Decimal = dec!(0.30);
const ROUND_NUMBER_UNIT: Decimal = dec!(1000);
const ROUND_NUMBER_MIN_VALUE: Decimal = dec!(10000);
const DEDUCTION_RATIO_MAX: Decimal = dec!(0.4);

/// What a rule reports when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    /// Human-readable description of the anomaly.
    pub message: String,
    /// Optional advice for the taxpayer.
    pub suggestion: Option<String>,
}

impl RuleHit {
    fn new(message: String, suggestion: impl Into<String>) -> Self {
        Self {
            message,
            suggestion: Some(suggestion.into()),
        }
    }
}

/// A single declarative anomaly check.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyRule {
    /// Stable code reported on the flag.
    pub code: &'static str,
    /// IRP5 field the flag refers to.
    pub field: &'static str,
    /// Flag type raised when the rule fires.
    pub flag_type: FlagType,
    /// Severity raised when the rule fires.
    pub severity: Severity,
    check: fn(&Irp5Data, &TaxYearConfig) -> Option<RuleHit>,
}

impl AnomalyRule {
    /// Evaluates the rule against a record, returning a flag if it fires.
    pub fn evaluate(&self, data: &Irp5Data, config: &TaxYearConfig) -> Option<AnomalyFlag> {
        (self.check)(data, config).map(|hit| AnomalyFlag {
            flag_type: self.flag_type,
            code: self.code.to_string(),
            message: hit.message,
            field: self.field.to_string(),
            severity: self.severity,
            suggestion: hit.suggestion,
        })
    }
}

/// The anomaly rules in evaluation order.
pub const ANOMALY_RULES: &[AnomalyRule] = &[
    AnomalyRule {
        code: "PAYE_UNDER_DEDUCTION",
        field: "paye_withheld",
        flag_type: FlagType::Warning,
        severity: Severity::High,
        check: check_paye_under_deduction,
    },
    AnomalyRule {
        code: "MEDICAL_CREDITS_EXCESSIVE",
        field: "medical_credits",
        flag_type: FlagType::Error,
        severity: Severity::High,
        check: check_medical_credits_excessive,
    },
    AnomalyRule {
        code: "RETIREMENT_CAP_EXCEEDED",
        field: "retirement_fund",
        flag_type: FlagType::Error,
        severity: Severity::High,
        check: check_retirement_cap,
    },
    AnomalyRule {
        code: "UIF_MISSING",
        field: "uif_contrib",
        flag_type: FlagType::Warning,
        severity: Severity::Medium,
        check: check_uif_missing,
    },
    AnomalyRule {
        code: "UIF_EXCESSIVE",
        field: "uif_contrib",
        flag_type: FlagType::Warning,
        severity: Severity::Low,
        check: check_uif_excessive,
    },
    AnomalyRule {
        code: "TRAVEL_ALLOWANCE_HIGH",
        field: "travel_allowance",
        flag_type: FlagType::Info,
        severity: Severity::Medium,
        check: check_travel_allowance,
    },
    AnomalyRule {
        code: "MEDICAL_CREDITS_MISMATCH",
        field: "medical_credits",
        flag_type: FlagType::Warning,
        severity: Severity::Medium,
        check: check_medical_credits_mismatch,
    },
    AnomalyRule {
        code: "ROUND_NUMBER_DETECTED",
        field: "gross_remuneration",
        flag_type: FlagType::Info,
        severity: Severity::Low,
        check: check_round_gross,
    },
    AnomalyRule {
        code: "ROUND_NUMBER_DETECTED",
        field: "paye_withheld",
        flag_type: FlagType::Info,
        severity: Severity::Low,
        check: check_round_paye,
    },
    AnomalyRule {
        code: "ROUND_NUMBER_DETECTED",
        field: "retirement_fund",
        flag_type: FlagType::Info,
        severity: Severity::Low,
        check: check_round_retirement,
    },
    AnomalyRule {
        code: "HIGH_DEDUCTION_RATIO",
        field: "gross_remuneration",
        flag_type: FlagType::Warning,
        severity: Severity::Medium,
        check: check_deduction_ratio,
    },
];

/// Runs every anomaly rule against an IRP5 record.
///
/// Negative money fields are clamped to zero first. Flags are returned in
/// rule order; several flags may name the same field.
///
/// # Examples
///
/// ```
/// use sa_tax_engine::assessment::detect_anomalies;
/// use sa_tax_engine::config::ConfigLoader;
/// use sa_tax_engine::models::{Irp5Data, Severity};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let data = Irp5Data {
///     gross_remuneration: Decimal::from(600_000),
///     paye_withheld: Decimal::from(150_123),
///     uif_contrib: Decimal::from(2_125),
///     retirement_fund: Decimal::from(400_000),
///     ..Default::default()
/// };
///
/// let flags = detect_anomalies(&data, loader.latest());
/// let cap = flags.iter().find(|f| f.code == "RETIREMENT_CAP_EXCEEDED").unwrap();
/// assert_eq!(cap.severity, Severity::High);
/// ```
pub fn detect_anomalies(data: &Irp5Data, config: &TaxYearConfig) -> Vec<AnomalyFlag> {
    let data = data.sanitized();
    let flags: Vec<AnomalyFlag> = ANOMALY_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(&data, config))
        .collect();

    debug!(
        tax_year = data.tax_year,
        flag_count = flags.len(),
        "Detected anomalies"
    );

    flags
}

/// Sums severity points for a set of flags, capped at 100.
///
/// High, medium and low flags score 30, 15 and 5 points. Error flags add
/// a further 10 points each.
pub fn calculate_anomaly_severity_score(flags: &[AnomalyFlag]) -> u32 {
    let total: u32 = flags
        .iter()
        .map(|flag| {
            let base = match flag.severity {
                Severity::High => 30,
                Severity::Medium => 15,
                Severity::Low => 5,
            };
            let error_bonus = if flag.flag_type == FlagType::Error { 10 } else { 0 };
            base + error_bonus
        })
        .sum();
    total.min(100)
}

fn percent(fraction: Decimal) -> Decimal {
    round_rate(fraction.saturating_mul(dec!(100))).normalize()
}

fn check_paye_under_deduction(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    let ratio = paye_ratio_to_expected(data.gross_remuneration, data.paye_withheld)?;
    if ratio >= PAYE_UNDER_DEDUCTION_TOLERANCE {
        return None;
    }
    let expected = IncomeBand::for_gross(data.gross_remuneration).expected_paye_ratio();
    let actual = saturating_ratio(data.paye_withheld, data.gross_remuneration);
    Some(RuleHit::new(
        format!(
            "PAYE withheld is {}% of gross remuneration, well below the {}% typical for this income band",
            percent(actual),
            percent(expected)
        ),
        "Confirm PAYE (code 4102) against your payslips; you may owe tax on assessment",
    ))
}

fn check_medical_credits_excessive(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    let limit = data.gross_remuneration * MEDICAL_CREDITS_MAX_SHARE;
    if data.medical_credits <= limit {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "Medical tax credits of R{} exceed 5% of gross remuneration (R{})",
            data.medical_credits.normalize(),
            limit.normalize()
        ),
        "Check the credit (code 4116) against your medical scheme's tax certificate",
    ))
}

fn check_retirement_cap(data: &Irp5Data, config: &TaxYearConfig) -> Option<RuleHit> {
    let limit = config.retirement.limit_for(data.gross_remuneration);
    if data.retirement_fund <= limit {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "Retirement contributions of R{} exceed the deductible limit of R{}",
            data.retirement_fund.normalize(),
            limit.normalize()
        ),
        format!(
            "Only R{} is deductible this year; the excess carries forward",
            limit.normalize()
        ),
    ))
}

fn check_uif_missing(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    if !data.uif_contrib.is_zero() || data.gross_remuneration <= UIF_MISSING_GROSS_THRESHOLD {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "No UIF contributions recorded on gross remuneration of R{}",
            data.gross_remuneration.normalize()
        ),
        "Check code 4141 on your IRP5; most employees contribute to UIF",
    ))
}

fn check_uif_excessive(data: &Irp5Data, config: &TaxYearConfig) -> Option<RuleHit> {
    let ceiling = expected_uif_ceiling(data.gross_remuneration, config);
    if data.uif_contrib <= ceiling * UIF_EXCESS_TOLERANCE {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "UIF contributions of R{} exceed the expected maximum of R{}",
            data.uif_contrib.normalize(),
            ceiling.round_dp(2).normalize()
        ),
        "UIF is 1% of remuneration up to the monthly ceiling; verify the amount",
    ))
}

fn check_travel_allowance(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    if data.travel_allowance <= data.gross_remuneration * TRAVEL_ALLOWANCE_MAX_SHARE {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "Travel allowance of R{} is more than 10% of gross remuneration",
            data.travel_allowance.normalize()
        ),
        "Keep a logbook of business travel to support any travel claim",
    ))
}

fn check_medical_credits_mismatch(data: &Irp5Data, config: &TaxYearConfig) -> Option<RuleHit> {
    if data.medical_scheme <= Decimal::ZERO {
        return None;
    }
    let estimate = estimate_medical_tax_credits(data.medical_scheme, config);
    if estimate.is_zero() {
        return None;
    }
    let deviation = (data.medical_credits - estimate).abs() / estimate;
    if deviation <= MEDICAL_CREDITS_MAX_DEVIATION {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "Medical tax credits of R{} differ by {}% from the R{} expected for R{} in scheme contributions",
            data.medical_credits.normalize(),
            percent(deviation),
            estimate.normalize(),
            data.medical_scheme.normalize()
        ),
        "Confirm the number of dependents on your medical scheme",
    ))
}

/// Returns true for values that look estimated: whole thousands above R10 000.
pub fn is_round_number(value: Decimal) -> bool {
    value > ROUND_NUMBER_MIN_VALUE && (value % ROUND_NUMBER_UNIT).is_zero()
}

fn round_number_hit(label: &str, value: Decimal) -> Option<RuleHit> {
    if !is_round_number(value) {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "{} of R{} is a round number, which suggests an estimate",
            label,
            value.normalize()
        ),
        "Use the exact figure from your IRP5 certificate",
    ))
}

fn check_round_gross(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    round_number_hit("Gross remuneration", data.gross_remuneration)
}

fn check_round_paye(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    round_number_hit("PAYE withheld", data.paye_withheld)
}

fn check_round_retirement(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    round_number_hit("Retirement fund contribution", data.retirement_fund)
}

fn check_deduction_ratio(data: &Irp5Data, _config: &TaxYearConfig) -> Option<RuleHit> {
    if data.gross_remuneration <= Decimal::ZERO {
        return None;
    }
    let deductions = data
        .retirement_fund
        .saturating_add(data.medical_scheme)
        .saturating_add(data.uif_contrib);
    let ratio = saturating_ratio(deductions, data.gross_remuneration);
    if ratio <= DEDUCTION_RATIO_MAX {
        return None;
    }
    Some(RuleHit::new(
        format!(
            "Retirement, medical and UIF contributions total {}% of gross remuneration",
            percent(ratio)
        ),
        "Keep supporting certificates for every contribution",
    ))
}
