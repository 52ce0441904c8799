//! Composite audit-risk scoring.
//!
//! Eight factors are scored independently, each up to its own maximum,
//! summed, and capped at 100. The threshold ladders are data: each
//! [`Tier`] awards its points when a ratio crosses its threshold, and the
//! first matching tier wins.
//!
//! | Factor                    | Measure                                  | Max |
//! |---------------------------|------------------------------------------|-----|
//! | `paye_under_deduction`    | PAYE ratio / peer ratio (<70/85/95%)     | 35  |
//! | `medical_credits_high`    | credits / gross (>5% / >3%)              | 20  |
//! | `retirement_cap_exceeded` | retirement / limit (>150% / >100%)       | 25  |
//! | `round_numbers_used`      | 4 points per round figure                | 15  |
//! | `inconsistent_data`       | contradictory figures                    | 20  |
//! | `high_deduction_ratio`    | deductions / gross (>50/40/30%)          | 15  |
//! | `travel_allowance_high`   | travel / gross (>20% / >10%)             | 10  |
//! | `anomaly_severity`        | anomaly severity score x 0.3             | 25  |

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculation::{round_rand, saturating_ratio};
use crate::config::TaxYearConfig;
use crate::models::{AnomalyFlag, AuditRiskFactors, AuditRiskResult, Irp5Data, RiskLevel};

use super::anomaly_detection::{calculate_anomaly_severity_score, is_round_number};
use super::peer_benchmarks::paye_ratio_to_expected;

/// A rung on a threshold ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    /// Ratio at which the tier applies.
    pub threshold: Decimal,
    /// Points awarded.
    pub points: Decimal,
}

const fn tier(threshold: Decimal, points: Decimal) -> Tier {
    Tier { threshold, points }
}

/// PAYE ratio relative to peers; awarded when the ratio is below the threshold.
pub const PAYE_UNDER_DEDUCTION_TIERS: &[Tier] = &[
    tier(dec!(0.70), dec!(35)),
    tier(dec!(0.85), dec!(20)),
    tier(dec!(0.95), dec!(10)),
];

/// Medical credits as a share of gross; awarded above the threshold.
pub const MEDICAL_CREDITS_TIERS: &[Tier] = &[tier(dec!(0.05), dec!(20)), tier(dec!(0.03), dec!(10))];

/// Retirement contributions relative to the deductible limit; awarded above the threshold.
pub const RETIREMENT_CAP_TIERS: &[Tier] = &[tier(dec!(1.5), dec!(25)), tier(dec!(1.0), dec!(15))];

/// Deductions as a share of gross; awarded above the threshold.
pub const DEDUCTION_RATIO_TIERS: &[Tier] = &[
    tier(dec!(0.5), dec!(15)),
    tier(dec!(0.4), dec!(10)),
    tier(dec!(0.3), dec!(5)),
];

/// Travel allowance as a share of gross; awarded above the threshold.
pub const TRAVEL_ALLOWANCE_TIERS: &[Tier] = &[tier(dec!(0.2), dec!(10)), tier(dec!(0.1), dec!(5))];

const ROUND_NUMBER_POINTS: Decimal = dec!(4);
const ROUND_NUMBER_MAX: Decimal = dec!(15);
const INCONSISTENT_DATA_MAX: Decimal = dec!(20);
const ANOMALY_SEVERITY_WEIGHT: Decimal = dec!(0.3);
const ANOMALY_SEVERITY_MAX: Decimal = dec!(25);
const SCORE_MAX: Decimal = dec!(100);
const UIF_EXPECTED_ABOVE: Decimal = dec!(50000);

fn points_below(value: Decimal, tiers: &[Tier]) -> Decimal {
    tiers
        .iter()
        .find(|t| value < t.threshold)
        .map_or(Decimal::ZERO, |t| t.points)
}

fn points_above(value: Decimal, tiers: &[Tier]) -> Decimal {
    tiers
        .iter()
        .find(|t| value > t.threshold)
        .map_or(Decimal::ZERO, |t| t.points)
}

/// Top-tier points, used when a ratio's denominator is zero but the numerator is not.
fn max_points(tiers: &[Tier]) -> Decimal {
    tiers.first().map_or(Decimal::ZERO, |t| t.points)
}

fn share_points(part: Decimal, whole: Decimal, tiers: &[Tier]) -> Decimal {
    if whole > Decimal::ZERO {
        points_above(saturating_ratio(part, whole), tiers)
    } else if part > Decimal::ZERO {
        max_points(tiers)
    } else {
        Decimal::ZERO
    }
}

/// A recommendation and the condition under which it is given.
struct Recommendation {
    applies: fn(&AuditRiskFactors, u32) -> bool,
    message: &'static str,
}

const RECOMMENDATIONS: &[Recommendation] = &[
    Recommendation {
        applies: |f, _| f.paye_under_deduction > Decimal::ZERO,
        message: "Check that your employer withheld enough PAYE; ask payroll to deduct additional tax monthly if needed.",
    },
    Recommendation {
        applies: |f, _| f.medical_credits_high > Decimal::ZERO,
        message: "Verify medical scheme fees tax credits against your scheme's annual tax certificate.",
    },
    Recommendation {
        applies: |f, _| f.retirement_cap_exceeded > Decimal::ZERO,
        message: "Retirement contributions above the deductible limit carry forward to later years; keep your fund certificates.",
    },
    Recommendation {
        applies: |f, _| f.round_numbers_used > Decimal::ZERO,
        message: "Replace estimated round figures with the exact amounts on your IRP5 certificate.",
    },
    Recommendation {
        applies: |f, _| f.inconsistent_data > Decimal::ZERO,
        message: "Reconcile figures that contradict one another before filing.",
    },
    Recommendation {
        applies: |f, _| f.high_deduction_ratio > Decimal::ZERO,
        message: "Keep supporting documents for all deductions; a high deduction ratio often triggers verification.",
    },
    Recommendation {
        applies: |f, _| f.travel_allowance_high > Decimal::ZERO,
        message: "Maintain a detailed logbook to support any travel allowance claim.",
    },
    Recommendation {
        applies: |f, _| f.anomaly_severity > Decimal::ZERO,
        message: "Resolve the flagged anomalies before submitting your return.",
    },
    Recommendation {
        applies: |_, score| score >= 70,
        message: "Have a registered tax practitioner review your return before filing.",
    },
    Recommendation {
        applies: |_, score| (50..70).contains(&score),
        message: "SARS verification is likely; prepare supporting documents in advance.",
    },
    Recommendation {
        applies: |_, score| (30..50).contains(&score),
        message: "Review the flagged items; small corrections may lower your risk.",
    },
    Recommendation {
        applies: |_, score| score < 30,
        message: "Your return shows a low audit-risk profile.",
    },
];

/// Scores every factor for an IRP5 record.
pub fn score_factors(data: &Irp5Data, anomalies: &[AnomalyFlag], config: &TaxYearConfig) -> AuditRiskFactors {
    let gross = data.gross_remuneration;

    let paye_under_deduction = paye_ratio_to_expected(gross, data.paye_withheld)
        .map_or(Decimal::ZERO, |ratio| points_below(ratio, PAYE_UNDER_DEDUCTION_TIERS));

    let medical_credits_high = share_points(data.medical_credits, gross, MEDICAL_CREDITS_TIERS);

    let retirement_limit = config.retirement.limit_for(gross);
    let retirement_cap_exceeded =
        share_points(data.retirement_fund, retirement_limit, RETIREMENT_CAP_TIERS);

    let round_count = [
        gross,
        data.paye_withheld,
        data.retirement_fund,
        data.medical_scheme,
        data.travel_allowance,
    ]
    .into_iter()
    .filter(|value| is_round_number(*value))
    .count();
    let round_numbers_used = (ROUND_NUMBER_POINTS * Decimal::from(round_count)).min(ROUND_NUMBER_MAX);

    let mut inconsistent_data = Decimal::ZERO;
    if data.paye_withheld > gross {
        inconsistent_data += dec!(15);
    }
    if data.medical_credits > Decimal::ZERO && data.medical_scheme.is_zero() {
        inconsistent_data += dec!(10);
    }
    if data.uif_contrib.is_zero() && gross > UIF_EXPECTED_ABOVE {
        inconsistent_data += dec!(5);
    }
    let inconsistent_data = inconsistent_data.min(INCONSISTENT_DATA_MAX);

    let deductions = data
        .retirement_fund
        .saturating_add(data.medical_scheme)
        .saturating_add(data.uif_contrib);
    let high_deduction_ratio = share_points(deductions, gross, DEDUCTION_RATIO_TIERS);

    let travel_allowance_high = share_points(data.travel_allowance, gross, TRAVEL_ALLOWANCE_TIERS);

    let severity = Decimal::from(calculate_anomaly_severity_score(anomalies));
    let anomaly_severity = (severity * ANOMALY_SEVERITY_WEIGHT).min(ANOMALY_SEVERITY_MAX);

    AuditRiskFactors {
        paye_under_deduction,
        medical_credits_high,
        retirement_cap_exceeded,
        round_numbers_used,
        inconsistent_data,
        high_deduction_ratio,
        travel_allowance_high,
        anomaly_severity,
    }
}

/// Returns the recommendations that apply to a factor vector and score.
pub fn recommendations_for(factors: &AuditRiskFactors, score: u32) -> Vec<String> {
    RECOMMENDATIONS
        .iter()
        .filter(|r| (r.applies)(factors, score))
        .map(|r| r.message.to_string())
        .collect()
}

/// Calculates the composite audit-risk score for an IRP5 record.
///
/// # Arguments
///
/// * `data` - The IRP5 record (negative fields are clamped to zero)
/// * `anomalies` - Flags from [`detect_anomalies`](super::detect_anomalies) for the same record
/// * `config` - The tax year's tables, for the retirement limit
///
/// # Examples
///
/// ```
/// use sa_tax_engine::assessment::{calculate_audit_risk, detect_anomalies};
/// use sa_tax_engine::config::ConfigLoader;
/// use sa_tax_engine::models::{Irp5Data, RiskLevel};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let data = Irp5Data {
///     gross_remuneration: Decimal::from(600_000),
///     paye_withheld: Decimal::from(72_000),
///     uif_contrib: Decimal::from(2_125),
///     retirement_fund: Decimal::from(330_000),
///     ..Default::default()
/// };
///
/// let anomalies = detect_anomalies(&data, loader.latest());
/// let risk = calculate_audit_risk(&data, &anomalies, loader.latest());
/// assert_eq!(risk.level, RiskLevel::VeryHigh);
/// ```
pub fn calculate_audit_risk(
    data: &Irp5Data,
    anomalies: &[AnomalyFlag],
    config: &TaxYearConfig,
) -> AuditRiskResult {
    let data = data.sanitized();
    let factors = score_factors(&data, anomalies, config);

    let total = round_rand(factors.total().min(SCORE_MAX));
    let score = total.to_u32().unwrap_or_default();
    let level = RiskLevel::from_score(score);
    let recommendations = recommendations_for(&factors, score);

    debug!(score, level = ?level, "Calculated audit risk");

    AuditRiskResult {
        score,
        level,
        factors,
        recommendations,
    }
}
