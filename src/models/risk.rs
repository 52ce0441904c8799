//! Anomaly and audit-risk models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of anomaly raised against an IRP5 record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    /// Figures are very likely wrong or will be rejected.
    Error,
    /// Figures are unusual and should be checked.
    Warning,
    /// Worth knowing, no action strictly needed.
    Info,
}

/// How much an anomaly matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor.
    Low,
    /// Should be reviewed.
    Medium,
    /// Likely to attract attention from SARS.
    High,
}

/// A single anomaly detected in an IRP5 record.
///
/// # Example
///
/// ```
/// use sa_tax_engine::models::{AnomalyFlag, FlagType, Severity};
///
/// let flag = AnomalyFlag {
///     flag_type: FlagType::Error,
///     code: "RETIREMENT_CAP_EXCEEDED".to_string(),
///     message: "Retirement contributions exceed the deductible limit".to_string(),
///     field: "retirement_fund".to_string(),
///     severity: Severity::High,
///     suggestion: None,
/// };
/// assert_eq!(flag.severity, Severity::High);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    /// Error, warning, or info.
    #[serde(rename = "type")]
    pub flag_type: FlagType,
    /// Stable identifier for the check that fired.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Name of the IRP5 field implicated.
    pub field: String,
    /// How much the anomaly matters.
    pub severity: Severity,
    /// What the taxpayer could do about it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Named sub-scores that make up an audit-risk score.
///
/// Each factor is bounded by its own maximum; the composite score is their
/// sum capped at 100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRiskFactors {
    /// PAYE withheld well below what peers at this income pay.
    pub paye_under_deduction: Decimal,
    /// Medical credits large relative to income.
    pub medical_credits_high: Decimal,
    /// Retirement contributions above the deductible limit.
    pub retirement_cap_exceeded: Decimal,
    /// Suspiciously round figures.
    pub round_numbers_used: Decimal,
    /// Figures that contradict one another.
    pub inconsistent_data: Decimal,
    /// Deductions large relative to income.
    pub high_deduction_ratio: Decimal,
    /// Travel allowance large relative to income.
    pub travel_allowance_high: Decimal,
    /// Contribution from the anomaly detector's severity score.
    pub anomaly_severity: Decimal,
}

impl AuditRiskFactors {
    /// Sum of all factors, before the composite cap.
    pub fn total(&self) -> Decimal {
        self.paye_under_deduction
            + self.medical_credits_high
            + self.retirement_cap_exceeded
            + self.round_numbers_used
            + self.inconsistent_data
            + self.high_deduction_ratio
            + self.travel_allowance_high
            + self.anomaly_severity
    }
}

/// Audit-risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score below 30.
    Low,
    /// Score 30 to 49.
    Medium,
    /// Score 50 to 69.
    High,
    /// Score 70 and above.
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    /// Maps a composite score to its band.
    pub fn from_score(score: u32) -> Self {
        match score {
            70.. => Self::VeryHigh,
            50..=69 => Self::High,
            30..=49 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Display colour hint for presentation layers.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "yellow",
            Self::High => "orange",
            Self::VeryHigh => "red",
        }
    }
}

/// The composite audit-risk assessment for an IRP5 record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRiskResult {
    /// Composite score in `[0, 100]`.
    pub score: u32,
    /// Band for the score.
    pub level: RiskLevel,
    /// The sub-scores that produced the composite.
    pub factors: AuditRiskFactors,
    /// Advice keyed to the factors that fired.
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::VeryHigh);
    }

    #[test]
    fn test_risk_level_serialization() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::VeryHigh).unwrap(),
            "\"Very High\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"Low\"");

        let level: RiskLevel = serde_json::from_str("\"Very High\"").unwrap();
        assert_eq!(level, RiskLevel::VeryHigh);
    }

    #[test]
    fn test_risk_level_colors() {
        assert_eq!(RiskLevel::Low.color(), "green");
        assert_eq!(RiskLevel::VeryHigh.color(), "red");
    }

    #[test]
    fn test_anomaly_flag_serializes_type_field() {
        let flag = AnomalyFlag {
            flag_type: FlagType::Warning,
            code: "UIF_MISSING".to_string(),
            message: "No UIF contributions recorded".to_string(),
            field: "uif_contrib".to_string(),
            severity: Severity::Medium,
            suggestion: None,
        };

        let json = serde_json::to_string(&flag).unwrap();
        assert!(json.contains("\"type\":\"warning\""));
        assert!(json.contains("\"severity\":\"medium\""));
        assert!(!json.contains("suggestion"));
    }

    #[test]
    fn test_factors_total_sums_every_factor() {
        let factors = AuditRiskFactors {
            paye_under_deduction: Decimal::from(35),
            medical_credits_high: Decimal::from(10),
            retirement_cap_exceeded: Decimal::from(25),
            round_numbers_used: Decimal::from(6),
            inconsistent_data: Decimal::from(5),
            high_deduction_ratio: Decimal::from(15),
            travel_allowance_high: Decimal::from(5),
            anomaly_severity: Decimal::from(25),
        };
        assert_eq!(factors.total(), Decimal::from(126));
    }
}
