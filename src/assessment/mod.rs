//! Anomaly detection and audit-risk scoring for IRP5 records.
//!
//! The anomaly detector and the risk scorer are both rule tables evaluated
//! in a fixed order, so the same record always yields the same flags,
//! score and recommendations. [`assess_irp5`] runs them alongside the tax
//! calculator in one call.

mod anomaly_detection;
mod audit_risk;
mod peer_benchmarks;
mod pipeline;

pub use anomaly_detection::{
    ANOMALY_RULES, AnomalyRule, RuleHit, calculate_anomaly_severity_score, detect_anomalies,
    is_round_number,
};
pub use audit_risk::{
    DEDUCTION_RATIO_TIERS, MEDICAL_CREDITS_TIERS, PAYE_UNDER_DEDUCTION_TIERS,
    RETIREMENT_CAP_TIERS, TRAVEL_ALLOWANCE_TIERS, Tier, calculate_audit_risk,
    recommendations_for, score_factors,
};
pub use peer_benchmarks::{IncomeBand, paye_ratio_to_expected};
pub use pipeline::{Irp5Assessment, assess_irp5};
