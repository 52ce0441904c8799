//! End-to-end assessment of an IRP5 record.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{calculate_tax, determine_refund};
use crate::config::TaxYearConfig;
use crate::models::{
    AnomalyFlag, AuditRiskResult, Irp5Data, RefundDetermination, TaxCalculationInput,
    TaxCalculationResult,
};

use super::anomaly_detection::{calculate_anomaly_severity_score, detect_anomalies};
use super::audit_risk::calculate_audit_risk;

/// Everything the engine can say about one IRP5 record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Irp5Assessment {
    /// The income tax calculation.
    pub tax: TaxCalculationResult,
    /// Refund or amount owing against PAYE withheld.
    pub refund: RefundDetermination,
    /// Anomalies found in the record, in rule order.
    pub anomalies: Vec<AnomalyFlag>,
    /// Severity score of the anomalies, 0 to 100.
    pub anomaly_severity_score: u32,
    /// Composite audit-risk assessment.
    pub audit_risk: AuditRiskResult,
}

/// Runs the calculator, refund determiner, anomaly detector and risk scorer
/// over one record.
///
/// # Examples
///
/// ```
/// use sa_tax_engine::assessment::assess_irp5;
/// use sa_tax_engine::config::ConfigLoader;
/// use sa_tax_engine::models::Irp5Data;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let data = Irp5Data {
///     gross_remuneration: Decimal::from(482_315),
///     paye_withheld: Decimal::from(75_640),
///     uif_contrib: Decimal::from(2_125),
///     ..Default::default()
/// };
///
/// let assessment = assess_irp5(&data, 35, loader.latest());
/// assert_eq!(assessment.tax.total_tax, Decimal::from(94_131));
/// assert!(!assessment.refund.is_refund);
/// assert_eq!(assessment.refund.amount_owed, Decimal::from(18_491));
/// ```
pub fn assess_irp5(data: &Irp5Data, age: u32, config: &TaxYearConfig) -> Irp5Assessment {
    let data = data.sanitized();

    let tax = calculate_tax(&TaxCalculationInput::from_irp5(&data, age), config);
    let refund = determine_refund(data.paye_withheld, tax.total_tax);
    let anomalies = detect_anomalies(&data, config);
    let anomaly_severity_score = calculate_anomaly_severity_score(&anomalies);
    let audit_risk = calculate_audit_risk(&data, &anomalies, config);

    info!(
        tax_year = %tax.tax_year,
        total_tax = %tax.total_tax,
        is_refund = refund.is_refund,
        anomaly_count = anomalies.len(),
        risk_score = audit_risk.score,
        "Assessed IRP5 record"
    );

    Irp5Assessment {
        tax,
        refund,
        anomalies,
        anomaly_severity_score,
        audit_risk,
    }
}
