//! Calculation trace records.

use serde::{Deserialize, Serialize};

/// A single step in a calculation trace recording a rule application.
///
/// Each step captures the input, output, and reasoning for one rule so a
/// taxpayer (or reviewer) can follow how a liability was derived.
///
/// # Example
///
/// ```
/// use sa_tax_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "retirement_deduction".to_string(),
///     rule_name: "Retirement Fund Deduction".to_string(),
///     section_ref: "s11F".to_string(),
///     input: serde_json::json!({ "retirement_contrib": "10000" }),
///     output: serde_json::json!({ "deduction": "10000" }),
///     reasoning: "Contribution R10000 is within the R27500 limit".to_string(),
/// };
/// assert_eq!(step.section_ref, "s11F");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the Income Tax Act section behind this rule.
    pub section_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_step_round_trips_through_json() {
        let step = AuditStep {
            step_number: 3,
            rule_id: "bracket_tax".to_string(),
            rule_name: "Progressive Bracket Tax".to_string(),
            section_ref: "s5".to_string(),
            input: serde_json::json!({ "taxable_income": "89000" }),
            output: serde_json::json!({ "income_tax": "16020", "marginal_rate": "0.18" }),
            reasoning: "R89000 falls in the 18% bracket".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"rule_id\":\"bracket_tax\""));
        assert!(json.contains("\"section_ref\":\"s5\""));

        let parsed: AuditStep = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, step);
    }
}
