//! Income tax calculation.
//!
//! This module turns a [`TaxCalculationInput`] into a [`TaxCalculationResult`]
//! using one tax year's tables.
//!
//! ## Order of operations
//!
//! 1. Retirement deduction, capped at the lower of 27.5% of gross and R350 000
//! 2. Taxable income = gross - retirement deduction - UIF (never below zero)
//! 3. Progressive bracket tax
//! 4. Age-based rebates (primary, plus secondary from 65, plus tertiary from 75)
//! 5. Medical scheme fees tax credits
//!
//! Medical scheme contributions are never deducted from income; they only
//! produce credits. Every intermediate value is kept at full precision and
//! rounded once when the result is built.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::TaxYearConfig;
use crate::models::{AuditStep, TaxCalculationInput, TaxCalculationResult};

use super::money::{non_negative, round_rand, round_rate};
use super::tax_year::format_tax_year;

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Calculates income tax for one taxpayer.
///
/// This is a total function: negative amounts are clamped to zero (and
/// logged) rather than rejected, so it never fails.
///
/// # Arguments
///
/// * `input` - Income, deduction and credit figures for the year
/// * `config` - The tax year's brackets, rebates and caps
///
/// # Examples
///
/// ```
/// use sa_tax_engine::calculation::calculate_tax;
/// use sa_tax_engine::config::ConfigLoader;
/// use sa_tax_engine::models::TaxCalculationInput;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let input = TaxCalculationInput {
///     gross_income: Decimal::from(100_000),
///     retirement_contrib: Decimal::from(10_000),
///     medical_contrib: Decimal::from(5_000),
///     medical_credits: Decimal::from(4_368),
///     uif_contrib: Decimal::from(1_000),
///     age: 35,
/// };
///
/// let result = calculate_tax(&input, loader.latest());
/// assert_eq!(result.taxable_income, Decimal::from(89_000));
/// assert_eq!(result.total_tax, Decimal::ZERO);
/// assert_eq!(result.marginal_rate, Decimal::from(18));
/// ```
pub fn calculate_tax(input: &TaxCalculationInput, config: &TaxYearConfig) -> TaxCalculationResult {
    let gross_income = non_negative("gross_income", input.gross_income);
    let retirement_contrib = non_negative("retirement_contrib", input.retirement_contrib);
    let medical_credits = non_negative("medical_credits", input.medical_credits);
    let uif_contrib = non_negative("uif_contrib", input.uif_contrib);

    let mut steps = Vec::new();

    // Step 1: retirement deduction
    let retirement_limit = config.retirement.limit_for(gross_income);
    let retirement_deduction = retirement_contrib.min(retirement_limit);
    steps.push(AuditStep {
        step_number: 1,
        rule_id: "retirement_deduction".to_string(),
        rule_name: "Retirement Fund Deduction".to_string(),
        section_ref: "s11F".to_string(),
        input: serde_json::json!({
            "gross_income": gross_income.normalize().to_string(),
            "retirement_contrib": retirement_contrib.normalize().to_string(),
            "percentage": config.retirement.percentage.normalize().to_string(),
            "annual_cap": config.retirement.annual_cap.normalize().to_string()
        }),
        output: serde_json::json!({
            "limit": retirement_limit.normalize().to_string(),
            "deduction": retirement_deduction.normalize().to_string(),
            "capped": retirement_contrib > retirement_limit
        }),
        reasoning: if retirement_contrib > retirement_limit {
            format!(
                "Contribution R{} exceeds the limit of R{}; deduction capped at R{}",
                retirement_contrib.normalize(),
                retirement_limit.normalize(),
                retirement_deduction.normalize()
            )
        } else {
            format!(
                "Contribution R{} is within the limit of R{}",
                retirement_contrib.normalize(),
                retirement_limit.normalize()
            )
        },
    });

    // Step 2: taxable income
    let taxable_income = (gross_income - retirement_deduction - uif_contrib).max(Decimal::ZERO);
    steps.push(AuditStep {
        step_number: 2,
        rule_id: "taxable_income".to_string(),
        rule_name: "Taxable Income".to_string(),
        section_ref: "s1".to_string(),
        input: serde_json::json!({
            "gross_income": gross_income.normalize().to_string(),
            "retirement_deduction": retirement_deduction.normalize().to_string(),
            "uif_contrib": uif_contrib.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string()
        }),
        reasoning: format!(
            "R{} - R{} - R{} = R{}",
            gross_income.normalize(),
            retirement_deduction.normalize(),
            uif_contrib.normalize(),
            taxable_income.normalize()
        ),
    });

    // Step 3: progressive bracket tax
    let (income_tax, marginal_rate) = bracket_tax(taxable_income, config);
    steps.push(AuditStep {
        step_number: 3,
        rule_id: "bracket_tax".to_string(),
        rule_name: "Progressive Bracket Tax".to_string(),
        section_ref: "s5".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "bracket_count": config.brackets.len()
        }),
        output: serde_json::json!({
            "income_tax": income_tax.normalize().to_string(),
            "marginal_rate": marginal_rate.normalize().to_string()
        }),
        reasoning: format!(
            "Tax on R{} across the bracket table is R{} (marginal rate {}%)",
            taxable_income.normalize(),
            income_tax.normalize(),
            (marginal_rate * ONE_HUNDRED).normalize()
        ),
    });

    // Step 4: rebates
    let rebates = total_rebates(input.age, config);
    let tax_after_rebates = (income_tax - rebates).max(Decimal::ZERO);
    steps.push(AuditStep {
        step_number: 4,
        rule_id: "rebates".to_string(),
        rule_name: "Age-Based Rebates".to_string(),
        section_ref: "s6".to_string(),
        input: serde_json::json!({
            "age": input.age,
            "income_tax": income_tax.normalize().to_string()
        }),
        output: serde_json::json!({
            "rebates": rebates.normalize().to_string(),
            "tax_after_rebates": tax_after_rebates.normalize().to_string()
        }),
        reasoning: format!(
            "Rebates of R{} for age {} reduce tax to R{}",
            rebates.normalize(),
            input.age,
            tax_after_rebates.normalize()
        ),
    });

    // Step 5: medical credits
    let total_tax = (tax_after_rebates - medical_credits).max(Decimal::ZERO);
    steps.push(AuditStep {
        step_number: 5,
        rule_id: "medical_tax_credits".to_string(),
        rule_name: "Medical Scheme Fees Tax Credit".to_string(),
        section_ref: "s6A".to_string(),
        input: serde_json::json!({
            "tax_after_rebates": tax_after_rebates.normalize().to_string(),
            "medical_credits": medical_credits.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_tax": total_tax.normalize().to_string()
        }),
        reasoning: format!(
            "R{} - R{} medical credits = R{} (not below zero)",
            tax_after_rebates.normalize(),
            medical_credits.normalize(),
            total_tax.normalize()
        ),
    });

    let effective_rate = if gross_income.is_zero() {
        Decimal::ZERO
    } else {
        total_tax / gross_income * ONE_HUNDRED
    };

    debug!(
        tax_year = config.tax_year,
        taxable_income = %taxable_income,
        income_tax = %income_tax,
        total_tax = %total_tax,
        "Calculated income tax"
    );

    TaxCalculationResult {
        tax_year: format_tax_year(config.tax_year),
        retirement_deduction: round_rand(retirement_deduction),
        taxable_income: round_rand(taxable_income),
        income_tax: round_rand(income_tax),
        primary_rebate: round_rand(rebates),
        medical_tax_credits: round_rand(medical_credits),
        total_tax: round_rand(total_tax),
        effective_rate: round_rate(effective_rate),
        marginal_rate: round_rate(marginal_rate * ONE_HUNDRED),
        tax_brackets: config.brackets.clone(),
        steps,
    }
}

/// Walks the bracket table and returns `(tax, marginal_rate)`.
///
/// The marginal rate is the fractional rate of the last bracket that
/// contributed any tax, or zero when taxable income is zero.
pub fn bracket_tax(taxable_income: Decimal, config: &TaxYearConfig) -> (Decimal, Decimal) {
    let mut tax = Decimal::ZERO;
    let mut marginal_rate = Decimal::ZERO;

    for bracket in &config.brackets {
        if taxable_income <= bracket.min {
            break;
        }
        tax += bracket.portion_of(taxable_income) * bracket.rate;
        marginal_rate = bracket.rate;
    }

    (tax, marginal_rate)
}

/// Returns the sum of the rebates that apply at `age`.
///
/// The rebates are additive: a 75-year-old receives the primary, secondary
/// and tertiary rebates.
pub fn total_rebates(age: u32, config: &TaxYearConfig) -> Decimal {
    let rebates = &config.rebates;
    let mut total = rebates.primary;
    if age >= rebates.secondary_age {
        total += rebates.secondary;
    }
    if age >= rebates.tertiary_age {
        total += rebates.tertiary;
    }
    total
}
