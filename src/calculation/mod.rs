//! Tax calculation logic.
//!
//! This module contains tax year resolution, the progressive income tax
//! calculator, the refund determiner, and helpers for UIF contributions and
//! medical scheme fees tax credits. Every function here is pure: the same
//! input and tables always give the same result.

mod income_tax;
mod medical_credits;
mod money;
mod refund;
mod tax_year;
mod uif;

pub use income_tax::{bracket_tax, calculate_tax, total_rebates};
pub use medical_credits::{
    ONE_DEPENDENT_CONTRIBUTION_CEILING, SINGLE_MEMBER_CONTRIBUTION_CEILING,
    calculate_medical_tax_credits, estimate_dependents, estimate_medical_tax_credits,
};
pub use money::{round_rand, round_rate};
pub use refund::determine_refund;
pub use tax_year::{TaxYearWindow, current_tax_year, format_tax_year, tax_year_window};
pub use uif::calculate_uif;

pub(crate) use money::{non_negative, saturating_ratio};
pub(crate) use uif::expected_uif_ceiling;
