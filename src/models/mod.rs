//! Core data models for the tax engine.
//!
//! Every record here is plain data: built by the caller or returned by an
//! engine function, never mutated by the engine afterwards.

mod audit_step;
mod irp5;
mod risk;
mod tax;

pub use audit_step::AuditStep;
pub use irp5::{DocumentSource, Irp5Data};
pub use risk::{AnomalyFlag, AuditRiskFactors, AuditRiskResult, FlagType, RiskLevel, Severity};
pub use tax::{DEFAULT_AGE, RefundDetermination, TaxCalculationInput, TaxCalculationResult};
