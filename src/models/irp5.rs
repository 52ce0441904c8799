//! IRP5 employee tax certificate record.
//!
//! The record is produced by an upstream extraction step (PDF parsing, OCR
//! or manual entry) and consumed by the anomaly detector and risk scorer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::non_negative;

/// How the IRP5 figures were captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    /// Extracted from a digital PDF certificate.
    Pdf,
    /// Extracted from a scanned image via OCR.
    Ocr,
    /// Typed in by the taxpayer.
    #[default]
    Manual,
}

/// Figures from an IRP5 certificate for one tax year.
///
/// Money fields should be non-negative; use [`Irp5Data::sanitized`] to
/// clamp anything the extraction step got wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Irp5Data {
    /// Gross remuneration (code 3699).
    pub gross_remuneration: Decimal,
    /// PAYE withheld by the employer (code 4102).
    pub paye_withheld: Decimal,
    /// UIF contributions (code 4141).
    #[serde(default)]
    pub uif_contrib: Decimal,
    /// Retirement fund contributions (code 4001).
    #[serde(default)]
    pub retirement_fund: Decimal,
    /// Medical scheme contributions (code 4005).
    #[serde(default)]
    pub medical_scheme: Decimal,
    /// Travel allowance (code 3701).
    #[serde(default)]
    pub travel_allowance: Decimal,
    /// Medical scheme fees tax credits (code 4116).
    #[serde(default)]
    pub medical_credits: Decimal,
    /// Tax year label (calendar year in which the tax year ends).
    #[serde(default)]
    pub tax_year: i32,
    /// How the figures were captured.
    #[serde(default)]
    pub source: DocumentSource,
    /// When the certificate was uploaded.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Extraction confidence in `[0, 1]`, if known.
    #[serde(default)]
    pub confidence: Option<Decimal>,
}

impl Irp5Data {
    /// Returns a copy with every negative money field clamped to zero.
    ///
    /// Each clamped field is logged at `warn` level.
    ///
    /// # Example
    ///
    /// ```
    /// use sa_tax_engine::models::Irp5Data;
    /// use rust_decimal::Decimal;
    ///
    /// let data = Irp5Data {
    ///     gross_remuneration: Decimal::from(-5),
    ///     ..Default::default()
    /// };
    /// assert_eq!(data.sanitized().gross_remuneration, Decimal::ZERO);
    /// ```
    pub fn sanitized(&self) -> Self {
        Self {
            gross_remuneration: non_negative("gross_remuneration", self.gross_remuneration),
            paye_withheld: non_negative("paye_withheld", self.paye_withheld),
            uif_contrib: non_negative("uif_contrib", self.uif_contrib),
            retirement_fund: non_negative("retirement_fund", self.retirement_fund),
            medical_scheme: non_negative("medical_scheme", self.medical_scheme),
            travel_allowance: non_negative("travel_allowance", self.travel_allowance),
            medical_credits: non_negative("medical_credits", self.medical_credits),
            confidence: self
                .confidence
                .map(|c| c.max(Decimal::ZERO).min(Decimal::ONE)),
            ..self.clone()
        }
    }
}
