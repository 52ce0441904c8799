//! Error types for the tax engine.
//!
//! The calculation functions are total over sanitized input and never fail;
//! only loading and validating tax-year tables can produce an [`EngineError`].

use thiserror::Error;

/// The main error type for the tax engine.
///
/// # Example
///
/// ```
/// use sa_tax_engine::error::EngineError;
///
/// let error = EngineError::TaxYearNotFound { tax_year: 2031 };
/// assert_eq!(error.to_string(), "No tax tables configured for tax year 2031");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No tables are loaded for the requested tax year.
    #[error("No tax tables configured for tax year {tax_year}")]
    TaxYearNotFound {
        /// The tax year label that was requested (e.g. 2026 for 2025/26).
        tax_year: i32,
    },

    /// A tax-year table parsed but failed validation.
    #[error("Invalid tax tables for tax year {tax_year}: {message}")]
    InvalidConfig {
        /// The tax year label of the offending table.
        tax_year: i32,
        /// A description of what is wrong with the table.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
