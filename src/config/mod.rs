//! Tax-year tables and their loading.
//!
//! Brackets, rebates, deduction caps and credit rates change every tax year,
//! so they live in YAML files rather than in code. Each file deserializes
//! into a [`TaxYearConfig`]; the [`ConfigLoader`] reads a directory of them.
//!
//! # Example
//!
//! ```no_run
//! use sa_tax_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/sars").unwrap();
//! println!("Loaded tax years: {:?}", loader.tax_years());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{MedicalCreditRates, Rebates, RetirementCap, TaxBracket, TaxYearConfig, UifConfig};
