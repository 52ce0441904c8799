//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax-year
//! tables from YAML files.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::calculation::current_tax_year;
use crate::error::{EngineError, EngineResult};

use super::types::TaxYearConfig;

/// The 2025/26 tables compiled into the crate.
const BUILTIN_TABLES: &str = include_str!("../../config/sars/2026.yaml");

/// Loads and provides access to per-year tax tables.
///
/// Every `*.yaml` file in the configuration directory holds one
/// [`TaxYearConfig`]. Tables are validated on load and are read-only
/// afterwards.
///
/// # Directory Structure
///
/// ```text
/// config/sars/
/// ├── 2025.yaml   # 2024/25 tax year
/// └── 2026.yaml   # 2025/26 tax year
/// ```
///
/// # Example
///
/// ```no_run
/// use sa_tax_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sars").unwrap();
/// let tables = loader.for_tax_year(2026).unwrap();
/// println!("Primary rebate: R{}", tables.rebates.primary);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    years: BTreeMap<i32, TaxYearConfig>,
}

impl ConfigLoader {
    /// Loads every tax-year table from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The directory is missing or contains no YAML files
    /// - Any file contains invalid YAML
    /// - Any table fails [`TaxYearConfig::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tables = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", dir_str),
            });
        }

        let loader = Self::from_tables(tables)?;
        info!(
            path = %dir_str,
            tax_years = ?loader.tax_years(),
            "Loaded tax tables"
        );
        Ok(loader)
    }

    /// Builds a loader from the 2025/26 tables embedded in the crate.
    pub fn builtin() -> EngineResult<Self> {
        let table = Self::parse_yaml(BUILTIN_TABLES, "<builtin>/2026.yaml")?;
        Self::from_tables(vec![table])
    }

    /// Builds a loader from tables constructed in code.
    ///
    /// Each table is validated. A later table replaces an earlier one with
    /// the same tax year. At least one table is required.
    pub fn from_tables(tables: Vec<TaxYearConfig>) -> EngineResult<Self> {
        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: "(no tax year tables provided)".to_string(),
            });
        }

        let mut years = BTreeMap::new();
        for table in tables {
            table.validate()?;
            years.insert(table.tax_year, table);
        }
        Ok(Self { years })
    }

    fn load_yaml(path: &Path) -> EngineResult<TaxYearConfig> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml(content: &str, path: &str) -> EngineResult<TaxYearConfig> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the tables for a tax year label (e.g. 2026 for 2025/26).
    pub fn for_tax_year(&self, tax_year: i32) -> EngineResult<&TaxYearConfig> {
        self.years
            .get(&tax_year)
            .ok_or(EngineError::TaxYearNotFound { tax_year })
    }

    /// Returns the tables for the tax year containing `date`.
    pub fn for_date(&self, date: NaiveDate) -> EngineResult<&TaxYearConfig> {
        self.for_tax_year(current_tax_year(date))
    }

    /// Returns the most recent tax year's tables.
    pub fn latest(&self) -> &TaxYearConfig {
        // from_tables rejects an empty table list
        self.years
            .values()
            .next_back()
            .expect("ConfigLoader always holds at least one tax year")
    }

    /// Returns the loaded tax year labels in ascending order.
    pub fn tax_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}
