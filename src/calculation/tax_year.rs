//! Tax year resolution.
//!
//! South African tax years run from 1 March to the end of February. A tax
//! year is labelled by the calendar year in which it ends, so the year from
//! 1 March 2025 to 28 February 2026 is labelled 2026 and displayed "2025/26".

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Returns the label of the tax year containing `reference_date`.
///
/// # Examples
///
/// ```
/// use sa_tax_engine::calculation::current_tax_year;
/// use chrono::NaiveDate;
///
/// let feb = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
/// assert_eq!(current_tax_year(feb), 2026);
///
/// let march = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(current_tax_year(march), 2027);
/// ```
pub fn current_tax_year(reference_date: NaiveDate) -> i32 {
    if reference_date.month() <= 2 {
        reference_date.year()
    } else {
        reference_date.year() + 1
    }
}

/// Renders a tax year label as `YYYY/YY`.
///
/// # Examples
///
/// ```
/// use sa_tax_engine::calculation::format_tax_year;
///
/// assert_eq!(format_tax_year(2026), "2025/26");
/// assert_eq!(format_tax_year(2000), "1999/00");
/// ```
pub fn format_tax_year(label: i32) -> String {
    format!("{}/{:02}", label - 1, label.rem_euclid(100))
}

/// The first and last day of a tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearWindow {
    /// 1 March of the preceding calendar year.
    pub start: NaiveDate,
    /// Last day of February of the label year.
    pub end: NaiveDate,
}

impl TaxYearWindow {
    /// Returns true if `date` falls within the tax year.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Returns the date window for a tax year label.
///
/// Returns `None` only for labels outside chrono's representable range.
pub fn tax_year_window(label: i32) -> Option<TaxYearWindow> {
    let start = NaiveDate::from_ymd_opt(label - 1, 3, 1)?;
    let end = NaiveDate::from_ymd_opt(label, 3, 1)?.pred_opt()?;
    Some(TaxYearWindow { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_january_and_february_belong_to_current_year() {
        assert_eq!(current_tax_year(date(2026, 1, 1)), 2026);
        assert_eq!(current_tax_year(date(2026, 2, 28)), 2026);
        assert_eq!(current_tax_year(date(2024, 2, 29)), 2024);
    }

    #[test]
    fn test_march_onwards_belongs_to_next_year() {
        assert_eq!(current_tax_year(date(2025, 3, 1)), 2026);
        assert_eq!(current_tax_year(date(2025, 7, 15)), 2026);
        assert_eq!(current_tax_year(date(2025, 12, 31)), 2026);
    }

    #[test]
    fn test_format_tax_year() {
        assert_eq!(format_tax_year(2026), "2025/26");
        assert_eq!(format_tax_year(2010), "2009/10");
        assert_eq!(format_tax_year(2000), "1999/00");
    }

    #[test]
    fn test_window_for_leap_year() {
        let window = tax_year_window(2024).unwrap();
        assert_eq!(window.start, date(2023, 3, 1));
        assert_eq!(window.end, date(2024, 2, 29));
    }

    #[test]
    fn test_window_for_regular_year() {
        let window = tax_year_window(2026).unwrap();
        assert_eq!(window.start, date(2025, 3, 1));
        assert_eq!(window.end, date(2026, 2, 28));
    }

    #[test]
    fn test_window_contains_agrees_with_current_tax_year() {
        let window = tax_year_window(2026).unwrap();
        for d in [date(2025, 2, 28), date(2025, 3, 1), date(2026, 2, 28), date(2026, 3, 1)] {
            assert_eq!(window.contains(d), current_tax_year(d) == 2026, "{}", d);
        }
    }
}
