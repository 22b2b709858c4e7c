//! Date extraction for Brazilian documents (`DD/MM/YYYY`, `DD/MM/YY`).

use chrono::{Datelike, Local, NaiveDate};

use super::patterns::DATE_DMY;
use super::FieldExtractor;

/// Date field extractor.
pub struct DateExtractor {
    current_year: i32,
}

impl DateExtractor {
    /// Extractor pivoting two-digit years against the current year.
    pub fn new() -> Self {
        Self::with_current_year(Local::now().year())
    }

    /// Extractor pivoting two-digit years against `current_year`.
    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year = resolve_year(&caps[3], self.current_year);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                results.push(date);
            }
        }

        results
    }
}

/// Parse a date string as `DD/MM/YYYY` or `DD/MM/YY` ('.' and '-' are
/// accepted as separators). Invalid calendar dates yield `None`.
pub fn parse_br_date(value: &str) -> Option<NaiveDate> {
    parse_br_date_with_year(value, Local::now().year())
}

/// [`parse_br_date`] with an explicit pivot year.
pub fn parse_br_date_with_year(value: &str, current_year: i32) -> Option<NaiveDate> {
    let cleaned = value.trim().replace(['-', '.'], "/");
    let mut parts = cleaned.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let valid_len = |s: &str, lens: &[usize]| {
        lens.contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
    };
    if !valid_len(day, &[1, 2]) || !valid_len(month, &[1, 2]) || !valid_len(year, &[2, 4]) {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(resolve_year(year, current_year), month, day)
}

/// ISO form ("2024-05-10") of a parsed date string.
pub fn normalize_date(value: &str) -> Option<String> {
    parse_br_date(value).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Two-digit years up to the current year's last two digits are taken as
/// 20xx, later ones as 19xx.
fn resolve_year(s: &str, current_year: i32) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() > 2 {
        return year;
    }
    if year <= current_year.rem_euclid(100) {
        2000 + year
    } else {
        1900 + year
    }
}
