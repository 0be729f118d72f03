use chrono::NaiveDate;
use anyhow::{anyhow, Result};

pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Separator between the two dates of a range label (en dash).
pub const RANGE_SEPARATOR: char = '\u{2013}';

/// Parses `DD.MM.YYYY`. Day and month may also be written with a single digit;
/// the year always has four digits.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }
    let year = input.rsplit('.').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(anyhow!("Year must have four digits: '{}'", input));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|e| anyhow!("Could not parse date '{}': {}", input, e))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn date_range_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{}{}{}", format_date(start), RANGE_SEPARATOR, format_date(end))
}
