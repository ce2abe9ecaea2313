//! Lenient calendar-date parsing for the report `Date` column.
//!
//! Dates arrive as spreadsheet-native values (converted to ISO text by the
//! loader) or as whatever a person typed. Anything that matches none of the
//! known layouts is treated as absent.

use chrono::NaiveDate;

/// Layouts tried against the whole value.
const WHOLE_VALUE_FORMATS: &[&str] = &["%B %d, %Y", "%d %B %Y", "%d-%b-%Y"];

/// Layouts tried against the leading date token (any time part removed).
/// Two-digit years come first so `1/5/24` is not read as year 24.
const DATE_TOKEN_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses a date, ignoring any trailing time of day.
///
/// Accepts `2024-01-15`, `2024-01-15 00:00:00`, `2024-01-15T14:30:00.000`,
/// `1/15/2024`, `1/15/24 3:45 PM`, `2024/01/15`, `January 15, 2024` and
/// `15-Jan-2024`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for format in WHOLE_VALUE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    let token = value.split_whitespace().next()?;
    let token = token.split_once('T').map_or(token, |(date, _)| date);

    DATE_TOKEN_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates_and_datetimes() {
        assert_eq!(parse_date("2024-01-15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15 00:00:00"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15T14:30:00.000"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn parses_us_dates() {
        assert_eq!(parse_date("1/15/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("01/05/24"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("1/15/2024 3:45 PM"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn parses_month_names() {
        assert_eq!(parse_date("January 15, 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("15-Jan-2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("last tuesday"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }
}
