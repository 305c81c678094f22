//! Project-specific utilities live here.

use chrono::NaiveDate;

/// Formats a shared log prefix for project logs.
pub fn log_prefix(module: &str) -> String {
    format!("project::{module}")
}

/// Medium date format, e.g. `Oct 15, 2026`.
pub fn format_date_med(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `YYYY-MM-DD`, the value format of an `<input type="date">`.
pub fn format_date_input(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an ISO-8601 calendar date. Accepts a trailing time part
/// (`2026-10-15T00:00:00Z`) and keeps only the date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.split_once('T').map_or(value, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Generate a new document identifier.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_format_has_no_day_padding() {
        let date = NaiveDate::from_ymd_opt(1920, 1, 2).unwrap();
        assert_eq!(format_date_med(date), "Jan 2, 1920");
        assert_eq!(format_date_input(date), "1920-01-02");
    }

    #[test]
    fn iso_dates_parse_with_or_without_time() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 15);
        assert_eq!(parse_iso_date("2026-10-15"), expected);
        assert_eq!(parse_iso_date("2026-10-15T08:30:00Z"), expected);
        assert_eq!(parse_iso_date("15/10/2026"), None);
        assert_eq!(parse_iso_date("2026-02-30"), None);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
