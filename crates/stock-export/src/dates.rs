use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Move a `YYYY-MM-DD` date that falls on a weekend to the following Monday.
///
/// Parseable dates come back zero-padded; anything else is returned unchanged.
pub fn adjust_weekend_to_monday(date: &str) -> String {
    let Ok(day) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") else {
        return date.to_string();
    };
    let shift = match day.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    day.checked_add_days(Days::new(shift))
        .map(|monday| monday.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| date.to_string())
}
