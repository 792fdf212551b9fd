use chrono::{Datelike, NaiveDate};

/// Display format for stored dates, e.g. `"2024-09-01"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Calendar-event format without zero padding, e.g. `"2024, 9, 1"`.
pub fn format_calendar_date(date: NaiveDate) -> String {
    format!("{}, {}, {}", date.year(), date.month(), date.day())
}
