//! Lenient coercion of query-string values.
//!
//! Query parameters arrive as strings. List endpoints never reject a request
//! over a malformed `page`, `limit`, or filter value; a value that fails to
//! parse deserializes as `None` and the caller's default applies.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Deserializes an optional string into an optional i64, treating empty or
/// non-numeric input as absent.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse::<i64>().ok()))
}

/// Deserializes an optional `YYYY-MM-DD` string into an optional date,
/// treating empty or malformed input as absent.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}
