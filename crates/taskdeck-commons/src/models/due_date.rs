//! Wire format of the optional `dueDate` field.
//!
//! Browsers post the raw value of a date input, so besides RFC 3339 the
//! field accepts a bare `YYYY-MM-DD` (midnight UTC) and treats an empty
//! string like `null`.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

/// Parses a non-empty due date value.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// `deserialize_with` target for `Option<DateTime<Utc>>` due dates.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_due_date(value).map(Some).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid due date '{}', expected YYYY-MM-DD or an RFC 3339 timestamp",
                value
            ))
        }),
    }
}
