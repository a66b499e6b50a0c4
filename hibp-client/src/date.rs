//! Tolerant date decoding for breach and paste records.
//!
//! The service has emitted both full timestamps (`2018-06-05T00:00:00Z`) and
//! plain calendar dates (`2018-06-05`) for its date fields. Parsers are tried
//! in the order of [`DATE_PARSERS`]; plain dates are midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

pub type DateParser = fn(&str) -> Option<DateTime<Utc>>;

/// Parse attempts, in order.
pub const DATE_PARSERS: &[DateParser] = &[parse_timestamp, parse_calendar_date];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error parsing '{0}'")]
pub struct DateParseError(pub String);

pub fn parse_date(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    DATE_PARSERS
        .iter()
        .find_map(|parse| parse(value))
        .ok_or_else(|| DateParseError(value.to_owned()))
}

/// RFC 3339 timestamp with a zone designator.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value).ok().map(|date| date.with_timezone(&Utc))
}

/// `YYYY-MM-DD`, interpreted as midnight UTC.
pub fn parse_calendar_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// Serde adapter for a required date field.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date(&value).map_err(serde::de::Error::custom)
}

/// Serde adapter for an optional (nullable) date field.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_date(&value).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
