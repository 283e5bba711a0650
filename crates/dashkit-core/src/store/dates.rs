//! Date rehydration for stored collections.
//!
//! Stored dates are strings. Both RFC 3339 timestamps (what a browser writes
//! for a `Date`) and bare `YYYY-MM-DD` calendar dates are accepted; output is
//! RFC 3339 in UTC with only as many fractional digits as the value needs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Parse a stored or user-entered date.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a date for storage.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Midnight UTC on the given calendar day (epoch if the day is invalid).
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

/// `#[serde(with = "crate::store::date")]` for required date fields.
pub mod date {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw)))
    }
}

/// `#[serde(with = "crate::store::option_date")]` for optional date fields.
pub mod option_date {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&super::format_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_browser_timestamp() {
        let date = parse_date("2024-01-15T00:00:00.000Z").unwrap();
        assert_eq!(date, ymd(2024, 1, 15));
    }

    #[test]
    fn test_parse_calendar_date() {
        let date = parse_date("1985-05-15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1985, 5, 15));
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn test_parse_offset_timestamp() {
        let date = parse_date("2024-03-01T10:30:00+01:00").unwrap();
        assert_eq!(date.hour(), 9);
    }

    #[test]
    fn test_parse_datetime_local_input() {
        let date = parse_date("2024-03-01T10:30").unwrap();
        assert_eq!((date.hour(), date.minute()), (10, 30));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_date("").is_none());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("2024-13-40").is_none());
    }

    #[test]
    fn test_format_roundtrip_keeps_precision() {
        let now = Utc::now();
        assert_eq!(parse_date(&format_date(&now)), Some(now));
    }

    #[test]
    fn test_format_whole_seconds() {
        assert_eq!(format_date(&ymd(2024, 1, 15)), "2024-01-15T00:00:00Z");
    }
}
