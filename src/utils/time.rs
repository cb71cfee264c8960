//! Time utilities

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// `2023-11-14T22:13:20.000Z`
pub fn iso8601(ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parses an RFC 3339 datetime into milliseconds
pub fn parse8601(datetime: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(datetime)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// `20230929` -> midnight UTC of that day, in milliseconds
pub fn parse_yyyymmdd(date: &str) -> Option<i64> {
    NaiveDate::parse_from_str(date, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Timestamp format used by HTX request signing, `2017-05-11T15:19:30`
pub fn signature_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S").to_string()
}
