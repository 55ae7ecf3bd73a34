use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use super::WireError;

/// A timestamp as the service sends it: UNIX seconds (integral or fractional)
/// or text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Unix(i64),
    Fractional(f64),
    Text(String),
}

impl WireTimestamp {
    pub fn to_datetime(&self, field: &'static str) -> Result<DateTime<Utc>, WireError> {
        let parsed = match self {
            WireTimestamp::Unix(secs) => Utc.timestamp_opt(*secs, 0).single(),
            WireTimestamp::Fractional(secs) => from_fractional_secs(*secs),
            WireTimestamp::Text(text) => parse_text_timestamp(text),
        };
        parsed.ok_or_else(|| WireError::Timestamp {
            field,
            value: self.describe(),
        })
    }

    fn describe(&self) -> String {
        match self {
            WireTimestamp::Unix(secs) => secs.to_string(),
            WireTimestamp::Fractional(secs) => secs.to_string(),
            WireTimestamp::Text(text) => text.clone(),
        }
    }
}

fn from_fractional_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let millis = (secs * 1000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Parses the textual timestamp forms seen on the wire and in the create form.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (read as UTC), a naive
/// `YYYY-MM-DD HH:MM:SS`, and a bare `YYYY-MM-DD` (midnight UTC). Digit-only
/// strings are treated as UNIX seconds.
pub fn parse_text_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
    }
    None
}
