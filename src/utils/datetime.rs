use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as stored in the database. Fixed precision keeps text order
/// identical to chronological order.
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Day-level rendering for chat messages; falls back to the raw value.
pub fn format_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}
