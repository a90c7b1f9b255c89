//! Timestamp, date and period parsing used by type inference.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Parses a timestamp in any of the accepted formats.
///
/// Offsets are dropped after parsing: the wall-clock time in the source's own
/// offset is kept, which is what the event feed reports. Date-only values
/// parse as midnight.
pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(dt) = try_parse_offset_datetime(value) {
        return Some(dt);
    }
    if let Some(dt) = try_parse_datetime(value) {
        return Some(dt);
    }
    try_parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Year of a value on the year path: a bare `YYYY`, or any parsable date or
/// timestamp.
pub(crate) fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().ok();
    }
    if let Some(dt) = parse_timestamp(value) {
        return Some(dt.year());
    }
    // `YYYY-MM`
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Renders a `YYYYMmm` value as `YYYY-MM`.
///
/// Every `M` is stripped before the remaining `YYYYMM` digits are parsed.
pub(crate) fn parse_marked_year_month(value: &str) -> Option<String> {
    let digits: String = value.trim().chars().filter(|c| *c != 'M').collect();
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: u32 = digits[4..].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(format!("{}-{}", &digits[..4], &digits[4..]))
}

/// Whether a value is already in the `YYYY-MM` output form.
pub(crate) fn is_canonical_year_month(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
        && value[5..]
            .parse::<u32>()
            .is_ok_and(|month| (1..=12).contains(&month))
}

fn try_parse_offset_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%d %H:%M:%S %:z", // 2024-01-05 8:30:00 +01:00
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
    ];
    for fmt in &formats {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.naive_local());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    None
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%d.%m.%Y",
        "%Y%m%d",
        "%d %b %Y",
        "%d %B %Y",
    ];
    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }
    None
}
