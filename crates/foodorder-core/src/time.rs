use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use thiserror::Error;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 14] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %I:%M:%S %p",
    "%Y/%m/%d %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("timestamp cannot be empty")]
    Empty,
    #[error("invalid zone offset: {0}")]
    InvalidOffset(String),
    #[error("unrecognized date format: {0}")]
    Unrecognized(String),
}

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

/// Parses an order timestamp as exported by form tools into unix seconds.
///
/// Values without zone information are read as UTC. A trailing zone label
/// (`GMT+2`, `UTC-05:30`, `EET`) is accepted; only GMT/UTC labels carry an
/// offset, other labels are ignored.
pub fn parse_order_timestamp(input: &str) -> Result<i64, TimeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    if let Some(millis) = parse_epoch_millis(trimmed) {
        return Ok(millis.div_euclid(1000));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp());
    }

    let (body, offset) = split_zone_label(trimmed)?;

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(body, fmt) {
            return Ok(naive.and_utc().timestamp() - i64::from(offset.local_minus_utc()));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(body, fmt) {
            let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
            return Ok(naive.and_utc().timestamp() - i64::from(offset.local_minus_utc()));
        }
    }

    Err(TimeParseError::Unrecognized(trimmed.to_string()))
}

pub fn format_order_date(ts: i64) -> String {
    to_datetime(ts).format("%b %-d, %Y").to_string()
}

pub fn format_order_datetime(ts: i64) -> String {
    to_datetime(ts).format("%d/%m/%Y %H:%M").to_string()
}

fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

fn parse_epoch_millis(value: &str) -> Option<i64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn split_zone_label(value: &str) -> Result<(&str, FixedOffset), TimeParseError> {
    let utc = Utc.fix();
    let Some((body, label)) = value.rsplit_once(' ') else {
        return Ok((value, utc));
    };

    let upper = label.to_ascii_uppercase();
    for prefix in ["GMT", "UTC"] {
        if let Some(rest) = upper.strip_prefix(prefix) {
            return Ok((body.trim_end(), parse_offset(rest, label)?));
        }
    }

    let is_zone_abbreviation = (2..=5).contains(&label.len())
        && label.chars().all(|ch| ch.is_ascii_uppercase())
        && upper != "AM"
        && upper != "PM";
    if is_zone_abbreviation {
        return Ok((body.trim_end(), utc));
    }

    Ok((value, utc))
}

fn parse_offset(raw: &str, label: &str) -> Result<FixedOffset, TimeParseError> {
    let invalid = || TimeParseError::InvalidOffset(label.to_string());
    if raw.is_empty() {
        return Ok(Utc.fix());
    }

    let (sign, digits) = if let Some(rest) = raw.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = raw.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    if !digits.chars().all(|ch| ch.is_ascii_digit() || ch == ':') {
        return Err(invalid());
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
