use chrono::{DateTime, Local, Utc};

use crate::settings::Timezone;

/// Format a signed change: `+3`, `-3`, `0`.
pub fn signed_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Display value for a `modified` row: the new absolute quantity followed by
/// the change from the previous running quantity, e.g. `7 (-3)`.
pub fn modified_display(current: i64, delta: i64) -> String {
    format!("{current} ({})", signed_delta(delta))
}

/// Render unix seconds as a date-time string. Out-of-range values fall back
/// to the raw number.
pub fn timestamp(secs: i64, tz: Timezone) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp(secs, 0) else {
        return secs.to_string();
    };
    match tz {
        Timezone::Utc => utc.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        Timezone::Local => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_delta() {
        assert_eq!(signed_delta(3), "+3");
        assert_eq!(signed_delta(-3), "-3");
        assert_eq!(signed_delta(0), "0");
    }

    #[test]
    fn test_modified_display() {
        assert_eq!(modified_display(7, -3), "7 (-3)");
        assert_eq!(modified_display(12, 2), "12 (+2)");
        assert_eq!(modified_display(5, 0), "5 (0)");
    }

    #[test]
    fn test_timestamp_utc() {
        assert_eq!(timestamp(0, Timezone::Utc), "1970-01-01 00:00:00 UTC");
        assert_eq!(timestamp(1_700_000_000, Timezone::Utc), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_timestamp_out_of_range() {
        assert_eq!(timestamp(i64::MAX, Timezone::Utc), i64::MAX.to_string());
    }
}
