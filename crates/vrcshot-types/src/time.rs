use chrono::NaiveDateTime;

use crate::{Error, Result};

/// Timestamp format used inside VRChat log lines (local wall-clock time)
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Timestamp format used in the derived store and export surfaces
pub const STORE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse the `yyyy.MM.dd HH:mm:ss` prefix of a log line.
///
/// Malformed timestamps (including impossible dates) are rejected so a bad
/// line never degrades to an epoch default downstream.
pub fn parse_log_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, LOG_TIMESTAMP_FORMAT)
        .map_err(|_| Error::Timestamp(raw.to_string()))
}

pub fn parse_store_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, STORE_TIMESTAMP_FORMAT)
        .map_err(|_| Error::Timestamp(raw.to_string()))
}

pub fn format_store_timestamp(ts: NaiveDateTime) -> String {
    ts.format(STORE_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_parse_log_timestamp() {
        let ts = parse_log_timestamp("2024.01.15 10:00:00").unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_log_timestamp_rejects_impossible_dates() {
        assert!(parse_log_timestamp("2024.13.15 10:00:00").is_err());
        assert!(parse_log_timestamp("2024.01.15 25:00:00").is_err());
        assert!(parse_log_timestamp("garbage").is_err());
    }

    #[test]
    fn test_store_format_round_trip() {
        let ts = parse_log_timestamp("2024.01.15 10:15:30").unwrap();
        let stored = format_store_timestamp(ts);
        assert_eq!(stored, "2024-01-15 10:15:30");
        assert_eq!(parse_store_timestamp(&stored).unwrap(), ts);
    }
}
