use chrono::{Datelike, NaiveDateTime};
use std::path::PathBuf;

const FILE_PREFIX: &str = "logstore-";
const FILE_EXT: &str = ".txt";

/// Calendar month a partition file covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Partition file name, e.g. `logstore-2024-01.txt`.
    ///
    /// This name (and the line-per-raw-line body) is the export/import payload
    /// format and must stay byte-compatible across versions.
    pub fn file_name(&self) -> String {
        format!("{}{:04}-{:02}{}", FILE_PREFIX, self.year, self.month, FILE_EXT)
    }

    pub fn parse_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_EXT)?;
        let (year, month) = stem.split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }
}

/// A partition file on disk
#[derive(Debug, Clone)]
pub struct PartitionFile {
    pub month: MonthKey,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrcshot_types::parse_log_timestamp;

    #[test]
    fn test_month_key_from_timestamp() {
        let ts = parse_log_timestamp("2024.01.15 10:00:00").unwrap();
        let key = MonthKey::from_timestamp(ts);
        assert_eq!(key, MonthKey { year: 2024, month: 1 });
    }

    #[test]
    fn test_file_name_round_trip() {
        let key = MonthKey { year: 2024, month: 9 };
        assert_eq!(key.file_name(), "logstore-2024-09.txt");
        assert_eq!(MonthKey::parse_file_name("logstore-2024-09.txt"), Some(key));
    }

    #[test]
    fn test_parse_file_name_rejects_foreign_files() {
        assert!(MonthKey::parse_file_name("config.toml").is_none());
        assert!(MonthKey::parse_file_name("logstore-2024-13.txt").is_none());
        assert!(MonthKey::parse_file_name("logstore-2024.txt").is_none());
    }

    #[test]
    fn test_month_keys_order_chronologically() {
        let a = MonthKey { year: 2023, month: 12 };
        let b = MonthKey { year: 2024, month: 1 };
        let c = MonthKey { year: 2024, month: 2 };
        assert!(a < b && b < c);
    }
}
