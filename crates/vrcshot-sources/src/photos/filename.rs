use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Metadata carried by a screenshot filename.
///
/// The filename is the only authoritative source for the capture time;
/// filesystem mtimes do not survive copies and cloud sync. Millisecond
/// precision in the name is collapsed to seconds, matching log precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoMeta {
    pub taken_at: NaiveDateTime,
    pub width: u32,
    pub height: u32,
}

// Current grammar: VRChat_2024-01-15_10-15-30.123_1920x1080.png
static PHOTO_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^VRChat_(\d{4}-\d{2}-\d{2})_(\d{2}-\d{2}-\d{2})\.\d{3}_(\d+)x(\d+)\.(?i:png|jpe?g|webp)$",
    )
    .expect("static pattern")
});

// Pre-2023.4 grammar put the resolution first: VRChat_1920x1080_2022-11-02_20-01-30.123.png
static PHOTO_NAME_LEGACY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^VRChat_(\d+)x(\d+)_(\d{4}-\d{2}-\d{2})_(\d{2}-\d{2}-\d{2})\.\d{3}\.(?i:png|jpe?g|webp)$",
    )
    .expect("static pattern")
});

/// Parse a screenshot filename. Non-matching names (including matching shapes
/// with impossible dates) return `None`; they are skipped, not errors.
pub fn parse_photo_file_name(name: &str) -> Option<PhotoMeta> {
    let (date, time, width, height) = if let Some(caps) = PHOTO_NAME.captures(name) {
        (
            caps[1].to_string(),
            caps[2].to_string(),
            caps[3].to_string(),
            caps[4].to_string(),
        )
    } else if let Some(caps) = PHOTO_NAME_LEGACY.captures(name) {
        (
            caps[3].to_string(),
            caps[4].to_string(),
            caps[1].to_string(),
            caps[2].to_string(),
        )
    } else {
        return None;
    };

    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(&time, "%H-%M-%S").ok()?;
    let width: u32 = width.parse().ok()?;
    let height: u32 = height.parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }

    Some(PhotoMeta {
        taken_at: date.and_time(time),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrcshot_types::parse_store_timestamp;

    #[test]
    fn test_current_grammar() {
        let meta = parse_photo_file_name("VRChat_2024-01-15_10-15-30.123_1920x1080.png").unwrap();
        assert_eq!(
            meta.taken_at,
            parse_store_timestamp("2024-01-15 10:15:30").unwrap()
        );
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
    }

    #[test]
    fn test_legacy_grammar() {
        let meta = parse_photo_file_name("VRChat_1920x1080_2022-11-02_20-01-30.456.png").unwrap();
        assert_eq!(
            meta.taken_at,
            parse_store_timestamp("2022-11-02 20:01:30").unwrap()
        );
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
    }

    #[test]
    fn test_extension_case_and_variants() {
        assert!(parse_photo_file_name("VRChat_2024-01-15_10-15-30.123_1920x1080.PNG").is_some());
        assert!(parse_photo_file_name("VRChat_2024-01-15_10-15-30.123_1920x1080.jpeg").is_some());
        assert!(parse_photo_file_name("VRChat_2024-01-15_10-15-30.123_1920x1080.webp").is_some());
    }

    #[test]
    fn test_non_matching_names_are_skipped() {
        assert!(parse_photo_file_name("IMG_20240115_101530.png").is_none());
        assert!(parse_photo_file_name("VRChat_2024-01-15_10-15-30_1920x1080.png").is_none());
        assert!(parse_photo_file_name("VRChat_2024-01-15_10-15-30.123_1920x1080.png.bak").is_none());
        assert!(parse_photo_file_name("").is_none());
    }

    #[test]
    fn test_impossible_date_is_skipped() {
        assert!(parse_photo_file_name("VRChat_2024-02-30_10-15-30.123_1920x1080.png").is_none());
        assert!(parse_photo_file_name("VRChat_2024-01-15_25-15-30.123_1920x1080.png").is_none());
    }

    #[test]
    fn test_zero_dimensions_are_skipped() {
        assert!(parse_photo_file_name("VRChat_2024-01-15_10-15-30.123_0x1080.png").is_none());
    }
}
