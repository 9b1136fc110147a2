use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveDateTime};

use vrcshot_engine::PhotoGroup;
use vrcshot_types::format_store_timestamp;

/// Parse a window bound: either a full `YYYY-MM-DD HH:MM:SS` timestamp or a
/// bare date. A bare date means start-of-day for `--since` and end-of-day for
/// `--until`.
pub fn parse_window_bound(raw: &str, end_of_day: bool) -> Result<NaiveDateTime> {
    if let Ok(ts) = vrcshot_types::parse_store_timestamp(raw) {
        return Ok(ts);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let ts = if end_of_day {
            date.and_hms_opt(23, 59, 59)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        return Ok(ts.expect("constant time components are valid"));
    }
    bail!("Invalid time \"{}\": expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS", raw);
}

pub fn render_groups_plain(groups: &[PhotoGroup]) {
    if groups.is_empty() {
        println!("No sessions or photos in this window.");
        return;
    }

    for group in groups {
        match &group.session {
            None => println!("(no session)  {} photo(s)", group.photos.len()),
            Some(session) => {
                let name = session
                    .world_name
                    .clone()
                    .unwrap_or_else(|| session.world_id.to_string());
                let instance = session
                    .instance_id
                    .as_ref()
                    .map(|i| format!(" #{}", i.as_str()))
                    .unwrap_or_default();
                println!(
                    "{}  {}{}  {} photo(s)",
                    format_store_timestamp(session.joined_at),
                    name,
                    instance,
                    group.photos.len()
                );
            }
        }
        for photo in &group.photos {
            println!(
                "    {}  {}x{}  {}",
                format_store_timestamp(photo.taken_at),
                photo.width,
                photo.height,
                photo.photo_path
            );
        }
    }
}

pub fn render_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_bound_full_timestamp() {
        let ts = parse_window_bound("2024-01-15 10:00:00", false).unwrap();
        assert_eq!(format_store_timestamp(ts), "2024-01-15 10:00:00");
    }

    #[test]
    fn test_parse_window_bound_bare_date() {
        let since = parse_window_bound("2024-01-15", false).unwrap();
        assert_eq!(format_store_timestamp(since), "2024-01-15 00:00:00");

        let until = parse_window_bound("2024-01-15", true).unwrap();
        assert_eq!(format_store_timestamp(until), "2024-01-15 23:59:59");
    }

    #[test]
    fn test_parse_window_bound_rejects_garbage() {
        assert!(parse_window_bound("yesterday", false).is_err());
        assert!(parse_window_bound("2024-13-01", false).is_err());
    }
}
