use once_cell::sync::Lazy;
use regex::Regex;

use vrcshot_types::{
    InstanceId, LogEvent, PlayerId, PlayerName, WorldId, parse_log_timestamp,
};

// NOTE: Matching Policy
//
// VRChat logs are mostly engine noise; only four line shapes matter here.
// Anything else, including new shapes introduced by a game update, must
// degrade to None, never to an error. Matching is anchored on the
// `[Behaviour]` tag that the networking layer stamps on the lines we care
// about, which keeps e.g. a chat message containing "Joining wrld_..."
// from being misread.

static WORLD_JOIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[Behaviour\] Joining (wrld_[0-9A-Fa-f-]+)(?::(\S+))?\s*$")
        .expect("static pattern")
});

static ROOM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[Behaviour\] Joining or Creating Room: (.+)$").expect("static pattern")
});

static PLAYER_JOIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[Behaviour\] OnPlayerJoined (.+?)(?: \((usr_[0-9A-Fa-f-]+)\))?\s*$")
        .expect("static pattern")
});

static PLAYER_LEAVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[Behaviour\] OnPlayerLeft (.+?)(?: \((usr_[0-9A-Fa-f-]+)\))?\s*$")
        .expect("static pattern")
});

/// Parse one raw log line into a typed event.
///
/// Returns `None` for every line that is not one of the recognized shapes,
/// including lines whose leading `yyyy.MM.dd HH:mm:ss` timestamp is
/// malformed. A bad timestamp makes the line useless for correlation, so it
/// is treated as unrecognized rather than given a default time.
pub fn parse_line(line: &str) -> Option<LogEvent> {
    let line = line.trim_end();
    let head = line.get(..19)?;
    let occurred_at = parse_log_timestamp(head).ok()?;
    let rest = &line[19..];

    if let Some(caps) = WORLD_JOIN.captures(rest) {
        let world_id = WorldId::parse(&caps[1])?;
        let instance_id = caps.get(2).and_then(|m| InstanceId::parse(m.as_str()));
        return Some(LogEvent::WorldJoin {
            world_id,
            instance_id,
            occurred_at,
        });
    }

    if let Some(caps) = ROOM_NAME.captures(rest) {
        let name = caps[1].trim().to_string();
        if name.is_empty() {
            return None;
        }
        return Some(LogEvent::RoomName { name, occurred_at });
    }

    if let Some(caps) = PLAYER_JOIN.captures(rest) {
        let player_name = PlayerName::parse(&caps[1])?;
        let player_id = caps.get(2).and_then(|m| PlayerId::parse(m.as_str()));
        return Some(LogEvent::PlayerJoin {
            player_name,
            player_id,
            occurred_at,
        });
    }

    if let Some(caps) = PLAYER_LEAVE.captures(rest) {
        let player_name = PlayerName::parse(&caps[1])?;
        return Some(LogEvent::PlayerLeave {
            player_name,
            occurred_at,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = "wrld_4432ea9b-729c-46e3-8eaf-846aa0a37fdd";
    const USER: &str = "usr_8a12bc34-0000-4e3f-9fcd-111122223333";

    #[test]
    fn test_world_join_with_instance() {
        let line = format!(
            "2024.01.15 10:00:00 Log        -  [Behaviour] Joining {}:12345~region(jp)",
            WORLD
        );
        match parse_line(&line) {
            Some(LogEvent::WorldJoin {
                world_id,
                instance_id,
                occurred_at,
            }) => {
                assert_eq!(world_id.as_str(), WORLD);
                assert_eq!(instance_id.unwrap().as_str(), "12345~region(jp)");
                assert_eq!(
                    occurred_at,
                    parse_log_timestamp("2024.01.15 10:00:00").unwrap()
                );
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_world_join_without_instance() {
        let line = format!("2024.01.15 10:00:00 Log        -  [Behaviour] Joining {}", WORLD);
        match parse_line(&line) {
            Some(LogEvent::WorldJoin { instance_id, .. }) => assert!(instance_id.is_none()),
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_room_name_line() {
        let line = "2024.01.15 10:00:01 Log        -  [Behaviour] Joining or Creating Room: The Great Pug";
        match parse_line(line) {
            Some(LogEvent::RoomName { name, .. }) => assert_eq!(name, "The Great Pug"),
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_player_join_with_and_without_id() {
        let with_id = format!(
            "2024.01.15 10:00:05 Log        -  [Behaviour] OnPlayerJoined Alice ({})",
            USER
        );
        match parse_line(&with_id) {
            Some(LogEvent::PlayerJoin {
                player_name,
                player_id,
                ..
            }) => {
                assert_eq!(player_name.as_str(), "Alice");
                assert_eq!(player_id.unwrap().as_str(), USER);
            }
            other => panic!("unexpected parse: {:?}", other),
        }

        let without_id = "2024.01.15 10:00:05 Log        -  [Behaviour] OnPlayerJoined Alice";
        match parse_line(without_id) {
            Some(LogEvent::PlayerJoin {
                player_name,
                player_id,
                ..
            }) => {
                assert_eq!(player_name.as_str(), "Alice");
                assert!(player_id.is_none());
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_player_leave() {
        let line = "2024.01.15 10:30:00 Log        -  [Behaviour] OnPlayerLeft Alice";
        match parse_line(line) {
            Some(LogEvent::PlayerLeave { player_name, .. }) => {
                assert_eq!(player_name.as_str(), "Alice")
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_on_player_left_room_is_not_a_leave() {
        // Engine also logs "OnPlayerLeftRoom"; the space anchor must keep it out
        let line = "2024.01.15 10:30:00 Log        -  [Behaviour] OnPlayerLeftRoom";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_irrelevant_lines_are_none() {
        assert!(parse_line("2024.01.15 10:00:00 Log        -  [Network] ping 32ms").is_none());
        assert!(parse_line("").is_none());
        assert!(parse_line("short").is_none());
    }

    #[test]
    fn test_malformed_timestamp_rejects_line() {
        let line = format!("2024.13.15 10:00:00 Log        -  [Behaviour] Joining {}", WORLD);
        assert!(parse_line(&line).is_none());
    }

    #[test]
    fn test_invalid_world_id_rejects_line() {
        let line = "2024.01.15 10:00:00 Log        -  [Behaviour] Joining wrld_not-a-uuid";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_player_name_with_parenthesized_suffix() {
        // Display names may themselves contain parentheses; only a trailing
        // usr_ token is treated as the id
        let line = "2024.01.15 10:00:05 Log        -  [Behaviour] OnPlayerJoined Bob (the builder)";
        match parse_line(line) {
            Some(LogEvent::PlayerJoin {
                player_name,
                player_id,
                ..
            }) => {
                assert_eq!(player_name.as_str(), "Bob (the builder)");
                assert!(player_id.is_none());
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }
}
