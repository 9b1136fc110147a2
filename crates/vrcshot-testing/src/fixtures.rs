//! Fixtures for VRChat log lines and screenshot filenames.
//!
//! Line shapes mirror what the game actually writes; tests build scenarios
//! from these instead of embedding raw strings everywhere.

/// Well-known world ids for scenarios
pub const WORLD_A: &str = "wrld_4432ea9b-729c-46e3-8eaf-846aa0a37fdd";
pub const WORLD_B: &str = "wrld_97f2ea9b-1111-46e3-8eaf-846aa0a37f00";

/// Well-known player id
pub const USER_A: &str = "usr_8a12bc34-0000-4e3f-9fcd-111122223333";

/// `ts` in log form: `2024.01.15 10:00:00`
pub fn world_join_line(ts: &str, world_id: &str, instance: Option<&str>) -> String {
    match instance {
        Some(instance) => format!(
            "{} Log        -  [Behaviour] Joining {}:{}",
            ts, world_id, instance
        ),
        None => format!("{} Log        -  [Behaviour] Joining {}", ts, world_id),
    }
}

pub fn room_name_line(ts: &str, name: &str) -> String {
    format!(
        "{} Log        -  [Behaviour] Joining or Creating Room: {}",
        ts, name
    )
}

pub fn player_join_line(ts: &str, name: &str, player_id: Option<&str>) -> String {
    match player_id {
        Some(id) => format!(
            "{} Log        -  [Behaviour] OnPlayerJoined {} ({})",
            ts, name, id
        ),
        None => format!("{} Log        -  [Behaviour] OnPlayerJoined {}", ts, name),
    }
}

pub fn player_leave_line(ts: &str, name: &str) -> String {
    format!("{} Log        -  [Behaviour] OnPlayerLeft {}", ts, name)
}

/// A line the parser must ignore
pub fn noise_line(ts: &str) -> String {
    format!("{} Log        -  [Network] Measure Server ping 32ms", ts)
}

/// Screenshot filename in the current grammar.
/// `date` as `2024-01-15`, `time` as `10-15-30`.
pub fn photo_file_name(date: &str, time: &str, width: u32, height: u32) -> String {
    format!("VRChat_{}_{}.123_{}x{}.png", date, time, width, height)
}
