use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ids::{InstanceId, PlayerId, PlayerName, WorldId};

// NOTE: Event Design Goals
//
// 1. Normalization: collapse VRChat's free-form log text into a small typed
//    vocabulary the reconciler can replay deterministically.
// 2. Replayability: events carry only what the raw line carries. Re-parsing
//    the same stored line always yields the same event, which is what makes
//    FULL rebuilds equivalent to the original incremental ingestion.
// 3. Local time: log timestamps are the player's wall clock with second
//    precision. They are never converted to UTC; photo filenames use the
//    same clock, and correlation happens in that shared frame.
//
// Lines the parser does not recognize produce no event at all. That is the
// normal case: the overwhelming majority of log lines are engine noise.

/// One recognized log line, parsed into its typed form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEvent {
    /// The local player joined a world instance
    WorldJoin {
        world_id: WorldId,
        instance_id: Option<InstanceId>,
        occurred_at: NaiveDateTime,
    },

    /// Companion line to a world join carrying the world's display name
    RoomName {
        name: String,
        occurred_at: NaiveDateTime,
    },

    /// A remote player appeared in the current instance
    PlayerJoin {
        player_name: PlayerName,
        player_id: Option<PlayerId>,
        occurred_at: NaiveDateTime,
    },

    /// A remote player left the current instance
    PlayerLeave {
        player_name: PlayerName,
        occurred_at: NaiveDateTime,
    },
}

impl LogEvent {
    pub fn occurred_at(&self) -> NaiveDateTime {
        match self {
            LogEvent::WorldJoin { occurred_at, .. }
            | LogEvent::RoomName { occurred_at, .. }
            | LogEvent::PlayerJoin { occurred_at, .. }
            | LogEvent::PlayerLeave { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_log_timestamp;

    #[test]
    fn test_serialization() {
        let event = LogEvent::WorldJoin {
            world_id: WorldId::parse("wrld_4432ea9b-729c-46e3-8eaf-846aa0a37fdd").unwrap(),
            instance_id: InstanceId::parse("12345~region(jp)"),
            occurred_at: parse_log_timestamp("2024.01.15 10:00:00").unwrap(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: LogEvent = serde_json::from_str(&json).unwrap();

        match deserialized {
            LogEvent::WorldJoin { world_id, .. } => {
                assert_eq!(world_id.as_str(), "wrld_4432ea9b-729c-46e3-8eaf-846aa0a37fdd")
            }
            _ => panic!("Wrong event kind"),
        }
    }
}
