use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ids::{InstanceId, PlayerId, PlayerName, WorldId};

/// One world-join session as persisted in the derived store.
///
/// A session's end is implicit: the `joined_at` of the next session in
/// `joined_at` order, or open-ended for the most recent one. The
/// `(world_id, instance_id, joined_at)` tuple is unique, which is what makes
/// replaying the same log history a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldJoinSession {
    pub id: i64,
    pub world_id: WorldId,
    pub instance_id: Option<InstanceId>,
    /// Display name from the companion room line, when one was seen
    pub world_name: Option<String>,
    pub joined_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Direction of a player movement fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerFactKind {
    Join,
    Leave,
}

impl PlayerFactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerFactKind::Join => "join",
            PlayerFactKind::Leave => "leave",
        }
    }

    pub fn from_store(raw: &str) -> Option<Self> {
        match raw {
            "join" => Some(PlayerFactKind::Join),
            "leave" => Some(PlayerFactKind::Leave),
            _ => None,
        }
    }
}

/// A raw player join/leave fact.
///
/// Deliberately not tied to a session by foreign key: membership is computed
/// at read time by interval containment, so late-arriving log files with
/// earlier timestamps never force a rewrite of existing rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFact {
    pub id: i64,
    pub kind: PlayerFactKind,
    pub player_name: PlayerName,
    pub player_id: Option<PlayerId>,
    pub occurred_at: NaiveDateTime,
}

/// One indexed screenshot. `taken_at` and the dimensions come from the
/// filename grammar, never from filesystem metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: i64,
    pub photo_path: String,
    pub taken_at: NaiveDateTime,
    pub width: u32,
    pub height: u32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A player's stay within one world-join session, derived at query time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSession {
    pub player_name: PlayerName,
    pub player_id: Option<PlayerId>,
    pub joined_at: NaiveDateTime,
    /// None when no matching leave was logged before the session boundary
    pub left_at: Option<NaiveDateTime>,
}
