use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// NOTE: Identifier Design Rationale
//
// VRChat log lines interleave three string-shaped identifiers (world, instance,
// player) plus free-form display names. Passing them around as bare strings is
// how a world id ends up in a player column, so each one is a newtype that can
// only be constructed through a validating parse (or an explicit `from_store`
// for values we validated before persisting them).

/// World identifier, `wrld_` followed by a UUID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(String);

impl WorldId {
    pub const PREFIX: &'static str = "wrld_";

    /// Parse and validate a raw token. Returns `None` for anything that is not
    /// `wrld_<uuid>`; callers treat that as an unrecognized line, not an error.
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix(Self::PREFIX)?;
        Uuid::parse_str(rest).ok()?;
        Some(Self(raw.to_string()))
    }

    /// Rehydrate a value previously validated and persisted by this crate.
    pub fn from_store(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for WorldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Player identifier, `usr_` followed by a UUID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub const PREFIX: &'static str = "usr_";

    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix(Self::PREFIX)?;
        Uuid::parse_str(rest).ok()?;
        Some(Self(raw.to_string()))
    }

    pub fn from_store(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Instance token as it appears after the world id in a join line.
///
/// The token is opaque to us: a numeric or alphanumeric instance name,
/// optionally followed by `~`-separated qualifiers such as `~region(jp)` or
/// access tags. We keep it verbatim; two joins that differ only in a
/// qualifier are distinct instances as far as the log is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.contains(char::is_whitespace) {
            return None;
        }
        let head = raw.split('~').next().unwrap_or("");
        if head.is_empty() || !head.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn from_store(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Player display name as logged. Non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn from_store(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_id_accepts_canonical_form() {
        let id = WorldId::parse("wrld_4432ea9b-729c-46e3-8eaf-846aa0a37fdd").unwrap();
        assert_eq!(id.as_str(), "wrld_4432ea9b-729c-46e3-8eaf-846aa0a37fdd");
    }

    #[test]
    fn test_world_id_rejects_bad_input() {
        assert!(WorldId::parse("wrld_not-a-uuid").is_none());
        assert!(WorldId::parse("usr_4432ea9b-729c-46e3-8eaf-846aa0a37fdd").is_none());
        assert!(WorldId::parse("").is_none());
    }

    #[test]
    fn test_player_id_round_trip() {
        let id = PlayerId::parse("usr_8a12bc34-0000-4e3f-9fcd-111122223333").unwrap();
        assert_eq!(id.to_string(), "usr_8a12bc34-0000-4e3f-9fcd-111122223333");
    }

    #[test]
    fn test_instance_id_keeps_qualifiers() {
        let id = InstanceId::parse("12345~region(jp)").unwrap();
        assert_eq!(id.as_str(), "12345~region(jp)");
        assert!(InstanceId::parse("").is_none());
        assert!(InstanceId::parse("has space").is_none());
        assert!(InstanceId::parse("~region(jp)").is_none());
    }

    #[test]
    fn test_player_name_trims() {
        let name = PlayerName::parse("  Alice  ").unwrap();
        assert_eq!(name.as_str(), "Alice");
        assert!(PlayerName::parse("   ").is_none());
    }
}
