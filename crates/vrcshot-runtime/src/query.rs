use chrono::NaiveDateTime;

use vrcshot_engine::{PhotoGroup, distinct_players, group_photos, pair_player_sessions};
use vrcshot_index::Database;
use vrcshot_types::{PlayerSession, WorldJoinSession, format_store_timestamp};

use crate::{Error, Result};

/// Inclusive time window over the local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Pagination over photo groups (not individual photos)
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupPage {
    pub offset: usize,
    pub limit: Option<usize>,
}

// NOTE: Consistency Contract
//
// Every method reads a consistent snapshot per call and holds no state
// between calls. Reads may run while an ingestion run is writing; seeing a
// partially-updated session set is acceptable (the caller re-queries after
// the sync-completed signal). No grouping result is ever cached; stateless
// recomputation trades CPU for freedom from invalidation bugs.

/// Read-side facade over the derived store
pub struct QueryService<'a> {
    db: &'a Database,
}

impl<'a> QueryService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn count_photos(&self, window: TimeWindow) -> Result<u64> {
        Ok(self.db.count_photos_in_range(window.start, window.end)?)
    }

    /// Photo groups for the window, ordered: ungrouped bucket first (when
    /// non-empty), then sessions ascending by join time.
    ///
    /// Sessions inside the window are surfaced even when empty. The latest
    /// session *before* the window is also consulted so early-window photos
    /// attach to it rather than landing in the ungrouped bucket, but it only
    /// appears in the output when it actually holds photos.
    pub fn list_photo_groups(&self, window: TimeWindow, page: GroupPage) -> Result<Vec<PhotoGroup>> {
        let mut sessions = self.db.sessions_in_range(window.start, window.end)?;
        if let Some(start) = window.start
            && let Some(boundary) = self.db.latest_session_before(start)?
        {
            sessions.insert(0, boundary);
        }

        let photos = self.db.photos_in_range(window.start, window.end)?;
        let groups = group_photos(&sessions, &photos);

        let in_window = |s: &WorldJoinSession| window.start.is_none_or(|st| s.joined_at >= st);
        let mut groups: Vec<PhotoGroup> = groups
            .into_iter()
            .filter(|g| match &g.session {
                None => true,
                Some(s) => in_window(s) || !g.photos.is_empty(),
            })
            .collect();

        let offset = page.offset.min(groups.len());
        groups.drain(..offset);
        if let Some(limit) = page.limit {
            groups.truncate(limit);
        }
        Ok(groups)
    }

    /// Players present during the session joined at `joined_at`, one entry
    /// per display name (consecutive rejoins collapse at this edge).
    pub fn players_for_session(&self, joined_at: NaiveDateTime) -> Result<Vec<PlayerSession>> {
        let session = self.db.session_at(joined_at)?.ok_or_else(|| {
            Error::InvalidOperation(format!(
                "No session joined at {}",
                format_store_timestamp(joined_at)
            ))
        })?;

        let end = self.db.next_join_after(session.joined_at)?;
        let facts = self.db.player_facts_between(session.joined_at, end)?;
        let stays = pair_player_sessions(&facts);
        Ok(distinct_players(&stays))
    }

    pub fn suggest_world_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        Ok(self.db.suggest_world_names(prefix, limit)?)
    }

    pub fn suggest_player_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        Ok(self.db.suggest_player_names(prefix, limit)?)
    }
}
