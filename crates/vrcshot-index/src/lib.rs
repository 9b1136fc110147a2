// SQLite derived index
// Rebuildable query cache over the raw log ledger and the photo library

mod error;
pub mod queries;
mod schema;

pub use error::{Error, Result};
pub use queries::photos::{NewPhoto, UpsertResult};
pub use queries::players::NewPlayerFact;
pub use queries::sessions::NewSession;

use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;

use vrcshot_types::{PhotoRecord, PlayerFact, WorldJoinSession};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn init_schema(&self) -> Result<()> {
        schema::init_schema(&self.conn)
    }

    /// Direct connection access for the query modules
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- sessions ---

    pub fn insert_session_ignore(&self, session: &NewSession<'_>) -> Result<bool> {
        queries::sessions::insert_ignore(&self.conn, session)
    }

    pub fn apply_room_name(
        &self,
        name: &str,
        at: NaiveDateTime,
        window_secs: i64,
    ) -> Result<bool> {
        queries::sessions::apply_room_name(&self.conn, name, at, window_secs)
    }

    pub fn sessions_in_range(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<WorldJoinSession>> {
        queries::sessions::list_in_range(&self.conn, start, end)
    }

    pub fn latest_session_before(&self, ts: NaiveDateTime) -> Result<Option<WorldJoinSession>> {
        queries::sessions::latest_before(&self.conn, ts)
    }

    pub fn next_join_after(&self, ts: NaiveDateTime) -> Result<Option<NaiveDateTime>> {
        queries::sessions::next_join_after(&self.conn, ts)
    }

    pub fn session_at(&self, joined_at: NaiveDateTime) -> Result<Option<WorldJoinSession>> {
        queries::sessions::find_at(&self.conn, joined_at)
    }

    pub fn count_sessions(&self) -> Result<u64> {
        queries::sessions::count(&self.conn)
    }

    pub fn suggest_world_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        queries::sessions::suggest_world_names(&self.conn, prefix, limit)
    }

    // --- player facts ---

    pub fn insert_player_fact(&self, fact: &NewPlayerFact<'_>) -> Result<bool> {
        queries::players::insert_ignore(&self.conn, fact)
    }

    pub fn player_facts_between(
        &self,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<PlayerFact>> {
        queries::players::list_between(&self.conn, start, end)
    }

    pub fn count_player_facts(&self) -> Result<u64> {
        queries::players::count(&self.conn)
    }

    pub fn suggest_player_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        queries::players::suggest_player_names(&self.conn, prefix, limit)
    }

    // --- photos ---

    pub fn upsert_photo(&self, photo: &NewPhoto<'_>) -> Result<UpsertResult> {
        queries::photos::upsert(&self.conn, photo)
    }

    pub fn photos_in_range(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<PhotoRecord>> {
        queries::photos::list_in_range(&self.conn, start, end)
    }

    pub fn count_photos_in_range(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<u64> {
        queries::photos::count_in_range(&self.conn, start, end)
    }

    pub fn photo_paths(&self) -> Result<Vec<String>> {
        queries::photos::all_paths(&self.conn)
    }

    pub fn delete_photo_by_path(&self, path: &str) -> Result<bool> {
        queries::photos::delete_by_path(&self.conn, path)
    }

    // --- maintenance ---

    /// Drop all log-derived rows (sessions and player facts) ahead of a FULL
    /// rebuild. Photo rows are left alone; they derive from the filesystem,
    /// not the ledger.
    pub fn reset_log_derived_state(&self) -> Result<()> {
        queries::sessions::clear(&self.conn)?;
        queries::players::clear(&self.conn)?;
        Ok(())
    }

    pub fn vacuum(&self) -> Result<()> {
        self.conn.execute("VACUUM", [])?;
        Ok(())
    }
}
