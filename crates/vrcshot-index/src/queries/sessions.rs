use chrono::{Duration, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

use vrcshot_types::{InstanceId, WorldId, WorldJoinSession};

use crate::Result;

use super::{escape_like, ts_from_sql, ts_to_sql};

/// New session row, prior to insertion
#[derive(Debug, Clone)]
pub struct NewSession<'a> {
    pub world_id: &'a WorldId,
    pub instance_id: Option<&'a InstanceId>,
    pub joined_at: NaiveDateTime,
}

/// Insert a session unless the `(world_id, instance_id, joined_at)` tuple is
/// already present. Returns whether a row was actually added, so replaying
/// history is a counted no-op.
pub fn insert_ignore(conn: &Connection, session: &NewSession<'_>) -> Result<bool> {
    let now = chrono::Local::now().naive_local();
    let changed = conn.execute(
        r#"
        INSERT OR IGNORE INTO world_join_sessions (world_id, instance_id, world_name, joined_at, created_at)
        VALUES (?1, ?2, NULL, ?3, ?4)
        "#,
        params![
            session.world_id.as_str(),
            session.instance_id.map(|i| i.as_str()),
            ts_to_sql(session.joined_at),
            ts_to_sql(now),
        ],
    )?;
    Ok(changed > 0)
}

/// Attach a display name to the join it accompanies.
///
/// The room-name line trails its join line by at most a few seconds, so the
/// name goes to the latest session joined within `window_secs` before (or at)
/// the name line's timestamp. First name wins; replays are no-ops.
pub fn apply_room_name(
    conn: &Connection,
    name: &str,
    at: NaiveDateTime,
    window_secs: i64,
) -> Result<bool> {
    let lower = at - Duration::seconds(window_secs);
    let changed = conn.execute(
        r#"
        UPDATE world_join_sessions
        SET world_name = ?1
        WHERE id = (
            SELECT id FROM world_join_sessions
            WHERE joined_at <= ?2 AND joined_at >= ?3
            ORDER BY joined_at DESC, id DESC
            LIMIT 1
        )
        AND world_name IS NULL
        "#,
        params![name, ts_to_sql(at), ts_to_sql(lower)],
    )?;
    Ok(changed > 0)
}

/// Sessions whose join time falls inside the (inclusive) window, ascending by
/// `(joined_at, id)`; the id tie-break keeps duplicate-timestamp data stable
/// across repeated queries.
pub fn list_in_range(
    conn: &Connection,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<Vec<WorldJoinSession>> {
    let mut where_clauses = vec!["1=1"];
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(start) = start {
        where_clauses.push("joined_at >= ?");
        params.push(Box::new(ts_to_sql(start)));
    }
    if let Some(end) = end {
        where_clauses.push("joined_at <= ?");
        params.push(Box::new(ts_to_sql(end)));
    }

    let query = format!(
        r#"
        SELECT id, world_id, instance_id, world_name, joined_at, created_at
        FROM world_join_sessions
        WHERE {}
        ORDER BY joined_at ASC, id ASC
        "#,
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&query)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut rows = stmt.query(param_refs.as_slice())?;

    let mut sessions = Vec::new();
    while let Some(row) = rows.next()? {
        // A corrupt row is skipped, not fatal to the listing
        if let Ok(session) = map_session(row) {
            sessions.push(session);
        }
    }
    Ok(sessions)
}

/// Latest session joined strictly before `ts`, if any
pub fn latest_before(conn: &Connection, ts: NaiveDateTime) -> Result<Option<WorldJoinSession>> {
    let result = conn
        .query_row(
            r#"
            SELECT id, world_id, instance_id, world_name, joined_at, created_at
            FROM world_join_sessions
            WHERE joined_at < ?1
            ORDER BY joined_at DESC, id DESC
            LIMIT 1
            "#,
            [ts_to_sql(ts)],
            |row| map_session(row),
        )
        .optional()?;
    Ok(result)
}

/// Join time of the first session after `ts`, the implicit end boundary of
/// the session joined at `ts`
pub fn next_join_after(conn: &Connection, ts: NaiveDateTime) -> Result<Option<NaiveDateTime>> {
    let result = conn
        .query_row(
            r#"
            SELECT joined_at FROM world_join_sessions
            WHERE joined_at > ?1
            ORDER BY joined_at ASC, id ASC
            LIMIT 1
            "#,
            [ts_to_sql(ts)],
            |row| ts_from_sql(0, row.get(0)?),
        )
        .optional()?;
    Ok(result)
}

/// Session with the given join time (first by id when duplicates exist)
pub fn find_at(conn: &Connection, joined_at: NaiveDateTime) -> Result<Option<WorldJoinSession>> {
    let result = conn
        .query_row(
            r#"
            SELECT id, world_id, instance_id, world_name, joined_at, created_at
            FROM world_join_sessions
            WHERE joined_at = ?1
            ORDER BY id ASC
            LIMIT 1
            "#,
            [ts_to_sql(joined_at)],
            |row| map_session(row),
        )
        .optional()?;
    Ok(result)
}

pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM world_join_sessions", [], |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}

pub fn suggest_world_names(conn: &Connection, prefix: &str, limit: usize) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT DISTINCT world_name
        FROM world_join_sessions
        WHERE world_name IS NOT NULL AND world_name LIKE ?1 ESCAPE '\'
        ORDER BY world_name ASC
        LIMIT ?2
        "#,
    )?;

    let pattern = format!("{}%", escape_like(prefix));
    let names = stmt
        .query_map(params![pattern, limit as i64], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;
    Ok(names)
}

/// Drop all session rows (FULL sync rebuild)
pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM world_join_sessions", [])?;
    Ok(())
}

fn map_session(row: &Row<'_>) -> rusqlite::Result<WorldJoinSession> {
    Ok(WorldJoinSession {
        id: row.get(0)?,
        world_id: WorldId::from_store(row.get(1)?),
        instance_id: row.get::<_, Option<String>>(2)?.map(InstanceId::from_store),
        world_name: row.get(3)?,
        joined_at: ts_from_sql(4, row.get(4)?)?,
        created_at: ts_from_sql(5, row.get(5)?)?,
    })
}
