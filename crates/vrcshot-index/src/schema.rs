use rusqlite::Connection;

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 3;

// NOTE: Derived Store Rationale
//
// Why is dropping tables on version mismatch acceptable?
// - Every row here is derivable: sessions and player facts replay from the
//   raw log ledger (FULL sync), photo rows from a directory rescan
// - The ledger is the durable surface; this database is a query cache
//
// Why no session_id foreign key on player_log?
// - Log files from alt installs arrive late with earlier timestamps,
//   inserting sessions *before* existing ones
// - Membership by interval containment at read time means those inserts
//   never cascade into rewrites of player rows
//
// Why TEXT timestamps?
// - Local wall-clock seconds, formatted %Y-%m-%d %H:%M:%S, sort and
//   compare lexicographically; no timezone math belongs in this layer

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS world_join_sessions (
            id INTEGER PRIMARY KEY,
            world_id TEXT NOT NULL,
            instance_id TEXT,
            world_name TEXT,
            joined_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_sessions_join
            ON world_join_sessions(world_id, COALESCE(instance_id, ''), joined_at);
        CREATE INDEX IF NOT EXISTS idx_sessions_joined_at
            ON world_join_sessions(joined_at);

        CREATE TABLE IF NOT EXISTS player_log (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            player_name TEXT NOT NULL,
            player_id TEXT,
            occurred_at TEXT NOT NULL,
            UNIQUE (kind, player_name, occurred_at)
        );

        CREATE INDEX IF NOT EXISTS idx_player_log_time ON player_log(occurred_at);
        CREATE INDEX IF NOT EXISTS idx_player_log_name ON player_log(player_name);

        CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY,
            photo_path TEXT NOT NULL UNIQUE,
            taken_at TEXT NOT NULL,
            width INTEGER NOT NULL,
            height INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_photos_taken_at ON photos(taken_at);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS photos;
        DROP TABLE IF EXISTS player_log;
        DROP TABLE IF EXISTS world_join_sessions;
        "#,
    )?;
    Ok(())
}
