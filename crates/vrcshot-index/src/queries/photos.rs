use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};

use vrcshot_types::PhotoRecord;

use crate::Result;

use super::{ts_from_sql, ts_to_sql};

/// New or re-scanned photo, prior to upsert
#[derive(Debug, Clone)]
pub struct NewPhoto<'a> {
    pub photo_path: &'a str,
    pub taken_at: NaiveDateTime,
    pub width: u32,
    pub height: u32,
}

/// What an upsert actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertResult {
    Inserted,
    Updated,
    Unchanged,
}

/// Idempotent upsert keyed on `photo_path`.
///
/// Re-scanning an unchanged file is a no-op that leaves `updated_at` alone;
/// a path reappearing with different filename metadata updates the row in
/// place. Rows are never deleted here; see `delete_by_path` for the explicit
/// prune pass.
pub fn upsert(conn: &Connection, photo: &NewPhoto<'_>) -> Result<UpsertResult> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM photos WHERE photo_path = ?1",
            [photo.photo_path],
            |row| row.get(0),
        )
        .optional()?;

    let now = ts_to_sql(chrono::Local::now().naive_local());
    let changed = conn.execute(
        r#"
        INSERT INTO photos (photo_path, taken_at, width, height, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ON CONFLICT(photo_path) DO UPDATE SET
            taken_at = excluded.taken_at,
            width = excluded.width,
            height = excluded.height,
            updated_at = excluded.updated_at
        WHERE photos.taken_at != excluded.taken_at
           OR photos.width != excluded.width
           OR photos.height != excluded.height
        "#,
        params![
            photo.photo_path,
            ts_to_sql(photo.taken_at),
            photo.width,
            photo.height,
            now,
        ],
    )?;

    Ok(match (existing, changed) {
        (None, _) => UpsertResult::Inserted,
        (Some(_), 0) => UpsertResult::Unchanged,
        (Some(_), _) => UpsertResult::Updated,
    })
}

/// Photos with `taken_at` inside the (inclusive) window, ascending by
/// `(taken_at, id)`
pub fn list_in_range(
    conn: &Connection,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<Vec<PhotoRecord>> {
    let mut where_clauses = vec!["1=1"];
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(start) = start {
        where_clauses.push("taken_at >= ?");
        params.push(Box::new(ts_to_sql(start)));
    }
    if let Some(end) = end {
        where_clauses.push("taken_at <= ?");
        params.push(Box::new(ts_to_sql(end)));
    }

    let query = format!(
        r#"
        SELECT id, photo_path, taken_at, width, height, created_at, updated_at
        FROM photos
        WHERE {}
        ORDER BY taken_at ASC, id ASC
        "#,
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&query)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut rows = stmt.query(param_refs.as_slice())?;

    let mut photos = Vec::new();
    while let Some(row) = rows.next()? {
        if let Ok(photo) = map_photo(row) {
            photos.push(photo);
        }
    }
    Ok(photos)
}

pub fn count_in_range(
    conn: &Connection,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<u64> {
    let mut where_clauses = vec!["1=1"];
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(start) = start {
        where_clauses.push("taken_at >= ?");
        params.push(Box::new(ts_to_sql(start)));
    }
    if let Some(end) = end {
        where_clauses.push("taken_at <= ?");
        params.push(Box::new(ts_to_sql(end)));
    }

    let query = format!(
        "SELECT COUNT(*) FROM photos WHERE {}",
        where_clauses.join(" AND ")
    );
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let count: i64 = conn.query_row(&query, param_refs.as_slice(), |row| row.get(0))?;
    Ok(count as u64)
}

/// All indexed paths, for the explicit prune pass
pub fn all_paths(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT photo_path FROM photos ORDER BY photo_path")?;
    let paths = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;
    Ok(paths)
}

pub fn delete_by_path(conn: &Connection, path: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM photos WHERE photo_path = ?1", [path])?;
    Ok(changed > 0)
}

fn map_photo(row: &Row<'_>) -> rusqlite::Result<PhotoRecord> {
    Ok(PhotoRecord {
        id: row.get(0)?,
        photo_path: row.get(1)?,
        taken_at: ts_from_sql(2, row.get(2)?)?,
        width: row.get::<_, i64>(3)? as u32,
        height: row.get::<_, i64>(4)? as u32,
        created_at: ts_from_sql(5, row.get(5)?)?,
        updated_at: ts_from_sql(6, row.get(6)?)?,
    })
}
