use chrono::NaiveDateTime;
use rusqlite::{Connection, Row, params};

use vrcshot_types::{PlayerFact, PlayerFactKind, PlayerId, PlayerName};

use crate::{Error, Result};

use super::{escape_like, ts_from_sql, ts_to_sql};

/// New player movement fact, prior to insertion
#[derive(Debug, Clone)]
pub struct NewPlayerFact<'a> {
    pub kind: PlayerFactKind,
    pub player_name: &'a PlayerName,
    pub player_id: Option<&'a PlayerId>,
    pub occurred_at: NaiveDateTime,
}

/// Insert a fact unless `(kind, player_name, occurred_at)` already exists.
/// Replaying a log file inserts nothing new.
pub fn insert_ignore(conn: &Connection, fact: &NewPlayerFact<'_>) -> Result<bool> {
    let changed = conn.execute(
        r#"
        INSERT OR IGNORE INTO player_log (kind, player_name, player_id, occurred_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            fact.kind.as_str(),
            fact.player_name.as_str(),
            fact.player_id.map(|i| i.as_str()),
            ts_to_sql(fact.occurred_at),
        ],
    )?;
    Ok(changed > 0)
}

/// Facts with `start <= occurred_at` and, when bounded, `occurred_at < end`,
/// ascending by `(occurred_at, id)`. The half-open upper bound matches the
/// session-boundary semantics: a fact stamped exactly at the next join
/// belongs to the next session.
pub fn list_between(
    conn: &Connection,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
) -> Result<Vec<PlayerFact>> {
    let query = match end {
        Some(_) => {
            r#"
            SELECT id, kind, player_name, player_id, occurred_at
            FROM player_log
            WHERE occurred_at >= ?1 AND occurred_at < ?2
            ORDER BY occurred_at ASC, id ASC
            "#
        }
        None => {
            r#"
            SELECT id, kind, player_name, player_id, occurred_at
            FROM player_log
            WHERE occurred_at >= ?1
            ORDER BY occurred_at ASC, id ASC
            "#
        }
    };

    let mut stmt = conn.prepare(query)?;
    let mut rows = match end {
        Some(end) => stmt.query(params![ts_to_sql(start), ts_to_sql(end)])?,
        None => stmt.query(params![ts_to_sql(start)])?,
    };

    let mut facts = Vec::new();
    while let Some(row) = rows.next()? {
        if let Ok(fact) = map_fact(row) {
            facts.push(fact);
        }
    }
    Ok(facts)
}

pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM player_log", [], |row| row.get(0))?;
    Ok(count as u64)
}

pub fn suggest_player_names(conn: &Connection, prefix: &str, limit: usize) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT DISTINCT player_name
        FROM player_log
        WHERE player_name LIKE ?1 ESCAPE '\'
        ORDER BY player_name ASC
        LIMIT ?2
        "#,
    )?;

    let pattern = format!("{}%", escape_like(prefix));
    let names = stmt
        .query_map(params![pattern, limit as i64], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;
    Ok(names)
}

/// Drop all player facts (FULL sync rebuild)
pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM player_log", [])?;
    Ok(())
}

fn map_fact(row: &Row<'_>) -> Result<PlayerFact> {
    let kind_raw: String = row.get(1)?;
    let kind = PlayerFactKind::from_store(&kind_raw)
        .ok_or_else(|| Error::Query(format!("Unknown player fact kind: {}", kind_raw)))?;
    Ok(PlayerFact {
        id: row.get(0)?,
        kind,
        player_name: PlayerName::from_store(row.get(2)?),
        player_id: row.get::<_, Option<String>>(3)?.map(PlayerId::from_store),
        occurred_at: ts_from_sql(4, row.get(4)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use vrcshot_types::parse_store_timestamp;

    fn name(raw: &str) -> PlayerName {
        PlayerName::parse(raw).unwrap()
    }

    fn fact<'a>(kind: PlayerFactKind, player: &'a PlayerName, ts: &str) -> NewPlayerFact<'a> {
        NewPlayerFact {
            kind,
            player_name: player,
            player_id: None,
            occurred_at: parse_store_timestamp(ts).unwrap(),
        }
    }

    #[test]
    fn test_insert_ignore_is_replay_safe() {
        let db = Database::open_in_memory().unwrap();
        let alice = name("Alice");
        let f = fact(PlayerFactKind::Join, &alice, "2024-01-15 10:00:05");

        assert!(insert_ignore(db.conn(), &f).unwrap());
        assert!(!insert_ignore(db.conn(), &f).unwrap());
        assert_eq!(count(db.conn()).unwrap(), 1);
    }

    #[test]
    fn test_join_and_leave_at_same_instant_both_persist() {
        let db = Database::open_in_memory().unwrap();
        let alice = name("Alice");
        assert!(insert_ignore(
            db.conn(),
            &fact(PlayerFactKind::Join, &alice, "2024-01-15 10:00:05")
        )
        .unwrap());
        assert!(insert_ignore(
            db.conn(),
            &fact(PlayerFactKind::Leave, &alice, "2024-01-15 10:00:05")
        )
        .unwrap());
        assert_eq!(count(db.conn()).unwrap(), 2);
    }

    #[test]
    fn test_list_between_is_half_open() {
        let db = Database::open_in_memory().unwrap();
        let alice = name("Alice");
        for (kind, ts) in [
            (PlayerFactKind::Join, "2024-01-15 10:00:05"),
            (PlayerFactKind::Leave, "2024-01-15 11:59:59"),
            (PlayerFactKind::Join, "2024-01-15 12:00:00"),
        ] {
            insert_ignore(db.conn(), &fact(kind, &alice, ts)).unwrap();
        }

        let facts = list_between(
            db.conn(),
            parse_store_timestamp("2024-01-15 10:00:00").unwrap(),
            Some(parse_store_timestamp("2024-01-15 12:00:00").unwrap()),
        )
        .unwrap();
        assert_eq!(facts.len(), 2, "fact at the boundary belongs to the next session");
    }

    #[test]
    fn test_suggest_player_names_distinct() {
        let db = Database::open_in_memory().unwrap();
        let alice = name("Alice");
        for ts in ["2024-01-15 10:00:05", "2024-01-15 10:10:05"] {
            insert_ignore(db.conn(), &fact(PlayerFactKind::Join, &alice, ts)).unwrap();
        }
        insert_ignore(
            db.conn(),
            &fact(PlayerFactKind::Join, &name("Albert"), "2024-01-15 10:20:00"),
        )
        .unwrap();

        let names = suggest_player_names(db.conn(), "Al", 10).unwrap();
        assert_eq!(names, vec!["Albert".to_string(), "Alice".to_string()]);

        let limited = suggest_player_names(db.conn(), "Al", 1).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
