pub mod photos;
pub mod players;
pub mod sessions;

use chrono::NaiveDateTime;
use vrcshot_types::{format_store_timestamp, parse_store_timestamp};

/// Escape LIKE metacharacters for prefix matching with `ESCAPE '\'`
pub(crate) fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(crate) fn ts_to_sql(ts: NaiveDateTime) -> String {
    format_store_timestamp(ts)
}

/// Convert a stored TEXT timestamp back, surfacing corruption as a row-level
/// conversion failure (the caller's query_map skips or propagates it)
pub(crate) fn ts_from_sql(idx: usize, raw: String) -> rusqlite::Result<NaiveDateTime> {
    parse_store_timestamp(&raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_done\\x"), "50\\%\\_done\\\\x");
    }
}
