use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use vrcshot_types::parse_log_timestamp;

use crate::partition::{MonthKey, PartitionFile};
use crate::{Error, Result};

// NOTE: Ledger Design Rationale
//
// Why content dedup (not file-offset cursors)?
// - VRChat truncates and rewrites output_log_*.txt unpredictably across
//   game sessions, so byte offsets into those files are meaningless
// - Ingestion re-reads files in full; the ledger only admits lines it has
//   never seen, which makes re-reads and overlapping imports idempotent
//
// Why month partitions?
// - Bounds single-file size and the in-memory dedup set for one partition
// - Export/import and backup can move individual months
//
// Why plain text, one raw line per line?
// - The ledger doubles as the backup/export payload; the format is frozen
// - Re-derivation parses the same bytes the original ingestion parsed

/// One line read back out of the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLogLine {
    /// Partition file the line was read from
    pub source: PathBuf,
    /// 1-based line number within that partition
    pub line_number: usize,
    /// Timestamp parsed from the line's own prefix
    pub occurred_at: NaiveDateTime,
    pub content: String,
}

/// Result of an append batch
#[derive(Debug, Default)]
pub struct AppendOutcome {
    /// Lines actually written, in input order
    pub appended: Vec<String>,
    /// Lines already present in the ledger (or repeated within the batch)
    pub duplicates: usize,
    /// Lines with no parseable timestamp prefix; these cannot be
    /// partitioned and are not stored
    pub unpartitioned: usize,
}

impl AppendOutcome {
    pub fn appended_count(&self) -> usize {
        self.appended.len()
    }
}

/// Result of merging external store files
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub files_read: usize,
    pub appended: usize,
    pub duplicates: usize,
}

pub struct LogStore {
    root: PathBuf,
    /// Per-partition digest sets, built lazily on first touch
    seen: HashMap<MonthKey, HashSet<u64>>,
}

impl LogStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            seen: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Append raw lines, admitting each distinct line at most once.
    ///
    /// Safe to call repeatedly with overlapping input; re-appending an
    /// already-stored line is a counted no-op. Returns the lines that were
    /// actually written so callers can derive state from exactly the new
    /// material.
    pub fn append_lines<'a, I>(&mut self, lines: I) -> Result<AppendOutcome>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut outcome = AppendOutcome::default();
        let mut pending: BTreeMap<MonthKey, Vec<String>> = BTreeMap::new();
        let mut pending_digests: HashMap<MonthKey, HashSet<u64>> = HashMap::new();

        for line in lines {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let Some(ts) = line_timestamp(line) else {
                outcome.unpartitioned += 1;
                continue;
            };
            let month = MonthKey::from_timestamp(ts);
            self.ensure_loaded(month)?;

            let digest = line_digest(line);
            let stored = self.seen.get(&month).is_some_and(|s| s.contains(&digest));
            let batched = pending_digests
                .get(&month)
                .is_some_and(|s| s.contains(&digest));
            if stored || batched {
                outcome.duplicates += 1;
                continue;
            }

            pending.entry(month).or_default().push(line.to_string());
            pending_digests.entry(month).or_default().insert(digest);
            outcome.appended.push(line.to_string());
        }

        // Partitions are written independently so one failing month never
        // corrupts another. A failed partition drops its cached digest set;
        // the next touch rebuilds it from whatever actually reached disk.
        for (month, month_lines) in pending {
            match self.write_partition(month, &month_lines) {
                Ok(()) => {
                    let digests = pending_digests.remove(&month).unwrap_or_default();
                    self.seen.entry(month).or_default().extend(digests);
                }
                Err(err) => {
                    self.seen.remove(&month);
                    return Err(err);
                }
            }
        }

        Ok(outcome)
    }

    /// Lazy, time-ordered read of stored lines.
    ///
    /// Each call re-opens from storage, so the cursor is restartable and a
    /// caller may stop early at no cost. One partition is materialized and
    /// sorted at a time; memory is bounded by the largest month.
    pub fn read_lines_in_range(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<LineCursor> {
        let parts: VecDeque<PartitionFile> = self
            .partitions()?
            .into_iter()
            .filter(|p| {
                let after_start = start.is_none_or(|s| p.month >= MonthKey::from_timestamp(s));
                let before_end = end.is_none_or(|e| p.month <= MonthKey::from_timestamp(e));
                after_start && before_end
            })
            .collect();

        Ok(LineCursor {
            partitions: parts,
            current: Vec::new().into_iter(),
            start,
            end,
        })
    }

    /// Merge lines from externally exported store files or directories of
    /// them, applying the same dedup rule as a normal append.
    pub fn import_external_store(&mut self, paths: &[PathBuf]) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome::default();

        for path in paths {
            let files = if path.is_dir() {
                let mut found: Vec<PathBuf> = fs::read_dir(path)?
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .and_then(|n| n.to_str())
                            .and_then(MonthKey::parse_file_name)
                            .is_some()
                    })
                    .collect();
                found.sort();
                if found.is_empty() {
                    return Err(Error::Import(format!(
                        "No store partitions found in directory: {}",
                        path.display()
                    )));
                }
                found
            } else if path.is_file() {
                vec![path.clone()]
            } else {
                return Err(Error::Import(format!(
                    "Import source does not exist: {}",
                    path.display()
                )));
            };

            for file in files {
                let content = fs::read_to_string(&file)?;
                let batch = self.append_lines(content.lines())?;
                outcome.files_read += 1;
                outcome.appended += batch.appended_count();
                outcome.duplicates += batch.duplicates;
            }
        }

        Ok(outcome)
    }

    /// Copy all partition files, byte for byte, into `dest`.
    pub fn export_to(&self, dest: &Path) -> Result<usize> {
        fs::create_dir_all(dest)?;
        let mut copied = 0;
        for part in self.partitions()? {
            fs::copy(&part.path, dest.join(part.month.file_name()))?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Partition files currently on disk, in chronological order
    pub fn partitions(&self) -> Result<Vec<PartitionFile>> {
        let mut parts = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(month) = MonthKey::parse_file_name(name) {
                parts.push(PartitionFile { month, path });
            }
        }
        parts.sort_by_key(|p| p.month);
        Ok(parts)
    }

    fn ensure_loaded(&mut self, month: MonthKey) -> Result<()> {
        if self.seen.contains_key(&month) {
            return Ok(());
        }
        let mut set = HashSet::new();
        let path = self.root.join(month.file_name());
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            for line in content.lines() {
                let line = line.trim_end_matches('\r');
                // A truncated trailing line fails timestamp validation and is
                // simply not admitted to the set; a re-append of the intact
                // line will store it properly.
                if line.is_empty() || line_timestamp(line).is_none() {
                    continue;
                }
                set.insert(line_digest(line));
            }
        }
        self.seen.insert(month, set);
        Ok(())
    }

    fn write_partition(&self, month: MonthKey, lines: &[String]) -> Result<()> {
        let path = self.root.join(month.file_name());
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Iterator over stored lines; see [`LogStore::read_lines_in_range`]
pub struct LineCursor {
    partitions: VecDeque<PartitionFile>,
    current: std::vec::IntoIter<RawLogLine>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl LineCursor {
    fn load_next_partition(&mut self) -> Option<Result<()>> {
        let part = self.partitions.pop_front()?;
        let content = match fs::read_to_string(&part.path) {
            Ok(c) => c,
            Err(err) => return Some(Err(err.into())),
        };

        let mut lines = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            // Malformed or truncated lines are dropped, not fatal
            let Some(ts) = line_timestamp(line) else {
                continue;
            };
            if self.start.is_some_and(|s| ts < s) || self.end.is_some_and(|e| ts > e) {
                continue;
            }
            lines.push(RawLogLine {
                source: part.path.clone(),
                line_number: idx + 1,
                occurred_at: ts,
                content: line.to_string(),
            });
        }

        // Appends interleave lines from overlapping source files, so a
        // partition body is not inherently time-ordered; order it here.
        lines.sort_by_key(|l| (l.occurred_at, l.line_number));
        self.current = lines.into_iter();
        Some(Ok(()))
    }
}

impl Iterator for LineCursor {
    type Item = Result<RawLogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.current.next() {
                return Some(Ok(line));
            }
            match self.load_next_partition() {
                Some(Ok(())) => continue,
                Some(Err(err)) => return Some(Err(err)),
                None => return None,
            }
        }
    }
}

/// Timestamp prefix of a raw log line, `yyyy.MM.dd HH:mm:ss`
fn line_timestamp(line: &str) -> Option<NaiveDateTime> {
    let head = line.get(..19)?;
    parse_log_timestamp(head).ok()
}

fn line_digest(line: &str) -> u64 {
    let digest = Sha256::digest(line.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().expect("digest is at least 8 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn line(ts: &str, body: &str) -> String {
        format!("{} Log        -  [Behaviour] {}", ts, body)
    }

    #[test]
    fn test_append_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = LogStore::open(dir.path()).unwrap();

        let lines = vec![
            line("2024.01.15 10:00:00", "Joining wrld_aaa"),
            line("2024.01.15 10:00:05", "OnPlayerJoined Alice"),
        ];
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();

        let first = store.append_lines(refs.iter().copied()).unwrap();
        assert_eq!(first.appended_count(), 2);
        assert_eq!(first.duplicates, 0);

        let second = store.append_lines(refs.iter().copied()).unwrap();
        assert_eq!(second.appended_count(), 0);
        assert_eq!(second.duplicates, 2);

        let stored: Vec<_> = store
            .read_lines_in_range(None, None)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_dedup_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let content = line("2024.01.15 10:00:00", "Joining wrld_aaa");

        {
            let mut store = LogStore::open(dir.path()).unwrap();
            store.append_lines([content.as_str()]).unwrap();
        }

        let mut store = LogStore::open(dir.path()).unwrap();
        let outcome = store.append_lines([content.as_str()]).unwrap();
        assert_eq!(outcome.appended_count(), 0);
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn test_lines_land_in_month_partitions() {
        let dir = TempDir::new().unwrap();
        let mut store = LogStore::open(dir.path()).unwrap();

        let jan = line("2024.01.31 23:59:59", "OnPlayerJoined Alice");
        let feb = line("2024.02.01 00:00:01", "OnPlayerJoined Bob");
        store
            .append_lines([jan.as_str(), feb.as_str()])
            .unwrap();

        let parts = store.partitions().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].month, MonthKey { year: 2024, month: 1 });
        assert_eq!(parts[1].month, MonthKey { year: 2024, month: 2 });
    }

    #[test]
    fn test_unpartitioned_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut store = LogStore::open(dir.path()).unwrap();

        let outcome = store
            .append_lines(["no timestamp here", "2024.99.99 10:00:00 bad date"])
            .unwrap();
        assert_eq!(outcome.appended_count(), 0);
        assert_eq!(outcome.unpartitioned, 2);
    }

    #[test]
    fn test_read_range_filters_and_orders() {
        let dir = TempDir::new().unwrap();
        let mut store = LogStore::open(dir.path()).unwrap();

        // Appended out of time order, as overlapping source files produce
        let l1 = line("2024.01.15 12:00:00", "OnPlayerJoined Carol");
        let l2 = line("2024.01.15 10:00:00", "OnPlayerJoined Alice");
        let l3 = line("2024.01.15 11:00:00", "OnPlayerJoined Bob");
        store
            .append_lines([l1.as_str(), l2.as_str(), l3.as_str()])
            .unwrap();

        let all: Vec<_> = store
            .read_lines_in_range(None, None)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let times: Vec<String> = all
            .iter()
            .map(|l| l.occurred_at.format("%H:%M").to_string())
            .collect();
        assert_eq!(times, vec!["10:00", "11:00", "12:00"]);

        let since = vrcshot_types::parse_log_timestamp("2024.01.15 10:30:00").unwrap();
        let bounded: Vec<_> = store
            .read_lines_in_range(Some(since), None)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(bounded.len(), 2);
    }

    #[test]
    fn test_truncated_trailing_line_is_dropped_on_read() {
        let dir = TempDir::new().unwrap();
        let mut store = LogStore::open(dir.path()).unwrap();

        let good = line("2024.01.15 10:00:00", "OnPlayerJoined Alice");
        store.append_lines([good.as_str()]).unwrap();

        // Simulate a partial write: garbage without a timestamp prefix
        let part = store.partitions().unwrap().remove(0);
        let mut content = fs::read_to_string(&part.path).unwrap();
        content.push_str("2024.01.15 10:0");
        fs::write(&part.path, content).unwrap();

        let read: Vec<_> = store
            .read_lines_in_range(None, None)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].content, good);
    }

    #[test]
    fn test_import_external_store() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();

        let l1 = line("2024.01.15 10:00:00", "OnPlayerJoined Alice");
        let l2 = line("2024.01.15 11:00:00", "OnPlayerJoined Bob");
        {
            let mut src = LogStore::open(src_dir.path()).unwrap();
            src.append_lines([l1.as_str(), l2.as_str()]).unwrap();
        }

        let mut dst = LogStore::open(dst_dir.path()).unwrap();
        dst.append_lines([l1.as_str()]).unwrap();

        let outcome = dst
            .import_external_store(&[src_dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(outcome.files_read, 1);
        assert_eq!(outcome.appended, 1);
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn test_import_missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut store = LogStore::open(dir.path()).unwrap();
        let missing = dir.path().join("nope");
        assert!(store.import_external_store(&[missing]).is_err());
    }
}
