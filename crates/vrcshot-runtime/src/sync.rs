use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use vrcshot_index::{Database, NewPlayerFact, NewSession};
use vrcshot_logstore::LogStore;
use vrcshot_sources::logs::{discover_log_files, parse_line, read_log_file};
use vrcshot_types::{LogEvent, PlayerFactKind};

use crate::{Error, Result};

/// How far a `Joining or Creating Room:` line may trail its join line and
/// still name that session
pub const ROOM_NAME_WINDOW_SECS: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Rebuild all log-derived state from the entire ledger (after an
    /// import/restore)
    Full,
    /// Process only lines appended in this run
    Incremental,
}

// NOTE: Single-Flight Rationale
//
// FULL and INCREMENTAL runs interleaved over the same store would let the
// reconciler observe a non-monotonic event stream (one run clearing tables
// while the other inserts). The gate is part of the public contract: a second
// request while one is in flight is rejected immediately (coalesced by the
// caller, never queued), which also bounds memory under a burst of watch
// events.

/// Mutual-exclusion token for ingestion runs
#[derive(Debug, Default)]
pub struct SyncGate {
    in_flight: AtomicBool,
}

impl SyncGate {
    pub const fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
        }
    }

    /// Acquire the gate or fail with [`Error::SyncInFlight`]
    pub fn try_acquire(&self) -> Result<SyncPermit<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Ok(SyncPermit { gate: self })
        } else {
            Err(Error::SyncInFlight)
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// RAII permit; dropping it releases the gate
pub struct SyncPermit<'a> {
    gate: &'a SyncGate,
}

impl Drop for SyncPermit<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub enum SyncProgress {
    Scanning {
        log_dir: PathBuf,
        files: usize,
    },
    FileUnreadable {
        path: PathBuf,
    },
    FileIngested {
        path: PathBuf,
        recognized: usize,
        appended: usize,
    },
    RebuildStarted,
    Completed {
        mode: SyncMode,
        lines_appended: usize,
        sessions_added: usize,
        player_facts_added: usize,
    },
}

#[derive(Debug, Default, Clone)]
pub struct SyncOutcome {
    pub files_scanned: usize,
    pub files_unreadable: usize,
    pub lines_recognized: usize,
    pub lines_appended: usize,
    pub sessions_added: usize,
    pub player_facts_added: usize,
    pub world_names_applied: usize,
}

/// Ingestion engine: discovers log files, extracts new lines, appends them
/// to the ledger and replays the newly recognized events into the index.
///
/// Stage order is fixed: lines are durably appended before any derived
/// state is written, so a crash mid-run never leaves sessions that reference
/// unpersisted log data.
pub struct SyncService<'a> {
    store: &'a mut LogStore,
    db: &'a Database,
}

impl<'a> SyncService<'a> {
    pub fn new(store: &'a mut LogStore, db: &'a Database) -> Self {
        Self { store, db }
    }

    pub fn run<F>(
        &mut self,
        log_dir: &Path,
        mode: SyncMode,
        gate: &SyncGate,
        mut on_progress: F,
    ) -> Result<SyncOutcome>
    where
        F: FnMut(SyncProgress),
    {
        let _permit = gate.try_acquire()?;
        let mut outcome = SyncOutcome::default();

        let files = discover_log_files(log_dir)?;
        on_progress(SyncProgress::Scanning {
            log_dir: log_dir.to_path_buf(),
            files: files.len(),
        });

        // Stage 1: append. Full-content re-read per file; the ledger's
        // content dedup replaces any notion of a byte-offset cursor.
        let mut new_events: Vec<LogEvent> = Vec::new();
        for file in files {
            let content = match read_log_file(&file) {
                Ok(content) => content,
                Err(_) => {
                    // One unreadable file must not abort the batch
                    outcome.files_unreadable += 1;
                    on_progress(SyncProgress::FileUnreadable { path: file });
                    continue;
                }
            };

            let recognized: Vec<&str> = content
                .lines()
                .filter(|line| parse_line(line).is_some())
                .collect();

            let appended = self.store.append_lines(recognized.iter().copied())?;
            for line in &appended.appended {
                if let Some(event) = parse_line(line) {
                    new_events.push(event);
                }
            }

            outcome.files_scanned += 1;
            outcome.lines_recognized += recognized.len();
            outcome.lines_appended += appended.appended_count();
            on_progress(SyncProgress::FileIngested {
                path: file,
                recognized: recognized.len(),
                appended: appended.appended_count(),
            });
        }

        // Stage 2: reconcile, strictly after durability.
        match mode {
            SyncMode::Incremental => {
                // Events from different files must be merge-sorted into one
                // monotonic stream; the stable sort keeps same-second lines
                // in file order.
                new_events.sort_by_key(|e| e.occurred_at());
                for event in &new_events {
                    self.apply_event(event, &mut outcome)?;
                }
            }
            SyncMode::Full => {
                on_progress(SyncProgress::RebuildStarted);
                self.replay_ledger(&mut outcome)?;
            }
        }

        on_progress(SyncProgress::Completed {
            mode,
            lines_appended: outcome.lines_appended,
            sessions_added: outcome.sessions_added,
            player_facts_added: outcome.player_facts_added,
        });

        Ok(outcome)
    }

    /// Rebuild all log-derived state from the ledger alone, without touching
    /// any log directory. This is the restore path after
    /// [`LogStore::import_external_store`] when no live log directory is
    /// configured yet.
    pub fn rebuild<F>(&mut self, gate: &SyncGate, mut on_progress: F) -> Result<SyncOutcome>
    where
        F: FnMut(SyncProgress),
    {
        let _permit = gate.try_acquire()?;
        let mut outcome = SyncOutcome::default();

        on_progress(SyncProgress::RebuildStarted);
        self.replay_ledger(&mut outcome)?;
        on_progress(SyncProgress::Completed {
            mode: SyncMode::Full,
            lines_appended: 0,
            sessions_added: outcome.sessions_added,
            player_facts_added: outcome.player_facts_added,
        });

        Ok(outcome)
    }

    /// Clear derived rows and replay the entire ledger. The cursor yields
    /// lines in time order, so the reconciler sees a monotonic stream.
    fn replay_ledger(&self, outcome: &mut SyncOutcome) -> Result<()> {
        self.db.reset_log_derived_state()?;
        for line in self.store.read_lines_in_range(None, None)? {
            let line = line?;
            if let Some(event) = parse_line(&line.content) {
                self.apply_event(&event, outcome)?;
            }
        }
        Ok(())
    }

    /// Reconcile one event into the derived store. Replays are no-ops by way
    /// of the unique constraints, so the counters reflect genuinely new rows.
    fn apply_event(&self, event: &LogEvent, outcome: &mut SyncOutcome) -> Result<()> {
        match event {
            LogEvent::WorldJoin {
                world_id,
                instance_id,
                occurred_at,
            } => {
                let added = self.db.insert_session_ignore(&NewSession {
                    world_id,
                    instance_id: instance_id.as_ref(),
                    joined_at: *occurred_at,
                })?;
                if added {
                    outcome.sessions_added += 1;
                }
            }
            LogEvent::RoomName { name, occurred_at } => {
                let applied =
                    self.db
                        .apply_room_name(name, *occurred_at, ROOM_NAME_WINDOW_SECS)?;
                if applied {
                    outcome.world_names_applied += 1;
                }
            }
            LogEvent::PlayerJoin {
                player_name,
                player_id,
                occurred_at,
            } => {
                let added = self.db.insert_player_fact(&NewPlayerFact {
                    kind: PlayerFactKind::Join,
                    player_name,
                    player_id: player_id.as_ref(),
                    occurred_at: *occurred_at,
                })?;
                if added {
                    outcome.player_facts_added += 1;
                }
            }
            LogEvent::PlayerLeave {
                player_name,
                occurred_at,
            } => {
                let added = self.db.insert_player_fact(&NewPlayerFact {
                    kind: PlayerFactKind::Leave,
                    player_name,
                    player_id: None,
                    occurred_at: *occurred_at,
                })?;
                if added {
                    outcome.player_facts_added += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejects_second_acquire() {
        let gate = SyncGate::new();
        let permit = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(gate.try_acquire(), Err(Error::SyncInFlight)));
        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }
}
