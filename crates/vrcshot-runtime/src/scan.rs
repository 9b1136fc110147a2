use std::path::{Path, PathBuf};

use vrcshot_index::{Database, NewPhoto, UpsertResult};
use vrcshot_sources::Error as SourceError;
use vrcshot_sources::photos::discover_photos;

use crate::cancel::CancelToken;
use crate::Result;

/// Photos upserted per batch. Bounds peak memory on 10k+ libraries and sets
/// the granularity at which cancellation takes effect.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone)]
pub enum ScanProgress {
    RootScanning { root: PathBuf },
    RootMissing { root: PathBuf },
    Batch { processed: usize, inserted: usize, updated: usize },
    Cancelled { processed: usize },
    Pruned { removed: usize },
    Completed { inserted: usize, updated: usize, unchanged: usize },
}

#[derive(Debug, Default, Clone)]
pub struct ScanOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub roots_missing: usize,
    pub pruned: usize,
    pub cancelled: bool,
}

impl ScanOutcome {
    pub fn processed(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

/// Incremental photo indexer.
///
/// Walks each configured root lazily and upserts filename-derived metadata in
/// bounded batches; pixel data is never opened. A missing root is reported
/// and skipped; the remaining roots still scan. Cancellation is honored
/// between batches only, and leaves everything already upserted in place.
pub struct PhotoScanner<'a> {
    db: &'a Database,
    batch_size: usize,
}

impl<'a> PhotoScanner<'a> {
    pub fn new(db: &'a Database, batch_size: usize) -> Self {
        Self {
            db,
            batch_size: batch_size.max(1),
        }
    }

    pub fn run<F>(
        &self,
        roots: &[PathBuf],
        prune: bool,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<ScanOutcome>
    where
        F: FnMut(ScanProgress),
    {
        let mut outcome = ScanOutcome::default();

        'roots: for root in roots {
            let walk = match discover_photos(root) {
                Ok(walk) => walk,
                Err(SourceError::DirectoryMissing(path)) => {
                    outcome.roots_missing += 1;
                    on_progress(ScanProgress::RootMissing { root: path });
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            on_progress(ScanProgress::RootScanning { root: root.clone() });

            let mut batch = Vec::with_capacity(self.batch_size);
            let mut walk = walk.peekable();
            while walk.peek().is_some() {
                batch.clear();
                batch.extend(walk.by_ref().take(self.batch_size));

                let mut batch_inserted = 0;
                let mut batch_updated = 0;
                for photo in &batch {
                    let path = photo.path.to_string_lossy();
                    match self.db.upsert_photo(&NewPhoto {
                        photo_path: &path,
                        taken_at: photo.meta.taken_at,
                        width: photo.meta.width,
                        height: photo.meta.height,
                    })? {
                        UpsertResult::Inserted => {
                            outcome.inserted += 1;
                            batch_inserted += 1;
                        }
                        UpsertResult::Updated => {
                            outcome.updated += 1;
                            batch_updated += 1;
                        }
                        UpsertResult::Unchanged => outcome.unchanged += 1,
                    }
                }

                on_progress(ScanProgress::Batch {
                    processed: outcome.processed(),
                    inserted: batch_inserted,
                    updated: batch_updated,
                });

                if cancel.is_cancelled() {
                    outcome.cancelled = true;
                    on_progress(ScanProgress::Cancelled {
                        processed: outcome.processed(),
                    });
                    break 'roots;
                }
            }
        }

        // Prune runs only on explicit request and never after a cancelled
        // walk; an aborted scan proves nothing about what is gone.
        if prune && !outcome.cancelled {
            for path in self.db.photo_paths()? {
                if !Path::new(&path).exists() && self.db.delete_photo_by_path(&path)? {
                    outcome.pruned += 1;
                }
            }
            on_progress(ScanProgress::Pruned {
                removed: outcome.pruned,
            });
        }

        on_progress(ScanProgress::Completed {
            inserted: outcome.inserted,
            updated: outcome.updated,
            unchanged: outcome.unchanged,
        });

        Ok(outcome)
    }
}
