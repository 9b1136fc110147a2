use anyhow::Result;
use std::time::Duration;

use vrcshot_runtime::{
    ActivityEvent, CancelToken, Error as RuntimeError, PhotoScanner, SyncGate, SyncMode,
    SyncProgress, SyncService, WorkspaceWatcher,
};

use crate::context::ExecutionContext;

const WATCH_DEBOUNCE: Duration = Duration::from_secs(2);

pub fn handle(ctx: &ExecutionContext, full: bool, watch: bool, verbose: bool) -> Result<()> {
    let db = ctx.open_db()?;
    let mut store = ctx.open_store()?;
    let log_dir = ctx.log_dir()?;
    let gate = SyncGate::new();

    let mode = if full {
        SyncMode::Full
    } else {
        SyncMode::Incremental
    };

    SyncService::new(&mut store, &db).run(&log_dir, mode, &gate, |progress| {
        render_progress(&progress, verbose)
    })?;

    if !watch {
        return Ok(());
    }

    // Watch mode: coalesced change events re-trigger an incremental run.
    // The gate makes triggers landing mid-run drop instead of piling up.
    let photo_roots = ctx.config.photo_roots();
    let watcher = WorkspaceWatcher::start(Some(log_dir.clone()), photo_roots.clone(), WATCH_DEBOUNCE)?;
    let stop = CancelToken::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.cancel())?;

    println!("Watching for changes (Ctrl-C to stop)...");
    while !stop.is_cancelled() {
        let event = match watcher.receiver().recv_timeout(Duration::from_millis(500)) {
            Ok(event) => event,
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match event {
            ActivityEvent::Logs => {
                let result = SyncService::new(&mut store, &db).run(
                    &log_dir,
                    SyncMode::Incremental,
                    &gate,
                    |progress| render_progress(&progress, verbose),
                );
                match result {
                    Ok(_) | Err(RuntimeError::SyncInFlight) => {}
                    Err(err) => eprintln!("sync failed: {}", err),
                }
            }
            ActivityEvent::Photos => {
                let scanner = PhotoScanner::new(&db, ctx.config.effective_batch_size());
                if let Err(err) = scanner.run(&photo_roots, false, &stop, |_| {}) {
                    eprintln!("photo scan failed: {}", err);
                }
            }
        }
    }

    println!("Stopped.");
    Ok(())
}

fn render_progress(progress: &SyncProgress, verbose: bool) {
    match progress {
        SyncProgress::Scanning { log_dir, files } => {
            if verbose {
                println!("Scanning {} ({} log file(s))", log_dir.display(), files);
            }
        }
        SyncProgress::FileUnreadable { path } => {
            eprintln!("Skipping unreadable file {}", path.display());
        }
        SyncProgress::FileIngested {
            path,
            recognized,
            appended,
        } => {
            if verbose {
                println!(
                    "  {}: {} recognized, {} new",
                    path.display(),
                    recognized,
                    appended
                );
            }
        }
        SyncProgress::RebuildStarted => {
            println!("Rebuilding derived state from the log store...");
        }
        SyncProgress::Completed {
            mode,
            lines_appended,
            sessions_added,
            player_facts_added,
        } => {
            let mode = match mode {
                SyncMode::Full => "full",
                SyncMode::Incremental => "incremental",
            };
            println!(
                "Sync ({}) complete: {} new line(s), {} new session(s), {} player fact(s)",
                mode, lines_appended, sessions_added, player_facts_added
            );
        }
    }
}
