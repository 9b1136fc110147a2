use anyhow::Result;
use std::path::{Path, PathBuf};

use vrcshot_runtime::{SyncGate, SyncMode, SyncProgress, SyncService};

use crate::context::ExecutionContext;

pub fn export(ctx: &ExecutionContext, dest: &Path) -> Result<()> {
    let store = ctx.open_store()?;
    let copied = store.export_to(dest)?;
    println!("Exported {} partition(s) to {}", copied, dest.display());
    Ok(())
}

pub fn import(ctx: &ExecutionContext, paths: &[PathBuf], no_rebuild: bool) -> Result<()> {
    let db = ctx.open_db()?;
    let mut store = ctx.open_store()?;

    let outcome = store.import_external_store(paths)?;
    println!(
        "Merged {} file(s): {} new line(s), {} already present",
        outcome.files_read, outcome.appended, outcome.duplicates
    );

    if no_rebuild {
        println!("Skipped rebuild; run `vrcshot sync --full` to refresh sessions.");
        return Ok(());
    }

    // Derived sessions must be rebuilt from the merged ledger. With a live
    // log directory configured the rebuild also picks up current files;
    // otherwise it replays the ledger alone.
    let gate = SyncGate::new();
    let mut service = SyncService::new(&mut store, &db);
    let on_progress = |progress: SyncProgress| {
        if let SyncProgress::Completed {
            sessions_added,
            player_facts_added,
            ..
        } = progress
        {
            println!(
                "Rebuilt {} session(s), {} player fact(s)",
                sessions_added, player_facts_added
            );
        }
    };
    match &ctx.config.log_dir {
        Some(log_dir) => {
            service.run(log_dir, SyncMode::Full, &gate, on_progress)?;
        }
        None => {
            service.rebuild(&gate, on_progress)?;
        }
    }

    Ok(())
}
