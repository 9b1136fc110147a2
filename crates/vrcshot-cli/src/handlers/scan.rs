use anyhow::Result;

use vrcshot_runtime::{CancelToken, PhotoScanner, ScanProgress};

use crate::context::ExecutionContext;

pub fn handle(ctx: &ExecutionContext, prune: bool, verbose: bool) -> Result<()> {
    let db = ctx.open_db()?;
    let roots = ctx.photo_roots()?;

    let cancel = CancelToken::new();
    let handler_cancel = cancel.clone();
    ctrlc::set_handler(move || handler_cancel.cancel())?;

    let scanner = PhotoScanner::new(&db, ctx.config.effective_batch_size());
    let outcome = scanner.run(&roots, prune, &cancel, |progress| match progress {
        ScanProgress::RootScanning { root } => {
            if verbose {
                println!("Scanning {}", root.display());
            }
        }
        ScanProgress::RootMissing { root } => {
            eprintln!("Photo directory not found, skipping: {}", root.display());
        }
        ScanProgress::Batch {
            processed,
            inserted,
            updated,
        } => {
            if verbose {
                println!("  {} processed (+{} new, {} updated)", processed, inserted, updated);
            }
        }
        ScanProgress::Cancelled { processed } => {
            println!("Cancelled after {} photo(s); indexed records are kept.", processed);
        }
        ScanProgress::Pruned { removed } => {
            println!("Pruned {} record(s) for missing files", removed);
        }
        ScanProgress::Completed {
            inserted,
            updated,
            unchanged,
        } => {
            println!(
                "Scan complete: {} new, {} updated, {} unchanged",
                inserted, updated, unchanged
            );
        }
    })?;

    if outcome.cancelled {
        std::process::exit(130);
    }
    Ok(())
}
