use anyhow::Result;

use crate::args::{Cli, Commands, GalleryCommand, StoreCommand, SuggestCommand};
use crate::context::ExecutionContext;
use crate::handlers;

pub fn run(cli: Cli) -> Result<()> {
    let ctx = ExecutionContext::new(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Init { refresh } => handlers::init::handle(&ctx, refresh),
        Commands::Sync {
            full,
            watch,
            verbose,
        } => handlers::sync::handle(&ctx, full, watch, verbose),
        Commands::Scan { prune, verbose } => handlers::scan::handle(&ctx, prune, verbose),
        Commands::Gallery { command } => match command {
            GalleryCommand::List {
                since,
                until,
                limit,
                offset,
            } => handlers::gallery::list(&ctx, cli.format, since, until, limit, offset),
            GalleryCommand::Count { since, until } => {
                handlers::gallery::count(&ctx, cli.format, since, until)
            }
            GalleryCommand::Players { joined_at } => {
                handlers::gallery::players(&ctx, cli.format, &joined_at)
            }
        },
        Commands::Store { command } => match command {
            StoreCommand::Export { dest } => handlers::store::export(&ctx, &dest),
            StoreCommand::Import { paths, no_rebuild } => {
                handlers::store::import(&ctx, &paths, no_rebuild)
            }
        },
        Commands::Suggest { command } => match command {
            SuggestCommand::Worlds { prefix, limit } => {
                handlers::suggest::worlds(&ctx, cli.format, &prefix, limit)
            }
            SuggestCommand::Players { prefix, limit } => {
                handlers::suggest::players(&ctx, cli.format, &prefix, limit)
            }
        },
    }
}
