// NOTE: Command Organization Rationale
//
// Namespaced subcommands (gallery, store, suggest) group the read-side
// operations the UI layer would otherwise call over RPC; the top-level verbs
// (init, sync, scan) are the write-side lifecycle. This mirrors the split in
// the engine itself: ingestion mutates, gallery only reads.

mod commands;

pub use commands::*;

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "vrcshot")]
#[command(about = "Index VRChat screenshots and browse them by world session", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Workspace data directory (defaults to $VRCSHOT_PATH, then the platform data dir)"
    )]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}
