use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Detect VRChat directories and write the initial configuration")]
    Init {
        #[arg(long, help = "Re-detect directories even if a configuration exists")]
        refresh: bool,
    },

    #[command(about = "Ingest new log lines and update derived session state")]
    Sync {
        #[arg(long, help = "Rebuild all derived state from the entire log store")]
        full: bool,

        #[arg(long, help = "Keep watching the directories and re-sync on changes")]
        watch: bool,

        #[arg(long)]
        verbose: bool,
    },

    #[command(about = "Index screenshots under the configured photo roots")]
    Scan {
        #[arg(long, help = "Remove records whose files no longer exist on disk")]
        prune: bool,

        #[arg(long)]
        verbose: bool,
    },

    #[command(about = "Browse photos grouped by world session")]
    Gallery {
        #[command(subcommand)]
        command: GalleryCommand,
    },

    #[command(about = "Manage the raw log store (the backup/export payload)")]
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },

    #[command(about = "Prefix search over indexed world and player names")]
    Suggest {
        #[command(subcommand)]
        command: SuggestCommand,
    },
}

#[derive(Subcommand)]
pub enum GalleryCommand {
    #[command(about = "List photo groups in a time window")]
    List {
        #[arg(long, help = "Window start, \"YYYY-MM-DD\" or \"YYYY-MM-DD HH:MM:SS\"")]
        since: Option<String>,

        #[arg(long, help = "Window end, \"YYYY-MM-DD\" or \"YYYY-MM-DD HH:MM:SS\"")]
        until: Option<String>,

        #[arg(long, default_value = "50", help = "Maximum number of groups")]
        limit: usize,

        #[arg(long, default_value = "0", help = "Groups to skip (pagination)")]
        offset: usize,
    },

    #[command(about = "Count indexed photos in a time window")]
    Count {
        #[arg(long)]
        since: Option<String>,

        #[arg(long)]
        until: Option<String>,
    },

    #[command(about = "Show players present during one session")]
    Players {
        #[arg(help = "Session join time, e.g. \"2024-01-15 10:00:00\"")]
        joined_at: String,
    },
}

#[derive(Subcommand)]
pub enum StoreCommand {
    #[command(about = "Copy the monthly store partitions to a directory")]
    Export {
        #[arg(help = "Destination directory")]
        dest: PathBuf,
    },

    #[command(about = "Merge exported store files and rebuild derived state")]
    Import {
        #[arg(required = true, help = "Exported partition files or directories")]
        paths: Vec<PathBuf>,

        #[arg(long, help = "Skip the full rebuild after merging")]
        no_rebuild: bool,
    },
}

#[derive(Subcommand)]
pub enum SuggestCommand {
    #[command(about = "World names matching a prefix")]
    Worlds {
        prefix: String,

        #[arg(long, default_value = "10")]
        limit: usize,
    },

    #[command(about = "Player names matching a prefix")]
    Players {
        prefix: String,

        #[arg(long, default_value = "10")]
        limit: usize,
    },
}
