use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use vrcshot_index::Database;
use vrcshot_logstore::LogStore;
use vrcshot_runtime::{Config, resolve_workspace_path};

/// Resolved workspace for one command invocation
pub struct ExecutionContext {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl ExecutionContext {
    pub fn new(data_dir_flag: Option<&str>) -> Result<Self> {
        let data_dir = resolve_workspace_path(data_dir_flag)?;
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let config = Config::load(&data_dir)?;
        Ok(Self { data_dir, config })
    }

    pub fn open_db(&self) -> Result<Database> {
        let path = self.data_dir.join("index.sqlite3");
        Database::open(&path)
            .with_context(|| format!("Failed to open index database {}", path.display()))
    }

    pub fn open_store(&self) -> Result<LogStore> {
        let path = self.data_dir.join("logstore");
        LogStore::open(&path)
            .with_context(|| format!("Failed to open log store {}", path.display()))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.config.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => bail!("No log directory configured. Run `vrcshot init` first."),
        }
    }

    pub fn photo_roots(&self) -> Result<Vec<PathBuf>> {
        let roots = self.config.photo_roots();
        if roots.is_empty() {
            bail!("No photo directories configured. Run `vrcshot init` first.");
        }
        Ok(roots)
    }
}
