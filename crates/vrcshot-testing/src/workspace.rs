use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated on-disk workspace for one test: a data directory (ledger +
/// index), a VRChat-style log directory and a screenshot directory.
pub struct TestWorkspace {
    _temp: TempDir,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub photo_dir: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let data_dir = temp.path().join("data");
        let log_dir = temp.path().join("logs");
        let photo_dir = temp.path().join("photos");
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&log_dir)?;
        fs::create_dir_all(&photo_dir)?;

        Ok(Self {
            _temp: temp,
            data_dir,
            log_dir,
            photo_dir,
        })
    }

    /// Ledger directory inside the data dir
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("logstore")
    }

    /// Index database path inside the data dir
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("index.sqlite3")
    }

    /// Write (or overwrite) a log file under the log directory.
    /// `name` should match the game's `output_log_*.txt` pattern.
    pub fn write_log_file(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self.log_dir.join(name);
        fs::write(&path, lines.join("\n") + "\n")?;
        Ok(path)
    }

    /// Place an empty screenshot file; indexing reads names only, so no
    /// pixel data is needed.
    pub fn add_photo(&self, file_name: &str) -> Result<PathBuf> {
        let dir = self.photo_dir.clone();
        self.add_photo_in(&dir, file_name)
    }

    pub fn add_photo_in(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        fs::write(&path, [])?;
        Ok(path)
    }
}
