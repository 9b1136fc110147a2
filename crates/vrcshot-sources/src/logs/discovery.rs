use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Candidate log files under a VRChat log directory, sorted by file name.
///
/// VRChat keeps a handful of rotated `output_log_*.txt` files and rewrites
/// them across game launches. Callers re-read matches in full on every sync;
/// the log store's content dedup makes that cheap and safe.
pub fn discover_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryMissing(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_log_file_name)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Read a log file in full, tolerating invalid UTF-8.
///
/// The game writes these files while we read them; a torn multi-byte
/// sequence at the tail must not fail the whole read. Lossy conversion
/// mangles at most the trailing partial line, which the parser then skips.
pub fn read_log_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_log_file_name(name: &str) -> bool {
    name.starts_with("output_log_") && name.ends_with(".txt")
}
