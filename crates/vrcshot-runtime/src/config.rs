use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolve the workspace data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. VRCSHOT_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.vrcshot (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Explicit path
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    // Priority 2: VRCSHOT_PATH environment variable
    if let Ok(env_path) = std::env::var("VRCSHOT_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    // Priority 3: XDG data directory (recommended default)
    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("vrcshot"));
    }

    // Priority 4: Fallback to ~/.vrcshot (last resort for systems without XDG)
    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".vrcshot"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

fn default_scan_batch_size() -> usize {
    crate::scan::DEFAULT_SCAN_BATCH_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// VRChat log directory holding output_log_*.txt files
    pub log_dir: Option<PathBuf>,

    /// Primary screenshot directory
    pub photo_dir: Option<PathBuf>,

    /// Additional screenshot roots (external drives, moved archives)
    #[serde(default)]
    pub extra_photo_dirs: Vec<PathBuf>,

    /// Photos upserted per batch during a scan; bounds peak memory
    #[serde(default = "default_scan_batch_size")]
    pub scan_batch_size: usize,
}

impl Config {
    pub fn load(data_dir: &PathBuf) -> Result<Self> {
        Self::load_from(&Self::path_in(data_dir))
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &PathBuf) -> Result<()> {
        self.save_to(&Self::path_in(data_dir))
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn path_in(data_dir: &PathBuf) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Probe the platform-default VRChat directories and keep whichever exist
    pub fn detect_defaults() -> Self {
        let mut config = Self {
            scan_batch_size: default_scan_batch_size(),
            ..Self::default()
        };

        if let Some(home) = dirs::home_dir() {
            let log_dir = home
                .join("AppData")
                .join("LocalLow")
                .join("VRChat")
                .join("VRChat");
            if log_dir.is_dir() {
                config.log_dir = Some(log_dir);
            }

            let photo_dir = home.join("Pictures").join("VRChat");
            if photo_dir.is_dir() {
                config.photo_dir = Some(photo_dir);
            }
        }

        config
    }

    /// All configured photo roots, primary first
    pub fn photo_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(primary) = &self.photo_dir {
            roots.push(primary.clone());
        }
        roots.extend(self.extra_photo_dirs.iter().cloned());
        roots
    }

    /// Effective batch size; a zero in the file falls back to the default
    pub fn effective_batch_size(&self) -> usize {
        if self.scan_batch_size == 0 {
            default_scan_batch_size()
        } else {
            self.scan_batch_size
        }
    }
}
