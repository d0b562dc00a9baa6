use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchOptions;

/// Global configuration loaded from `~/.config/podarc/config.toml`.
///
/// The CLI merges these with its flags (flags win) and passes the resolved
/// values into the library explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodarcConfig {
    /// Archive root when `--download-dir` is not given.
    pub download_dir: PathBuf,
    /// Worker threads for fetching; 1 = fully sequential.
    pub jobs: usize,
    /// Connect timeout per fetch, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout per fetch, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for PodarcConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("audiofiles"),
            jobs: 1,
            connect_timeout_secs: 30,
            fetch_timeout_secs: 3600,
        }
    }
}

impl PodarcConfig {
    /// Transfer limits derived from this config.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch_timeout_secs),
            ..FetchOptions::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("podarc")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PodarcConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PodarcConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PodarcConfig = toml::from_str(&data)?;
    Ok(cfg)
}
