//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Year assumed for offer dates that do not state one.
pub const DEFAULT_OFFER_YEAR: i32 = 2025;
/// Client-side timeout for the hosted extraction call.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;
/// Longest input the extractor will scan; anything beyond is cut off.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 100_000;

/// Paths to all Smart Offer data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Saved JSON exports (`data/exports/`).
    pub exports: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
    /// Brand catalog override (`data/brands.json`).
    pub brands_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            exports: root.join("exports"),
            llm_config_file: root.join("llm-config.json"),
            brands_file: root.join("brands.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.exports)?;
        Ok(())
    }
}

/// Top-level Smart Offer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartOfferConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Year used when an offer date has no explicit year.
    pub default_year: i32,
    /// Timeout for the hosted extraction call, in seconds.
    pub remote_timeout_secs: u64,
    /// Input length cap for the local extractor.
    pub max_input_chars: usize,
}

impl SmartOfferConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port: env_or("PORT", 3000),
            data_paths,
            default_year: env_or("SMARTOFFER_DEFAULT_YEAR", DEFAULT_OFFER_YEAR),
            remote_timeout_secs: env_or(
                "SMARTOFFER_REMOTE_TIMEOUT_SECS",
                DEFAULT_REMOTE_TIMEOUT_SECS,
            ),
            max_input_chars: env_or("SMARTOFFER_MAX_INPUT_CHARS", DEFAULT_MAX_INPUT_CHARS),
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
