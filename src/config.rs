//! Application configuration
//!
//! Loaded from `config.toml` in the platform config directory. On first run
//! the file is created with defaults; missing keys in an existing file are
//! filled in from defaults and written back, so the on-disk file always shows
//! every knob.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Initial fraction of the main area given to the editor pane
    #[serde(default = "default_split_fraction")]
    pub split_fraction: f64,

    /// Minimum pane width in cells; drags clamp against it
    #[serde(default = "default_min_pane_width")]
    pub min_pane_width: u16,

    /// Two presses within this window count as a double-click (ms)
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,

    /// Delay before the output column is re-measured after a change (ms)
    #[serde(default = "default_reflow_delay_ms")]
    pub reflow_delay_ms: u64,

    /// Body rows shown per visible section
    #[serde(default = "default_body_rows")]
    pub body_rows: u16,

    /// Body rows shown per enlarged section
    #[serde(default = "default_expanded_rows")]
    pub expanded_rows: u16,

    /// Log file path (if not specified, the cache directory is used)
    #[serde(default)]
    pub log_file_path: Option<String>,

    /// Minimum log level: "debug", "info", "warn", "error"
    #[serde(default = "default_min_log_level")]
    pub min_log_level: String,
}

fn default_split_fraction() -> f64 {
    0.5
}

fn default_min_pane_width() -> u16 {
    20
}

fn default_double_click_ms() -> u64 {
    400
}

fn default_reflow_delay_ms() -> u64 {
    50
}

fn default_body_rows() -> u16 {
    6
}

fn default_expanded_rows() -> u16 {
    16
}

fn default_min_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            split_fraction: default_split_fraction(),
            min_pane_width: default_min_pane_width(),
            double_click_ms: default_double_click_ms(),
            reflow_delay_ms: default_reflow_delay_ms(),
            body_rows: default_body_rows(),
            expanded_rows: default_expanded_rows(),
            log_file_path: None,
            min_log_level: default_min_log_level(),
        }
    }
}

impl Config {
    /// Load configuration, creating the file with defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and normalize a specific config file. Missing keys are completed
    /// with defaults and persisted.
    pub fn load_from(path: &Path) -> Result<Self> {
        let original = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&original)?;
        let normalized = toml::to_string_pretty(&config)?;
        if normalized != original {
            config.save_to(path)?;
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
        Ok(base.join("quadtty").join("config.toml"))
    }

    /// Log file destination: the configured path, or the cache directory.
    pub fn log_file_path(&self) -> PathBuf {
        if let Some(ref path) = self.log_file_path {
            PathBuf::from(path)
        } else {
            dirs::cache_dir()
                .map(|dir| dir.join("quadtty").join("quadtty.log"))
                .unwrap_or_else(|| std::env::temp_dir().join("quadtty.log"))
        }
    }
}
